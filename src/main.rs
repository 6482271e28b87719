use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mentormatch::api::{create_router, AppState};
use mentormatch::fetch::HttpFetcher;
use mentormatch::{
    AutoAssigner, MatcherConfig, PlagiarismChecker, PlagiarismConfig, SeedData, Store,
};

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Faculty-theme matching and plagiarism screening", long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(short, long, default_value = "mentormatch.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Load themes, faculty and submissions from a JSON seed file
    Import {
        /// Seed file path
        file: PathBuf,
    },
    /// Run one auto-assignment batch and print the result
    Assign,
    /// Check one submission for plagiarism and print the report
    Check {
        /// Submission id to check
        submission_id: i64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(Store::open(&cli.db).context("Failed to open store")?);

    match cli.command {
        Command::Serve { addr } => serve(store, &addr),
        Command::Import { file } => import(&store, &file),
        Command::Assign => assign(&store),
        Command::Check { submission_id } => check(store, submission_id),
    }
}

fn serve(store: Arc<Store>, addr: &str) -> Result<()> {
    let config = PlagiarismConfig::default();
    // built outside the runtime: the blocking HTTP client must not live
    // on async worker threads
    let fetcher = HttpFetcher::new(config.fetch_timeout, config.fetch_max_chars)
        .context("Failed to build HTTP fetcher")?;
    let state = Arc::new(AppState {
        matcher: AutoAssigner::new(store.clone(), MatcherConfig::default()),
        checker: PlagiarismChecker::new(store, Box::new(fetcher), config),
    });

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    runtime.block_on(run_server(addr, app))
}

async fn run_server(addr: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn import(store: &Store, file: &PathBuf) -> Result<()> {
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    let seed: SeedData = serde_json::from_reader(reader).context("Failed to parse seed file")?;

    let start = Instant::now();
    for theme in &seed.themes {
        store.put_theme(theme)?;
    }
    for faculty in &seed.faculty {
        store.put_faculty(faculty)?;
    }
    for submission in &seed.submissions {
        store.put_submission(submission)?;
    }
    store.flush()?;
    let duration = start.elapsed();

    println!(
        "Imported {} themes, {} faculty, {} submissions in {:?}",
        seed.themes.len(),
        seed.faculty.len(),
        seed.submissions.len(),
        duration
    );
    Ok(())
}

fn assign(store: &Arc<Store>) -> Result<()> {
    let assigner = AutoAssigner::new(store.clone(), MatcherConfig::default());

    let start = Instant::now();
    let report = assigner.run()?;
    let duration = start.elapsed();

    println!("{} in {:?}", report.message, duration);
    println!();
    for assignment in &report.assignments {
        println!(
            "{}\t{} -> {} (score {:.2})",
            assignment.faculty_id,
            assignment.faculty_name,
            assignment.theme_name,
            assignment.score
        );
    }
    Ok(())
}

fn check(store: Arc<Store>, submission_id: i64) -> Result<()> {
    let config = PlagiarismConfig::default();
    let fetcher = HttpFetcher::new(config.fetch_timeout, config.fetch_max_chars)?;
    let checker = PlagiarismChecker::new(store, Box::new(fetcher), config);

    let start = Instant::now();
    let report = checker.check(submission_id)?;
    let duration = start.elapsed();

    println!(
        "Submission {} ({}) - {:?} ({:.2}%) in {:?}",
        report.submission_id,
        report.project_title,
        report.status,
        report.plagiarism_score,
        duration
    );
    println!();
    for submission_match in &report.matches {
        println!(
            "  {:>6.2}%  {:?}  submission {} ({})",
            submission_match.similarity_score,
            submission_match.status,
            submission_match.submission_id,
            submission_match.project_title
        );
    }
    if report.matches.is_empty() {
        println!("  no matches above the reporting floor");
    }
    Ok(())
}
