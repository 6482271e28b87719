use std::sync::Arc;

use serde::Serialize;

use crate::config::PlagiarismConfig;
use crate::error::{Error, Result};
use crate::fetch::{is_http_url, ContentFetcher};
use crate::similarity::term_frequency_cosine;
use crate::store::Store;
use crate::text::Normalizer;

/// Severity of a single pairwise match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchSeverity {
    High,
    Medium,
    Low,
}

/// Overall verdict for the checked submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Safe,
    Warning,
    Failed,
}

impl ReportStatus {
    /// Display hint carried alongside the status.
    pub fn color(&self) -> &'static str {
        match self {
            ReportStatus::Failed => "error",
            ReportStatus::Warning => "warning",
            ReportStatus::Safe => "success",
        }
    }
}

/// One reportable overlap between the target and another submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionMatch {
    pub submission_id: i64,
    pub project_title: String,
    pub project_id: i64,
    pub similarity_score: f64,
    pub status: MatchSeverity,
    pub content_preview: String,
}

/// Result of checking one submission against the pool.
#[derive(Debug, Clone, Serialize)]
pub struct PlagiarismReport {
    pub submission_id: i64,
    pub project_title: String,
    pub submission_content: String,
    pub plagiarism_score: f64,
    pub status: ReportStatus,
    pub color: &'static str,
    pub matches: Vec<SubmissionMatch>,
    pub total_matches: usize,
    pub message: String,
    pub is_url: bool,
}

/// Scores one submission against every other submission on record.
pub struct PlagiarismChecker {
    store: Arc<Store>,
    fetcher: Box<dyn ContentFetcher>,
    config: PlagiarismConfig,
    normalizer: Normalizer,
}

impl PlagiarismChecker {
    pub fn new(
        store: Arc<Store>,
        fetcher: Box<dyn ContentFetcher>,
        config: PlagiarismConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
            normalizer: Normalizer::for_submissions(),
        }
    }

    /// Builds the full report for `submission_id`.
    ///
    /// Deterministic for a fixed pool and fixed remote contents; linked
    /// documents are re-fetched on every call, nothing is cached.
    pub fn check(&self, submission_id: i64) -> Result<PlagiarismReport> {
        let target = self
            .store
            .submission(submission_id)?
            .filter(|s| !s.content.is_empty())
            .ok_or_else(|| {
                Error::not_found(format!(
                    "submission {} not found or has no content",
                    submission_id
                ))
            })?;

        let is_url = is_http_url(&target.content);
        let target_text = self.resolve_content(&target.content);
        let target_terms = self.normalizer.normalize(&target_text);

        let pool = self.store.submissions_excluding(submission_id)?;
        if pool.is_empty() {
            return Ok(PlagiarismReport {
                submission_id,
                project_title: target.project_title.clone(),
                submission_content: preview(&target.content, 200),
                plagiarism_score: 0.0,
                status: ReportStatus::Safe,
                color: ReportStatus::Safe.color(),
                matches: Vec::new(),
                total_matches: 0,
                message: "No other submissions to compare against".to_string(),
                is_url,
            });
        }

        let mut matches = Vec::new();
        let mut top_score: f64 = 0.0;

        for other in &pool {
            let other_text = self.resolve_content(&other.content);
            let other_terms = self.normalizer.normalize(&other_text);
            let score = term_frequency_cosine(&target_terms, &other_terms) * 100.0;

            if score > self.config.match_floor {
                matches.push(SubmissionMatch {
                    submission_id: other.id,
                    project_title: other.project_title.clone(),
                    project_id: other.project_id,
                    similarity_score: round2(score),
                    status: self.severity(score),
                    content_preview: preview(&other.content, 100),
                });
                top_score = top_score.max(score);
            }
        }

        matches.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let total_matches = matches.len();
        matches.truncate(self.config.max_reported_matches);

        let status = self.verdict(top_score);
        tracing::info!(
            submission = submission_id,
            matches = total_matches,
            score = top_score,
            "plagiarism check finished"
        );
        Ok(PlagiarismReport {
            submission_id,
            project_title: target.project_title.clone(),
            submission_content: preview(&target.content, 200),
            plagiarism_score: round2(top_score),
            status,
            color: status.color(),
            matches,
            total_matches,
            message: format!("Found {} potential matches", total_matches),
            is_url,
        })
    }

    /// Inline text passes through; links are fetched, and a failed fetch
    /// degrades to comparing the raw link text itself.
    fn resolve_content(&self, content: &str) -> String {
        if !is_http_url(content) {
            return content.to_string();
        }
        match self.fetcher.fetch_text(content) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(url = content, error = %err, "fetch failed, comparing raw link");
                content.to_string()
            }
        }
    }

    fn severity(&self, score: f64) -> MatchSeverity {
        if score > self.config.fail_threshold {
            MatchSeverity::High
        } else if score > self.config.warn_threshold {
            MatchSeverity::Medium
        } else {
            MatchSeverity::Low
        }
    }

    fn verdict(&self, top_score: f64) -> ReportStatus {
        if top_score > self.config.fail_threshold {
            ReportStatus::Failed
        } else if top_score > self.config.warn_threshold {
            ReportStatus::Warning
        } else {
            ReportStatus::Safe
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First `limit` characters, with an ellipsis when trimmed.
fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
