// Re-export main components
pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod matcher;
pub mod model;
pub mod plagiarism;
pub mod similarity;
pub mod store;
pub mod text;
pub mod vectorizer;

// Re-export commonly used types
pub use config::{MatcherConfig, PlagiarismConfig};
pub use error::{Error, Result};
pub use matcher::{AssignmentReport, AutoAssigner};
pub use model::{FacultyProfile, SeedData, Submission, Theme, ThemeSlot};
pub use plagiarism::{PlagiarismChecker, PlagiarismReport};
pub use store::Store;
pub use text::Normalizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
