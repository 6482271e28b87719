use std::time::Duration;

/// Mentor slots for themes that do not set their own limit.
pub const DEFAULT_THEME_CAPACITY: u32 = 5;

/// Tunables for the faculty-theme matcher.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Combined score a candidate theme must exceed to be assignable.
    pub min_score: f64,
    /// Weight of the free-capacity bonus added to the similarity score.
    pub load_bonus_weight: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: 10.0,
            load_bonus_weight: 20.0,
        }
    }
}

/// Tunables for the plagiarism checker.
#[derive(Debug, Clone)]
pub struct PlagiarismConfig {
    /// Pairwise percentage below which a match is not reported at all.
    pub match_floor: f64,
    /// Above this the pair is MEDIUM and the report at least WARNING.
    pub warn_threshold: f64,
    /// Above this the pair is HIGH and the report FAILED.
    pub fail_threshold: f64,
    /// Matches kept in the report; the total count is still exact.
    pub max_reported_matches: usize,
    /// Timeout for resolving linked submissions.
    pub fetch_timeout: Duration,
    /// Linked documents are cut off after this many characters.
    pub fetch_max_chars: usize,
}

impl Default for PlagiarismConfig {
    fn default() -> Self {
        Self {
            match_floor: 15.0,
            warn_threshold: 30.0,
            fail_threshold: 60.0,
            max_reported_matches: 10,
            fetch_timeout: Duration::from_secs(10),
            fetch_max_chars: 10_000,
        }
    }
}
