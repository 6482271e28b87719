use std::collections::{HashMap, HashSet};

lazy_static::lazy_static! {
    /// Stopwords for the interest/theme matching path.
    static ref MATCHING_STOPWORDS: HashSet<&'static str> = [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
        "of", "with", "by",
    ]
    .iter()
    .copied()
    .collect();

    /// Matching stopwords plus be-verbs and protocol noise; submission
    /// text is frequently a pasted link or a scraped page.
    static ref SUBMISSION_STOPWORDS: HashSet<&'static str> = [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
        "of", "with", "by", "is", "are", "was", "were", "http", "https",
        "www", "com",
    ]
    .iter()
    .copied()
    .collect();

    /// Abbreviations expanded into their long forms before vectorizing
    /// interests and theme descriptions.
    static ref SYNONYMS: HashMap<&'static str, Vec<&'static str>> = [
        ("ml", vec!["machine", "learning", "machinelearning"]),
        ("ai", vec!["artificial", "intelligence", "artificialintelligence"]),
        ("dl", vec!["deep", "learning", "deeplearning"]),
        ("nlp", vec!["natural", "language", "processing"]),
        ("cv", vec!["computer", "vision"]),
        ("iot", vec!["internet", "things", "embedded"]),
        ("cloud", vec!["aws", "azure", "gcp", "distributed"]),
        ("blockchain", vec!["crypto", "distributed", "ledger"]),
        ("data", vec!["analytics", "science", "mining"]),
        ("web", vec!["frontend", "backend", "fullstack"]),
        ("mobile", vec!["android", "ios", "app"]),
        ("security", vec!["cyber", "cryptography", "encryption"]),
    ]
    .into_iter()
    .collect();
}

/// Splits free text into the normalized terms the similarity engine
/// consumes.
pub struct Normalizer {
    stopwords: &'static HashSet<&'static str>,
}

impl Normalizer {
    /// Profile for faculty interests and theme descriptions.
    pub fn for_interests() -> Self {
        Self {
            stopwords: &MATCHING_STOPWORDS,
        }
    }

    /// Profile for submission documents.
    pub fn for_submissions() -> Self {
        Self {
            stopwords: &SUBMISSION_STOPWORDS,
        }
    }

    /// Lowercases, strips everything outside `[a-z0-9\s]`, splits on
    /// whitespace, then drops stopwords and terms shorter than 3 chars.
    ///
    /// Punctuation is deleted rather than replaced, so "machine-learning"
    /// collapses to "machinelearning". Never fails; unusable input yields
    /// an empty vec.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|term| term.len() > 2 && !self.stopwords.contains(term))
            .map(str::to_string)
            .collect()
    }
}

/// Adds the long forms for every abbreviation present in `terms`.
///
/// The result is a deduplicated union: original terms in first-seen
/// order, then table values. Applying it twice yields the same terms.
pub fn expand_synonyms(terms: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut expanded: Vec<String> = Vec::with_capacity(terms.len());

    for term in terms {
        if seen.insert(term.as_str()) {
            expanded.push(term.clone());
        }
    }
    for term in terms {
        if let Some(long_forms) = SYNONYMS.get(term.as_str()) {
            for &long_form in long_forms {
                if seen.insert(long_form) {
                    expanded.push(long_form.to_string());
                }
            }
        }
    }
    expanded
}
