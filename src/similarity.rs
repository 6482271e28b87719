use std::collections::HashMap;

/// Cosine of the angle between two aligned dense vectors.
///
/// Returns 0.0 when either magnitude is zero; comparing against an empty
/// document is a defined low-information result, not an error.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    dot / (magnitude_a * magnitude_b)
}

/// Pairwise cosine over raw term counts, without idf weighting.
///
/// The plagiarism path compares one target against a pool that grows
/// over time; batch idf would make a pair's score drift as unrelated
/// submissions arrive, so each pair is scored from its own two count
/// vectors alone.
pub fn term_frequency_cosine(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(a);
    let counts_b = term_counts(b);

    let dot: f64 = counts_a
        .iter()
        .filter_map(|(term, &n)| counts_b.get(term).map(|&m| (n * m) as f64))
        .sum();
    let magnitude_a = magnitude(&counts_a);
    let magnitude_b = magnitude(&counts_b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    dot / (magnitude_a * magnitude_b)
}

fn term_counts(terms: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }
    counts
}

fn magnitude(counts: &HashMap<&str, usize>) -> f64 {
    counts.values().map(|&n| (n * n) as f64).sum::<f64>().sqrt()
}
