use std::collections::{HashMap, HashSet};

/// The distinct terms across one batch of documents, in first-seen order.
///
/// Scoped to a single similarity run and rebuilt for every batch; there
/// is no persistent vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    fn insert(&mut self, term: &str) {
        if !self.positions.contains_key(term) {
            self.positions.insert(term.to_string(), self.terms.len());
            self.terms.push(term.to_string());
        }
    }

    pub fn position(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// TF-IDF weights for one batch of documents over a shared vocabulary.
///
/// Vectors are dense and aligned to the vocabulary, so a term absent
/// from a document is an explicit zero and any two vectors of the batch
/// can be compared directly.
#[derive(Debug, Clone)]
pub struct TfIdfBatch {
    pub vectors: Vec<Vec<f64>>,
    pub vocabulary: Vocabulary,
}

/// Builds TF-IDF vectors for `documents`, each a list of normalized terms.
///
/// `tf = count / max(1, doc_len)` and `idf = ln(docs / (1 + docs_with_term))`.
/// The idf goes negative for near-universal terms, which is kept as-is:
/// it actively down-weights terms that carry no signal within the batch.
pub fn vectorize(documents: &[Vec<String>]) -> TfIdfBatch {
    let mut vocabulary = Vocabulary::default();
    for doc in documents {
        for term in doc {
            vocabulary.insert(term);
        }
    }

    let mut doc_frequency: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        let distinct: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in distinct {
            *doc_frequency.entry(term).or_insert(0) += 1;
        }
    }

    let num_docs = documents.len() as f64;
    let mut idf = vec![0.0; vocabulary.len()];
    for (position, term) in vocabulary.terms().iter().enumerate() {
        let with_term = doc_frequency[term.as_str()] as f64;
        idf[position] = (num_docs / (1.0 + with_term)).ln();
    }

    let vectors = documents
        .iter()
        .map(|doc| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for term in doc {
                *counts.entry(term.as_str()).or_insert(0) += 1;
            }

            let denominator = doc.len().max(1) as f64;
            let mut vector = vec![0.0; vocabulary.len()];
            for (term, count) in counts {
                if let Some(position) = vocabulary.position(term) {
                    vector[position] = (count as f64 / denominator) * idf[position];
                }
            }
            vector
        })
        .collect();

    TfIdfBatch { vectors, vocabulary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_vocabulary_is_union_in_first_seen_order() {
        let documents = vec![doc("solar grid"), doc("grid battery")];
        let batch = vectorize(&documents);
        assert_eq!(
            batch.vocabulary.terms().to_vec(),
            vec!["solar", "grid", "battery"]
        );
    }

    #[test]
    fn test_vectors_align_to_the_vocabulary() {
        let documents = vec![doc("solar grid"), doc("grid battery")];
        let batch = vectorize(&documents);

        assert_eq!(batch.vectors.len(), 2);
        for vector in &batch.vectors {
            assert_eq!(vector.len(), batch.vocabulary.len());
        }
        // "battery" never occurs in the first document
        let position = batch.vocabulary.position("battery").unwrap();
        assert_eq!(batch.vectors[0][position], 0.0);
    }

    #[test]
    fn test_ubiquitous_terms_get_negative_weight() {
        let documents = vec![doc("common rare1"), doc("common rare2")];
        let batch = vectorize(&documents);

        // df = 2 of 2 docs, so idf = ln(2/3) < 0
        let common = batch.vocabulary.position("common").unwrap();
        assert!(batch.vectors[0][common] < 0.0);

        // df = 1 of 2 docs means idf = ln(2/2) = 0
        let rare = batch.vocabulary.position("rare1").unwrap();
        assert_eq!(batch.vectors[0][rare], 0.0);
    }

    #[test]
    fn test_term_frequency_scales_with_repetition() {
        let documents = vec![doc("grid grid solar"), doc("wind"), doc("wave")];
        let batch = vectorize(&documents);

        // same idf, twice the frequency
        let grid = batch.vocabulary.position("grid").unwrap();
        let solar = batch.vocabulary.position("solar").unwrap();
        let vector = &batch.vectors[0];
        assert!(vector[grid] > 0.0);
        assert!((vector[grid] - 2.0 * vector[solar]).abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch() {
        let batch = vectorize(&[]);
        assert!(batch.vectors.is_empty());
        assert!(batch.vocabulary.is_empty());
    }

    #[test]
    fn test_empty_document_yields_a_zero_vector() {
        let documents = vec![doc(""), doc("solar")];
        let batch = vectorize(&documents);

        assert_eq!(batch.vectors[0], vec![0.0]);
        assert_eq!(batch.vocabulary.len(), 1);
    }
}
