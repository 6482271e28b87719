use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::similarity::cosine;
use crate::store::Store;
use crate::text::{expand_synonyms, Normalizer};
use crate::vectorizer::vectorize;

/// Label recorded on assignments produced by this engine.
const ASSIGNMENT_METHOD: &str = "NLP-TF-IDF";
const ALGORITHM: &str = "TF-IDF Semantic Similarity with Constraint Solving";

/// One faculty-to-theme match, with the score that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeAssignment {
    pub faculty_id: String,
    pub faculty_name: String,
    pub theme_id: i64,
    pub theme_name: String,
    pub score: f64,
    pub interests: String,
    pub method: &'static str,
}

/// Outcome of one auto-assignment run.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
    pub message: String,
    pub assignments: Vec<ThemeAssignment>,
    pub total_processed: usize,
    pub algorithm: &'static str,
}

/// Matches unassigned faculty to themes by interest similarity, greedily
/// and within per-theme capacity.
pub struct AutoAssigner {
    store: Arc<Store>,
    config: MatcherConfig,
    normalizer: Normalizer,
    run_gate: Mutex<()>,
}

impl AutoAssigner {
    pub fn new(store: Arc<Store>, config: MatcherConfig) -> Self {
        Self {
            store,
            config,
            normalizer: Normalizer::for_interests(),
            run_gate: Mutex::new(()),
        }
    }

    /// Computes and persists one batch of assignments.
    ///
    /// The whole compute-then-persist sequence runs under a lock, so
    /// concurrent calls cannot hand out the same theme slot twice. The
    /// final write is a single atomic upsert batch.
    pub fn run(&self) -> Result<AssignmentReport> {
        let _serialized = self.run_gate.lock().unwrap_or_else(|e| e.into_inner());

        let faculty = self.store.unassigned_faculty()?;
        if faculty.is_empty() {
            return Ok(AssignmentReport {
                message: "no unassigned faculty with interests found".to_string(),
                assignments: Vec::new(),
                total_processed: 0,
                algorithm: ALGORITHM,
            });
        }
        let themes = self.store.theme_slots()?;

        // Faculty and theme documents share one vocabulary so their
        // vectors are comparable.
        let mut documents: Vec<Vec<String>> = Vec::with_capacity(faculty.len() + themes.len());
        for member in &faculty {
            documents.push(expand_synonyms(&self.normalizer.normalize(&member.interests)));
        }
        for theme in &themes {
            documents.push(expand_synonyms(
                &self.normalizer.normalize(&theme.matching_text()),
            ));
        }
        let batch = vectorize(&documents);
        let (faculty_vectors, theme_vectors) = batch.vectors.split_at(faculty.len());

        // Occupancy is tracked in memory across the batch, so earlier
        // matches in this run deplete capacity for later ones.
        let mut used: HashMap<i64, u32> = themes.iter().map(|t| (t.id, t.assigned)).collect();
        let mut assignments = Vec::new();

        for (member, vector) in faculty.iter().zip(faculty_vectors) {
            let mut best: Option<(usize, f64)> = None;

            for (index, theme) in themes.iter().enumerate() {
                let taken = used[&theme.id];
                if taken >= theme.capacity {
                    continue;
                }

                let relevance = cosine(vector, &theme_vectors[index]) * 100.0;
                let headroom = f64::from(theme.capacity - taken) / f64::from(theme.capacity);
                let score = relevance + headroom * self.config.load_bonus_weight;

                // strict comparison: on a tie the earliest theme keeps the win
                if score > self.config.min_score && best.map_or(true, |(_, top)| score > top) {
                    best = Some((index, score));
                }
            }

            if let Some((index, score)) = best {
                let theme = &themes[index];
                *used.entry(theme.id).or_insert(0) += 1;
                tracing::debug!(
                    faculty = %member.id,
                    theme = %theme.name,
                    score,
                    "matched faculty to theme"
                );
                assignments.push(ThemeAssignment {
                    faculty_id: member.id.clone(),
                    faculty_name: member.name.clone(),
                    theme_id: theme.id,
                    theme_name: theme.name.clone(),
                    score: (score * 100.0).round() / 100.0,
                    interests: member.interests.clone(),
                    method: ASSIGNMENT_METHOD,
                });
            }
        }

        if !assignments.is_empty() {
            let pairs: Vec<(String, i64)> = assignments
                .iter()
                .map(|a| (a.faculty_id.clone(), a.theme_id))
                .collect();
            self.store.record_assignments(&pairs)?;
        }

        tracing::info!(
            assigned = assignments.len(),
            processed = faculty.len(),
            "auto-assignment finished"
        );
        Ok(AssignmentReport {
            message: format!(
                "auto-assignment completed: {} faculty assigned",
                assignments.len()
            ),
            assignments,
            total_processed: faculty.len(),
            algorithm: ALGORITHM,
        })
    }
}
