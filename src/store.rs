use std::collections::HashMap;
use std::path::Path;

use sled::transaction::{TransactionError, TransactionResult};
use sled::Db;
use thiserror::Error;

use crate::config::DEFAULT_THEME_CAPACITY;
use crate::model::{FacultyProfile, Submission, Theme, ThemeSlot};

const FACULTY_TREE: &str = "faculty";
const THEME_TREE: &str = "themes";
const SUBMISSION_TREE: &str = "submissions";
const ASSIGNMENT_TREE: &str = "assignments";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sled::Error),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("assignment batch aborted: {0}")]
    Transaction(String),
}

/// Sled-backed storage for faculty, themes, submissions and the
/// faculty-to-theme assignment map.
///
/// Keys are faculty ids as bytes and numeric ids big-endian; for the
/// non-negative ids used here that makes every iteration below walk
/// records in id order.
pub struct Store {
    db: Db,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Ephemeral database for tests and dry runs.
    pub fn temporary() -> Result<Self, StoreError> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Ok(Self { db })
    }

    // ========== Seeding ==========

    pub fn put_faculty(&self, faculty: &FacultyProfile) -> Result<(), StoreError> {
        let tree = self.db.open_tree(FACULTY_TREE)?;
        tree.insert(faculty.id.as_bytes(), bincode::serialize(faculty)?)?;
        Ok(())
    }

    pub fn put_theme(&self, theme: &Theme) -> Result<(), StoreError> {
        let tree = self.db.open_tree(THEME_TREE)?;
        tree.insert(theme.id.to_be_bytes(), bincode::serialize(theme)?)?;
        Ok(())
    }

    pub fn put_submission(&self, submission: &Submission) -> Result<(), StoreError> {
        let tree = self.db.open_tree(SUBMISSION_TREE)?;
        tree.insert(submission.id.to_be_bytes(), bincode::serialize(submission)?)?;
        Ok(())
    }

    // ========== Matcher views ==========

    /// Faculty with usable interests and no current theme, in id order.
    pub fn unassigned_faculty(&self) -> Result<Vec<FacultyProfile>, StoreError> {
        let faculty_tree = self.db.open_tree(FACULTY_TREE)?;
        let assignment_tree = self.db.open_tree(ASSIGNMENT_TREE)?;

        let mut result = Vec::new();
        for item in faculty_tree.iter() {
            let (key, value) = item?;
            if assignment_tree.contains_key(&key)? {
                continue;
            }
            let faculty: FacultyProfile = bincode::deserialize(&value)?;
            if !faculty.interests.is_empty() {
                result.push(faculty);
            }
        }
        Ok(result)
    }

    /// Every theme with its capacity (default applied) and live count.
    pub fn theme_slots(&self) -> Result<Vec<ThemeSlot>, StoreError> {
        let theme_tree = self.db.open_tree(THEME_TREE)?;
        let counts = self.assignment_counts()?;

        let mut slots = Vec::new();
        for item in theme_tree.iter() {
            let (_, value) = item?;
            let theme: Theme = bincode::deserialize(&value)?;
            let assigned = counts.get(&theme.id).copied().unwrap_or(0);
            slots.push(ThemeSlot {
                id: theme.id,
                name: theme.name,
                description: theme.description,
                capacity: theme.max_mentors.unwrap_or(DEFAULT_THEME_CAPACITY),
                assigned,
            });
        }
        Ok(slots)
    }

    fn assignment_counts(&self) -> Result<HashMap<i64, u32>, StoreError> {
        let tree = self.db.open_tree(ASSIGNMENT_TREE)?;
        let mut counts = HashMap::new();
        for item in tree.iter() {
            let (_, value) = item?;
            let theme_id: i64 = bincode::deserialize(&value)?;
            *counts.entry(theme_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Current theme for one faculty member, if any.
    pub fn assignment(&self, faculty_id: &str) -> Result<Option<i64>, StoreError> {
        let tree = self.db.open_tree(ASSIGNMENT_TREE)?;
        match tree.get(faculty_id.as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Upserts a whole batch of assignments in one transaction.
    ///
    /// A faculty member's previous theme is replaced, and nothing lands
    /// if any write fails.
    pub fn record_assignments(&self, batch: &[(String, i64)]) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let tree = self.db.open_tree(ASSIGNMENT_TREE)?;
        let mut encoded = Vec::with_capacity(batch.len());
        for (faculty_id, theme_id) in batch {
            encoded.push((faculty_id.as_bytes(), bincode::serialize(theme_id)?));
        }

        let result: TransactionResult<()> = tree.transaction(|tx| {
            for (key, value) in &encoded {
                tx.insert(*key, value.as_slice())?;
            }
            Ok(())
        });
        match result {
            Ok(()) => {
                tree.flush()?;
                Ok(())
            }
            Err(TransactionError::Abort(())) => {
                Err(StoreError::Transaction("batch aborted".to_string()))
            }
            Err(TransactionError::Storage(e)) => Err(StoreError::Db(e)),
        }
    }

    // ========== Plagiarism views ==========

    pub fn submission(&self, id: i64) -> Result<Option<Submission>, StoreError> {
        let tree = self.db.open_tree(SUBMISSION_TREE)?;
        match tree.get(id.to_be_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// All other submissions that carry content, in id order.
    pub fn submissions_excluding(&self, id: i64) -> Result<Vec<Submission>, StoreError> {
        let tree = self.db.open_tree(SUBMISSION_TREE)?;
        let mut result = Vec::new();
        for item in tree.iter() {
            let (_, value) = item?;
            let submission: Submission = bincode::deserialize(&value)?;
            if submission.id != id && !submission.content.is_empty() {
                result.push(submission);
            }
        }
        Ok(result)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_roundtrip_and_unassigned_filter() -> Result<(), StoreError> {
        let store = Store::temporary()?;
        store.put_faculty(&FacultyProfile::new(
            "FAC001".to_string(),
            "Asha Rao".to_string(),
            "machine learning".to_string(),
        ))?;
        store.put_faculty(&FacultyProfile::new(
            "FAC002".to_string(),
            "Vikram Shetty".to_string(),
            String::new(),
        ))?;
        store.put_faculty(&FacultyProfile::new(
            "FAC003".to_string(),
            "Meera Iyer".to_string(),
            "distributed systems".to_string(),
        ))?;
        store.record_assignments(&[("FAC003".to_string(), 1)])?;

        let unassigned = store.unassigned_faculty()?;
        let ids: Vec<&str> = unassigned.iter().map(|f| f.id.as_str()).collect();
        // FAC002 has no interests, FAC003 already holds a theme
        assert_eq!(ids, vec!["FAC001"]);
        Ok(())
    }

    #[test]
    fn test_theme_slots_apply_default_capacity_and_counts() -> Result<(), StoreError> {
        let store = Store::temporary()?;
        store.put_theme(&Theme::new(
            1,
            "Machine Learning".to_string(),
            "AI and deep learning".to_string(),
        ))?;
        store.put_theme(
            &Theme::new(2, "Blockchain".to_string(), "Smart contracts".to_string())
                .with_capacity(2),
        )?;
        store.record_assignments(&[("FAC001".to_string(), 2)])?;

        let slots = store.theme_slots()?;
        assert_eq!(slots.len(), 2);

        assert_eq!(slots[0].id, 1);
        assert_eq!(slots[0].capacity, DEFAULT_THEME_CAPACITY);
        assert_eq!(slots[0].assigned, 0);

        assert_eq!(slots[1].id, 2);
        assert_eq!(slots[1].capacity, 2);
        assert_eq!(slots[1].assigned, 1);
        Ok(())
    }

    #[test]
    fn test_theme_slots_iterate_in_id_order() -> Result<(), StoreError> {
        let store = Store::temporary()?;
        store.put_theme(&Theme::new(3, "Robotics".to_string(), String::new()))?;
        store.put_theme(&Theme::new(1, "Vision".to_string(), String::new()))?;
        store.put_theme(&Theme::new(2, "Networks".to_string(), String::new()))?;

        let slots = store.theme_slots()?;
        let ids: Vec<i64> = slots.iter().map(|s| s.id).collect();
        // big-endian keys keep non-negative ids in ascending order
        assert_eq!(ids, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_record_assignments_upserts() -> Result<(), StoreError> {
        let store = Store::temporary()?;
        store.put_theme(&Theme::new(1, "One".to_string(), String::new()))?;
        store.put_theme(&Theme::new(2, "Two".to_string(), String::new()))?;

        store.record_assignments(&[("FAC001".to_string(), 1)])?;
        assert_eq!(store.assignment("FAC001")?, Some(1));

        store.record_assignments(&[("FAC001".to_string(), 2)])?;
        assert_eq!(store.assignment("FAC001")?, Some(2));

        let slots = store.theme_slots()?;
        assert_eq!(slots[0].assigned, 0);
        assert_eq!(slots[1].assigned, 1);
        Ok(())
    }

    #[test]
    fn test_submission_pool_excludes_target_and_empty() -> Result<(), StoreError> {
        let store = Store::temporary()?;
        store.put_submission(&Submission::new(
            1,
            10,
            "Target".to_string(),
            "solar power grid".to_string(),
        ))?;
        store.put_submission(&Submission::new(
            2,
            20,
            "Blank".to_string(),
            String::new(),
        ))?;
        store.put_submission(&Submission::new(
            3,
            30,
            "Other".to_string(),
            "underwater robotics".to_string(),
        ))?;

        let pool = store.submissions_excluding(1)?;
        let ids: Vec<i64> = pool.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);

        assert!(store.submission(1)?.is_some());
        assert!(store.submission(99)?.is_none());
        Ok(())
    }
}
