use serde::{Deserialize, Serialize};

/// A faculty member as the matcher sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyProfile {
    pub id: String,
    pub name: String,
    /// Free-text research interests; empty means "do not auto-assign".
    #[serde(default)]
    pub interests: String,
}

impl FacultyProfile {
    pub fn new(id: String, name: String, interests: String) -> Self {
        Self {
            id,
            name,
            interests,
        }
    }
}

/// A project theme as configured by the administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Mentor slots; unset themes fall back to the default capacity.
    #[serde(default)]
    pub max_mentors: Option<u32>,
}

impl Theme {
    pub fn new(id: i64, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            max_mentors: None,
        }
    }

    pub fn with_capacity(mut self, max_mentors: u32) -> Self {
        self.max_mentors = Some(max_mentors);
        self
    }
}

/// A theme plus its live occupancy, the matcher's working view.
#[derive(Debug, Clone)]
pub struct ThemeSlot {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub capacity: u32,
    pub assigned: u32,
}

impl ThemeSlot {
    /// The text the matcher vectorizes for this theme.
    pub fn matching_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// One project submission; `content` is either inline text or a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub project_id: i64,
    pub project_title: String,
    pub content: String,
}

impl Submission {
    pub fn new(id: i64, project_id: i64, project_title: String, content: String) -> Self {
        Self {
            id,
            project_id,
            project_title,
            content,
        }
    }
}

/// Payload of a seed file consumed by `mentormatch import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub faculty: Vec<FacultyProfile>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}
