//! Course Model

use serde::{Deserialize, Serialize};

use crate::sequence::{ItemId, Sequenced};

/// Course entity as returned by `GET /courses/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    /// Modules in display order (array order is authoritative)
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

/// Module of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Number of lessons, when the list endpoint embeds it
    #[serde(default)]
    pub lesson_count: Option<u32>,
}

impl Sequenced for CourseModule {
    fn item_id(&self) -> ItemId {
        ItemId::Int(self.id)
    }
}
