//! Lesson Model

use serde::{Deserialize, Serialize};

use crate::sequence::{ItemId, Sequenced};

/// Lesson content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[default]
    Text,
    Video,
    Quiz,
    Assignment,
}

/// Lesson of a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    #[serde(default, rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Visible to students who have not enrolled
    #[serde(default)]
    pub is_preview: bool,
}

impl Sequenced for Lesson {
    fn item_id(&self) -> ItemId {
        ItemId::Int(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_deserialize_defaults() {
        let json = r#"{"id": 3, "module_id": 1, "title": "Ownership", "type": "video"}"#;
        let lesson: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.lesson_type, LessonType::Video);
        assert_eq!(lesson.duration_minutes, None);
        assert!(!lesson.is_preview);
        assert_eq!(lesson.item_id(), ItemId::Int(3));
    }
}
