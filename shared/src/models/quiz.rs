//! Quiz Model

use serde::{Deserialize, Serialize};

use crate::sequence::{ItemId, Sequenced};

/// Question answer format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// Answer option of a choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Question of a quiz
///
/// Question ids are opaque strings on the quiz service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub question_type: QuestionType,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

fn default_points() -> u32 {
    1
}

impl Sequenced for QuizQuestion {
    fn item_id(&self) -> ItemId {
        ItemId::Text(self.id.clone())
    }
}
