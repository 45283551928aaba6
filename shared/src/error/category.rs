//! Error categories, one per thousand-block of codes

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Domain an error code belongs to. 7xxx and above count as system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Course,
    /// Modules and the lessons inside them
    Module,
    Quiz,
    /// Ordering of collections
    Sequence,
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            2 => Self::Permission,
            3 => Self::Course,
            4 => Self::Module,
            5 => Self::Quiz,
            6 => Self::Sequence,
            _ => Self::System,
        }
    }

    /// Name as used in logs and serialized payloads
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Course => "course",
            Self::Module => "module",
            Self::Quiz => "quiz",
            Self::Sequence => "sequence",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks() {
        let cases = [
            (0, ErrorCategory::General),
            (999, ErrorCategory::General),
            (1004, ErrorCategory::Auth),
            (2002, ErrorCategory::Permission),
            (3002, ErrorCategory::Course),
            (4101, ErrorCategory::Module),
            (5101, ErrorCategory::Quiz),
            (6003, ErrorCategory::Sequence),
            (7000, ErrorCategory::System),
            (9005, ErrorCategory::System),
            (u16::MAX, ErrorCategory::System),
        ];
        for (code, category) in cases {
            assert_eq!(ErrorCategory::from_code(code), category, "code {code}");
        }
    }

    #[test]
    fn test_code_category() {
        assert_eq!(ErrorCode::LessonModuleMismatch.category(), ErrorCategory::Module);
        assert_eq!(ErrorCode::SyncFailed.category(), ErrorCategory::Sequence);
        assert_eq!(ErrorCode::TimeoutError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_serialized_name_matches_name() {
        for category in [ErrorCategory::Sequence, ErrorCategory::Quiz, ErrorCategory::Auth] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }
}
