//! Numeric error codes
//!
//! One table defines each code's variant, wire value and stock message; the
//! enum, [`ErrorCode::message`] and the `u16` conversion are generated from it
//! so the three can never drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($( $(#[$meta:meta])* $name:ident = $value:literal => $message:literal, )*) => {
        /// Error code carried in `ApiResponse.code`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )*
        }

        impl ErrorCode {
            /// Every defined code, in table order
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name),*];

            /// Developer-facing English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )*
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )*
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx general
    Success = 0 => "OK",
    Unknown = 1 => "Unexpected error",
    ValidationFailed = 2 => "Request failed validation",
    NotFound = 3 => "Not found",
    AlreadyExists = 4 => "Already exists",
    InvalidRequest = 5 => "Malformed request",
    InvalidFormat = 6 => "Unexpected data format",
    RequiredField = 7 => "A required field is missing",
    /// The resource changed under a concurrent write
    Conflict = 8 => "Resource was modified concurrently",

    // 1xxx auth
    NotAuthenticated = 1001 => "Sign-in required",
    TokenExpired = 1003 => "Session token expired",
    TokenInvalid = 1004 => "Session token rejected",

    // 2xxx permission
    PermissionDenied = 2001 => "Not allowed",
    /// Only course instructors may restructure content
    InstructorRequired = 2002 => "Instructor role required",
    AdminRequired = 2003 => "Administrator role required",

    // 3xxx course
    CourseNotFound = 3001 => "Course not found",
    /// Published courses are locked for structural edits
    CoursePublished = 3002 => "Course is published and cannot be restructured",

    // 4xxx module / lesson
    ModuleNotFound = 4001 => "Module not found",
    LessonNotFound = 4101 => "Lesson not found",
    LessonModuleMismatch = 4102 => "Lesson belongs to another module",

    // 5xxx quiz
    QuizNotFound = 5001 => "Quiz not found",
    QuestionNotFound = 5101 => "Question not found",

    // 6xxx sequence
    /// Move names an item outside the collection
    InvalidMove = 6001 => "Invalid move instruction",
    /// Order names unknown ids or changes membership
    UnknownId = 6002 => "Order does not match collection membership",
    DuplicateId = 6003 => "Duplicate item id in collection",
    SyncFailed = 6004 => "Failed to save the new order",

    // 9xxx system
    InternalError = 9001 => "Internal server error",
    DatabaseError = 9002 => "Storage error",
    NetworkError = 9003 => "Server unreachable",
    TimeoutError = 9004 => "Request timed out",
    ConfigError = 9005 => "Client misconfigured",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A `u16` that is not in the code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);
