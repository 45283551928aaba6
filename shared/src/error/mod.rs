//! Error codes and the response envelope spoken by the LMS API
//!
//! Codes are `u16` and grouped by thousands: 0xxx general, 1xxx auth,
//! 2xxx permission, 3xxx course, 4xxx module/lesson, 5xxx quiz,
//! 6xxx sequence (ordering), 9xxx system.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::UnknownId, "lesson 9 is not in module 3")
//!     .with_detail("lesson_id", 9);
//!
//! let response = ApiResponse::<()>::from(err);
//! assert_eq!(response.code, Some(6002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, Details};
