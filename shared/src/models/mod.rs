//! Data models
//!
//! Payload types of the LMS REST API consumed by the client. Ordering
//! fields sent by the server are ignored; the array order of a parent's
//! children is the order.

pub mod course;
pub mod lesson;
pub mod quiz;
pub mod reorder;

// Re-exports
pub use course::*;
pub use lesson::*;
pub use quiz::*;
pub use reorder::*;
