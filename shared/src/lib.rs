//! Shared types for the LMS client stack
//!
//! Common types used across crates: the unified error system, API models,
//! and the ordered-collection reordering core.

pub mod error;
pub mod models;
pub mod sequence;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use sequence::{
    CollectionKind, CollectionRef, InvalidMoveError, ItemId, MoveInstruction, OrderedCollection,
    OrderedItem, Sequenced, SequenceStore, Snapshot, UnknownIdError,
};
