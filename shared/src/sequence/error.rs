//! Sequence errors

use thiserror::Error;

use super::types::ItemId;
use crate::error::{AppError, ErrorCode};

/// A move instruction that cannot be applied to the current collection.
///
/// Usually a stale drag event; callers log and drop it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMoveError {
    /// The dragged item is not in the collection
    #[error("item {id} is not in collection {parent_id}")]
    UnknownItem { id: ItemId, parent_id: ItemId },

    /// The drop target is not in the collection (e.g. a lesson of another module)
    #[error("target {target_id} does not belong to collection {parent_id}")]
    ForeignTarget { target_id: ItemId, parent_id: ItemId },
}

/// A requested order that does not match the store's membership exactly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownIdError {
    /// An id in the order is not a member of the collection
    #[error("unknown id {0}")]
    Unknown(ItemId),

    /// A member of the collection is absent from the order
    #[error("id {0} missing from order")]
    Missing(ItemId),

    /// An id appears more than once
    #[error("duplicate id {0}")]
    Duplicate(ItemId),
}

impl From<InvalidMoveError> for AppError {
    fn from(err: InvalidMoveError) -> Self {
        let app = AppError::with_message(ErrorCode::InvalidMove, err.to_string());
        match err {
            InvalidMoveError::UnknownItem { id, parent_id } => app
                .with_detail("id", id.to_string())
                .with_detail("parent_id", parent_id.to_string()),
            InvalidMoveError::ForeignTarget {
                target_id,
                parent_id,
            } => app
                .with_detail("target_id", target_id.to_string())
                .with_detail("parent_id", parent_id.to_string()),
        }
    }
}

impl From<UnknownIdError> for AppError {
    fn from(err: UnknownIdError) -> Self {
        let (code, id) = match &err {
            UnknownIdError::Unknown(id) | UnknownIdError::Missing(id) => {
                (ErrorCode::UnknownId, id)
            }
            UnknownIdError::Duplicate(id) => (ErrorCode::DuplicateId, id),
        };
        let id = id.to_string();
        AppError::with_message(code, err.to_string()).with_detail("id", id)
    }
}
