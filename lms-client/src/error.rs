//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::sequence::UnknownIdError;
use thiserror::Error;

/// HTTP-level error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a status was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a structured error envelope
    #[error("API error {status} (code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Server error {status}: {message}")]
    Status { status: u16, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status carried by this error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Validation(_) => Some(400),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of the sync gateway (fetch or persist).
///
/// Only the success/failure boundary matters for recovery; `code` is kept
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// No usable response (connection refused, timeout, aborted task)
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("server rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },

    /// Response could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl SyncError {
    /// Short text for a transient notification
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Could not reach the server.",
            Self::Rejected { .. } => "The new order could not be saved.",
            Self::InvalidResponse(_) => "Unexpected server response.",
        }
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                status,
                code,
                message,
            } => Self::Rejected {
                status,
                code,
                message,
            },
            ClientError::Http(e) => match e.status() {
                Some(status) => Self::Rejected {
                    status: status.as_u16(),
                    code: None,
                    message: e.to_string(),
                },
                None => Self::Transport(e.to_string()),
            },
            ClientError::Status { status, message } => Self::Rejected {
                status,
                code: None,
                message,
            },
            ClientError::InvalidResponse(m) => Self::InvalidResponse(m),
            ClientError::Serialization(e) => Self::InvalidResponse(e.to_string()),
            ClientError::Config(m) => Self::Transport(m),
            other => {
                let status = other.status().unwrap_or(500);
                Self::Rejected {
                    status,
                    code: None,
                    message: other.to_string(),
                }
            }
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match &err {
            SyncError::Transport(_) => AppError::with_message(ErrorCode::NetworkError, err.to_string()),
            SyncError::Rejected { status, code, .. } => {
                let app = AppError::with_message(ErrorCode::SyncFailed, err.to_string())
                    .with_detail("status", *status);
                match code {
                    Some(code) => app.with_detail("code", code.code()),
                    None => app,
                }
            }
            SyncError::InvalidResponse(_) => {
                AppError::with_message(ErrorCode::InvalidFormat, err.to_string())
            }
        }
    }
}

/// Errors of a reorder session that abort the current operation.
///
/// Stale move instructions and failed saves are not errors here; they are
/// reported through [`crate::session::ReorderOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// Order and store membership disagree; nothing was applied
    #[error(transparent)]
    UnknownId(#[from] UnknownIdError),

    /// Fetching the collection failed
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// `drop_on` without a preceding `begin_drag`
    #[error("no drag gesture in progress")]
    NotDragging,

    /// Structural edit attempted while a gesture or save is pending
    #[error("collection is busy with a pending reorder")]
    Busy,

    /// The session was closed
    #[error("session closed")]
    Closed,
}
