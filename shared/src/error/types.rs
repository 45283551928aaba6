//! `AppError` and the `ApiResponse` envelope
//!
//! LMS endpoints answer `{code, message, data?, details?}`. A missing `code`
//! counts as success; some older read endpoints skip the envelope entirely
//! and return the resource bare, which callers handle themselves.

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Free-form diagnostic fields (offending ids, collection, upstream status)
pub type Details = HashMap<String, Value>;

/// Coded error as exchanged with the LMS backend
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Details>,
}

impl AppError {
    /// Error carrying the code's stock message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one diagnostic field; later values for the same key win
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Details::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref()?.get(key)
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// `0` or absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: "OK".into(),
            data: Some(data),
            details: None,
        }
    }

    /// Error code of this response, if it is one this crate knows
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code.and_then(|c| ErrorCode::try_from(c).ok())
    }

    pub fn is_success(&self) -> bool {
        matches!(self.code, None | Some(0))
    }
}

impl ApiResponse<()> {
    /// Success without payload, as returned by write endpoints
    pub fn ok() -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: "OK".into(),
            data: None,
            details: None,
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "Request failed");
        }
        (status, axum::Json(ApiResponse::<()>::from(self))).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error_code() {
            _ if self.is_success() => StatusCode::OK,
            Some(code) => code.http_status(),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_stock_and_custom_messages() {
        let err = AppError::new(ErrorCode::ModuleNotFound);
        assert_eq!(err.message, "Module not found");
        assert!(err.details.is_none());

        let err = AppError::with_message(ErrorCode::UnknownId, "lesson 9 is not in module 3");
        assert_eq!(err.to_string(), "lesson 9 is not in module 3");
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::validation("order mismatch")
            .with_detail("collection", "module_ids")
            .with_detail("missing", 3)
            .with_detail("missing", 4);

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.detail("collection").unwrap(), "module_ids");
        assert_eq!(err.detail("missing").unwrap(), 4);
        assert!(err.detail("nope").is_none());
    }

    #[test]
    fn test_envelope_from_error() {
        let err = AppError::with_message(ErrorCode::DuplicateId, "id 4 listed twice").with_detail("id", 4);
        let response: ApiResponse<Value> = err.into();

        assert_eq!(response.code, Some(6003));
        assert_eq!(response.error_code(), Some(ErrorCode::DuplicateId));
        assert!(!response.is_success());
        assert!(response.data.is_none());
        assert_eq!(response.details.unwrap()["id"], 4);
    }

    #[test]
    fn test_success_envelope_wire_shape() {
        let json = serde_json::to_value(ApiResponse::success(vec![12, 10, 11])).unwrap();
        assert_eq!(json, serde_json::json!({"code": 0, "message": "OK", "data": [12, 10, 11]}));

        let json = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"code": 0, "message": "OK"}));
    }

    #[test]
    fn test_envelope_without_code_is_success() {
        let response: ApiResponse<Value> =
            serde_json::from_str(r#"{"message":"OK","data":{"id":4}}"#).unwrap();
        assert!(response.is_success());
        assert_eq!(response.data.unwrap()["id"], 4);
    }

    #[test]
    fn test_unrecognised_code_is_failure() {
        let response: ApiResponse<()> =
            serde_json::from_str(r#"{"code":4242,"message":"teapot"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error_code(), None);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::new(ErrorCode::CoursePublished).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiResponse::success(()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = ApiResponse::<()>::from(AppError::new(ErrorCode::TokenExpired)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
