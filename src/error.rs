//! Error types and their HTTP mappings.
//!
//! Two layers: [`StoreError`] for storage failures and [`ApiError`] for what
//! clients see. Every failure response carries a `{"error": <message>}` JSON
//! body with status 400 (validation, bad id) or 500 (any store failure).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The per-call deadline elapsed before the store answered.
    #[error("{op} timed out after {deadline:?}")]
    Timeout { op: &'static str, deadline: Duration },

    /// A point lookup matched no document.
    #[error("order {id} not found")]
    NotFound { id: String },

    /// The backend reported a transport, server, or decode error.
    #[error("{op} failed: {message}")]
    Backend { op: &'static str, message: String },
}

/// Errors surfaced to HTTP clients.
///
/// `NotFound` from a point lookup maps to `Persistence` (500) rather than a
/// dedicated 404; existing clients of this API key off that status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or field rule violation.
    #[error("{0}")]
    Validation(String),

    /// Path identifier that does not parse as an ObjectId hex string.
    #[error("invalid order id '{0}'")]
    InvalidId(String),

    /// Any store-layer failure, including timeouts and missing documents.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(%status, "{self}");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::Validation("dish must be 2 to 100 characters".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_id_maps_to_400() {
        let err = ApiError::InvalidId("zzz".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn store_errors_map_to_500() {
        let not_found: ApiError = StoreError::NotFound {
            id: "abc".to_string(),
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout: ApiError = StoreError::Timeout {
            op: "find",
            deadline: Duration::from_secs(100),
        }
        .into();
        assert_eq!(timeout.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_message_names_operation() {
        let err = StoreError::Timeout {
            op: "insert_one",
            deadline: Duration::from_secs(100),
        };
        assert!(err.to_string().contains("insert_one"));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn persistence_error_is_transparent() {
        let err: ApiError = StoreError::NotFound {
            id: "abc".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "order abc not found");
    }
}
