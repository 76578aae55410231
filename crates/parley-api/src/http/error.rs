//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"error": <message>, "code": <CODE>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::RelayError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Relay(RelayError),
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Relay(e @ RelayError::InvalidEmail) => {
                (StatusCode::BAD_REQUEST, "INVALID_EMAIL", e.to_string())
            }
            AppError::Relay(e @ RelayError::MissingField(_)) => {
                (StatusCode::BAD_REQUEST, "MISSING_FIELD", e.to_string())
            }
            AppError::Relay(e @ RelayError::UserNotFound) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", e.to_string())
            }
            AppError::Relay(e @ RelayError::SessionNotFound) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", e.to_string())
            }
            AppError::Relay(e @ RelayError::Upstream(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Relay(RelayError::Storage(e)) => {
                tracing::error!(error = %e, "Document store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Internal storage error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::error::RepositoryError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RelayError::InvalidEmail, StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
            (RelayError::MissingField("message"), StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            (RelayError::UserNotFound, StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            (RelayError::SessionNotFound, StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            (
                RelayError::Upstream("connection refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let (got_status, got_code, _) = AppError::from(err).parts();
            assert_eq!(got_status, status);
            assert_eq!(got_code, code);
        }
    }

    #[test]
    fn test_storage_detail_is_hidden() {
        let err = AppError::from(RelayError::Storage(RepositoryError::Query(
            "disk I/O error at /var/lib/parley.db".into(),
        )));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!message.contains("/var/lib"));
    }

    #[test]
    fn test_upstream_detail_is_shown() {
        let (_, _, message) = AppError::from(RelayError::Upstream("model not found".into())).parts();
        assert_eq!(message, "Model backend error: model not found");
    }
}
