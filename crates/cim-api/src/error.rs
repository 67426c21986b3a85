//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors to HTTP status codes and renders the wire envelope
//! `{"success": false, "message": "..."}` used across the API surface.
//!
//! Status mapping: validation → 400, auth → 401, not-found → 404,
//! external-dependency → 500 (message passed through verbatim, a
//! documented property of this API), unconfigured collaborator → 503,
//! internal → 500 with the message hidden and logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
///
/// Every error response uses this envelope; success responses carry
/// `"success": true` alongside their payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false` for errors.
    pub success: bool,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorBody {
    /// Build the envelope for a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (400).
    #[error("{0}")]
    Validation(String),

    /// Authentication failure — bad credentials or missing/invalid/expired
    /// token (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// An external collaborator (store or media host) failed (500).
    /// The message is passed through to the client verbatim.
    #[error("{0}")]
    Dependency(String),

    /// A required collaborator is not configured on this deployment (503).
    #[error("{0}")]
    Unconfigured(String),

    /// Internal server error (500). Message is logged but not returned to
    /// the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal errors never leak their message to clients; dependency
        // errors pass theirs through by design.
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Domain validation errors map straight to 400s.
impl From<cim_core::ValidationError> for AppError {
    fn from(err: cim_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Store failures are external-dependency errors; the message passes
/// through verbatim.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Dependency(err.to_string())
    }
}

/// Media host failures are external-dependency errors.
impl From<cim_media_client::MediaError> for AppError {
    fn from(err: cim_media_client::MediaError) -> Self {
        Self::Dependency(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Dependency("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unconfigured("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn validation_renders_envelope() {
        let (status, body) = response_parts(AppError::Validation("No file uploaded".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.message, "No file uploaded");
    }

    #[tokio::test]
    async fn dependency_message_passes_through_verbatim() {
        let (status, body) =
            response_parts(AppError::Dependency("media host returned 507".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "media host returned 507");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("db password leaked".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "An internal error occurred");
        assert!(!body.message.contains("db password"));
    }

    #[test]
    fn validation_error_converts_from_core() {
        let core_err = cim_core::ValidationError::InvalidStatus("closed".to_string());
        let app_err = AppError::from(core_err);
        match &app_err {
            AppError::Validation(msg) => assert!(msg.contains("closed")),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }
}
