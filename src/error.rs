//! Error handling for the backend.
//!
//! Every fallible handler returns [`AppError`], which maps onto the small set
//! of status codes the HTTP surface exposes. The response body is always
//! `{ "error": <message>, "status": <code> }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body is missing a required field or a field is malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// No session token accompanied a protected request.
    #[error("Access denied. No token provided.")]
    Unauthenticated,

    /// A session token was presented but failed verification.
    #[error("Invalid or expired token.")]
    Forbidden,

    /// The addressed document does not exist. Carries the resource noun.
    #[error("{0} not found.")]
    NotFound(&'static str),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(err) => {
                // The cause goes to the log, never to the client.
                tracing::error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn maps_errors_to_expected_status_codes() {
        assert_eq!(
            status_of(AppError::InvalidInput("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::NotFound("Service")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(AppError::NotFound("Review").to_string(), "Review not found.");
    }

    #[test]
    fn internal_error_display_carries_cause_for_logs() {
        // The HTTP body stays generic; only Display (used in logs) sees the cause.
        let error = AppError::Internal(anyhow::anyhow!("disk on fire"));
        assert!(error.to_string().contains("disk on fire"));
    }
}
