//! Error types at the HTTP and handler seams.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that end a webhook request with a non-200 status.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Secret header missing or mismatched.
    #[error("invalid secret token")]
    Unauthorized,
    /// Body is not JSON, or does not have the shape of an update.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// JSON response body for rejected requests.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: &'static str,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Parser detail stays in the logs.
        let (status, body) = match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: "unauthorized",
                    message: "Invalid secret token",
                },
            ),
            Self::MalformedPayload(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "bad_request",
                    message: "Invalid update format",
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Failure reported by an output handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sink responded with {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{0}")]
    Other(String),
}
