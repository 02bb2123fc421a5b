//! Errors reported by the internal JSON API client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Failure of a call to the internal API.
///
/// Carried inside [`ApiResponse::error`](crate::server::api::ApiResponse) rather than
/// returned directly, so every variant is cheap to clone and can be injected by tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout).
    #[error("API request failed: {0}")]
    Transport(String),
    /// The API answered with a non-success status code.
    #[error("API responded with status {status}: {body}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The API answered but the body could not be decoded.
    #[error("Failed to decode API response: {0}")]
    Decode(String),
    /// The client dropped the callback without invoking it.
    #[error("API client finished without delivering a response")]
    CallbackDropped,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("{}", self);

        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorDto {
                error: "Upstream API request failed".to_string(),
            }),
        )
            .into_response()
    }
}
