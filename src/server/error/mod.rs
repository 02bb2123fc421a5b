//! Error types for the Pushmanager server application.
//!
//! All errors implement `IntoResponse` for Axum HTTP responses and use `thiserror` for
//! `Display` and `Error` implementations.

pub mod api;
pub mod config;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{api::ApiError, config::ConfigError},
};

/// Main error type for the Pushmanager server application.
///
/// Aggregates domain errors and external library errors into a single type so handlers
/// can use `?` throughout. The `IntoResponse` implementation maps each category to an
/// HTTP status code.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables, bad cookie secret).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Internal API call failed.
    #[error(transparent)]
    ApiError(#[from] ApiError),
    /// A handler needed the database but the application was built without one.
    #[error("Database has not been initialized for this application")]
    DatabaseNotInitialized,
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Template loading or rendering error.
    #[error(transparent)]
    TemplateError(#[from] tera::Error),
    /// Database error (query failures, connection issues, migrations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// I/O error (binding the listener, serving connections).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 502 Bad Gateway - The internal API call failed
/// - 503 Service Unavailable - No database configured
/// - 500 Internal Server Error - Everything else (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::ApiError(err) => err.into_response(),
            Self::DatabaseNotInitialized => {
                tracing::error!("{}", Self::DatabaseNotInitialized);

                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorDto {
                        error: "Database unavailable".to_string(),
                    }),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client to avoid leaking
/// implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
