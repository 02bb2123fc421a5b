use std::time::Duration;

use pushmanager::server::error::{api::ApiError, Error};
use thiserror::Error;

/// Boxed cause of a setup or teardown failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum TestError {
    /// A fixture could not be set up; the test body never ran.
    #[error("fixture setup failed while {stage}: {source}")]
    Setup {
        stage: &'static str,
        #[source]
        source: BoxError,
    },
    /// A fixture could not be torn down cleanly.
    #[error("fixture teardown failed while {stage}: {source}")]
    Teardown {
        stage: &'static str,
        #[source]
        source: BoxError,
    },
    /// Nothing called `stop()` before the timeout elapsed.
    #[error("timed out after {0:?} waiting for the test to be stopped")]
    WaitTimeout(Duration),
    #[error(transparent)]
    AppError(#[from] Error),
    #[error(transparent)]
    ApiError(#[from] ApiError),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    #[error(transparent)]
    TemplateError(#[from] tera::Error),
}

impl TestError {
    /// Wraps an error raised while setting up `stage`, for use with `map_err`
    pub fn setup<E: Into<BoxError>>(stage: &'static str) -> impl FnOnce(E) -> Self {
        move |source| Self::Setup {
            stage,
            source: source.into(),
        }
    }

    /// Wraps an error raised while tearing down `stage`, for use with `map_err`
    pub fn teardown<E: Into<BoxError>>(stage: &'static str) -> impl FnOnce(E) -> Self {
        move |source| Self::Teardown {
            stage,
            source: source.into(),
        }
    }
}
