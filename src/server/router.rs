//! HTTP routing.
//!
//! [`routes`] lists the application's own endpoints. [`build`] turns any set of routes
//! into a servable router: state, static assets, request tracing and, when a cookie secret
//! is configured, signed sessions.

use axum::{
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{
    cookie::{Key, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

use crate::server::{
    controller,
    error::{config::ConfigError, Error},
    model::app::AppState,
    ui::{methods::STATIC_URL_PREFIX, UiApplication},
};

/// The application's endpoints.
///
/// # Registered Endpoints
/// - `GET /` - Landing page
/// - `GET /requests` - Push request listing
/// - `POST /api/v1/requests` - `requests` API method
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::home::index))
        .route("/requests", get(controller::request::list_requests))
        .route("/api/v1/requests", post(controller::api::requests))
}

/// Attaches shared state and middleware to `handlers`.
///
/// Static assets under the application's `static_path` are served at `/static`.
///
/// # Returns
/// - `Ok(Router)` - Ready to serve
/// - `Err(Error::ConfigError)` - The configured cookie secret is too short to sign with
pub fn build(handlers: Router<AppState>, state: AppState) -> Result<Router, Error> {
    let settings = state.app.settings().clone();

    let router = handlers
        .nest_service(
            STATIC_URL_PREFIX.trim_end_matches('/'),
            ServeDir::new(&settings.static_path),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let Some(secret) = settings.cookie_secret.as_deref() else {
        return Ok(router);
    };

    let session = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
        .with_signed(cookie_key(secret)?);

    Ok(router.layer(session))
}

/// Derives the cookie signing key from a secret of at least 64 bytes
pub fn cookie_key(secret: &str) -> Result<Key, ConfigError> {
    Key::try_from(secret.as_bytes()).map_err(|_| ConfigError::CookieSecretTooShort(secret.len()))
}
