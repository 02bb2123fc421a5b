//! Process setup: tracing and construction of the application state.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::{
    api::HttpApiClient,
    config::{Config, Settings},
    db::init_db,
    error::Error,
    model::app::{AppState, Application},
};

/// Installs the global tracing subscriber, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Builds the application object with the production helper functions and modules
pub fn build_application(settings: Settings) -> Result<Arc<Application>, Error> {
    Ok(Arc::new(Application::new(settings)?.with_production_ui()))
}

/// Connects every service the application depends on
pub async fn build_state(config: &Config) -> Result<AppState, Error> {
    let app = build_application(config.settings.clone())?;
    let db = init_db(&config.services).await?;
    let api = Arc::new(HttpApiClient::new(&config.services.api_app));

    Ok(AppState::new(app, Some(db), api, config.services.clone()))
}
