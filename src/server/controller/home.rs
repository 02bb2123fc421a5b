//! Landing page.

use axum::{extract::State, response::IntoResponse};
use tera::Context;

use crate::server::{
    error::Error,
    handler::{RequestContext, RequestHandler},
    model::app::AppState,
};

/// Landing page
///
/// # Responses
/// - 200 (OK): Rendered `index.html` with the current user and announcement channel
/// - 500 (Internal Server Error): Session lookup or template rendering failed
pub async fn index(
    State(state): State<AppState>,
    request: RequestContext,
) -> Result<impl IntoResponse, Error> {
    let mut handler = RequestHandler::new(state.app.clone(), request);
    handler.prepare().await?;

    let mut context = Context::new();
    context.insert("irc_channel", &state.services.irc.channel);
    handler.render("index.html", &context)?;

    Ok(handler.finish())
}
