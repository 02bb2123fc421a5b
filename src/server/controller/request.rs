//! Push request pages.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use tera::Context;

use crate::server::{
    api::{self, ApiArguments},
    error::Error,
    handler::{RequestContext, RequestHandler},
    model::app::AppState,
};

/// Filter accepted by the listing page and the `requests` API method
#[derive(Deserialize, Default)]
pub struct RequestListParams {
    /// Only list requests in this state
    pub state: Option<String>,
}

/// Push request listing
///
/// Fetches the requests through the `requests` API method and renders them with the
/// `Request` module. Logged in users also get the `NewRequestDialog` form.
///
/// # Responses
/// - 200 (OK): Rendered `requests.html`
/// - 500 (Internal Server Error): The API answered with something other than a list, or
///   rendering failed
/// - 502 (Bad Gateway): The API call failed
pub async fn list_requests(
    State(state): State<AppState>,
    request: RequestContext,
    Query(params): Query<RequestListParams>,
) -> Result<impl IntoResponse, Error> {
    let mut handler = RequestHandler::new(state.app.clone(), request);
    handler.prepare().await?;

    let mut arguments = ApiArguments::new();
    if let Some(filter) = params.state {
        arguments.insert("state".to_string(), filter);
    }

    let response = api::request(state.api.as_ref(), "requests", arguments).await?;
    if let Some(err) = response.error {
        return Err(err.into());
    }

    let requests = match response.body {
        None => Vec::new(),
        Some(Value::Array(requests)) => requests,
        Some(other) => {
            return Err(Error::ParseError(format!(
                "expected a list of push requests, got {other}"
            )))
        }
    };

    let mut context = Context::new();
    context.insert("request_count", &requests.len());
    context.insert("requests", &requests);
    handler.render("requests.html", &context)?;

    Ok(handler.finish())
}
