//! JSON endpoints under `/api/v1`.

use axum::{extract::State, response::IntoResponse, Form, Json};

use crate::{
    model::api::PushRequestDto,
    server::{
        controller::request::RequestListParams, data::push_request::PushRequestRepository,
        error::Error, model::app::AppState,
    },
};

/// `requests` API method
///
/// Lists push requests, optionally only those in the `state` form argument.
///
/// # Responses
/// - 200 (OK): JSON array of push requests in filing order
/// - 500 (Internal Server Error): Database query failed
/// - 503 (Service Unavailable): The application runs without a database
pub async fn requests(
    State(state): State<AppState>,
    Form(params): Form<RequestListParams>,
) -> Result<impl IntoResponse, Error> {
    let db = state.db()?;

    let requests = PushRequestRepository::new(db)
        .list(params.state.as_deref())
        .await?;

    Ok(Json(
        requests
            .into_iter()
            .map(PushRequestDto::from)
            .collect::<Vec<_>>(),
    ))
}
