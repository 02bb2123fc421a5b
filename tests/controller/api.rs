//! Tests for the `requests` API method.

use pushmanager::{
    model::api::PushRequestDto,
    server::data::push_request::{PushRequestRepository, REQUESTED},
};
use reqwest::StatusCode;
use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel};

use super::*;

/// Seeds one requested and one accepted push request
async fn seed(fixture: &ServletFixture<AllRoutes>) -> Result<(), TestError> {
    let repo = PushRequestRepository::new(fixture.db());
    repo.create("alice", "Fix login", "fix_login").await?;

    let accepted = repo.create("bob", "Faster search", "search_perf").await?;
    let mut accepted = accepted.into_active_model();
    accepted.state = ActiveValue::Set("accepted".to_string());
    accepted.update(fixture.db()).await?;

    Ok(())
}

/// Tests listing every push request.
///
/// Expected: Ok with 200 OK response containing both requests in filing order
#[tokio::test]
async fn lists_all_requests() -> Result<(), TestError> {
    let fixture = ServletFixture::start(AllRoutes).await?;
    seed(&fixture).await?;

    let response = fixture.server().post_form("/api/v1/requests", &[]).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let requests: Vec<PushRequestDto> = response.json().await?;
    let titles: Vec<&str> = requests
        .iter()
        .map(|request| request.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Fix login", "Faster search"]);

    fixture.teardown().await
}

/// Tests filtering by state.
///
/// Expected: Ok with 200 OK response containing only the requested push request
#[tokio::test]
async fn filters_by_state() -> Result<(), TestError> {
    let fixture = ServletFixture::start(AllRoutes).await?;
    seed(&fixture).await?;

    let response = fixture
        .server()
        .post_form("/api/v1/requests", &[("state", REQUESTED)])
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let requests: Vec<PushRequestDto> = response.json().await?;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user, "alice");
    assert_eq!(requests[0].state, REQUESTED);

    fixture.teardown().await
}

/// Tests the API on a server started without a database.
///
/// Expected: Err with 503 SERVICE UNAVAILABLE response
#[tokio::test]
async fn unavailable_without_database() -> Result<(), TestError> {
    let fixture = AsyncServerFixture::start(&AllRoutes).await?;

    let response = fixture.post_form("/api/v1/requests", &[]).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    fixture.teardown().await
}
