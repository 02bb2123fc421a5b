//! Tests for the push request listing page.

use pushmanager::{model::api::ErrorDto, server::error::api::ApiError};
use reqwest::StatusCode;
use scraper::Html;
use serde_json::{json, Value};

use super::*;

struct TwoRequests;

impl AsyncServerCase for TwoRequests {
    fn get_handlers(&self) -> Router<AppState> {
        router::routes()
    }
}

impl ServletTestCase for TwoRequests {
    fn api_response(&self) -> Option<Value> {
        Some(json!([
            {
                "id": 1,
                "user": "alice",
                "title": "Fix login",
                "branch": "fix_login",
                "state": "requested",
                "created_at": "2026-10-16T09:30:00"
            },
            {
                "id": 2,
                "user": "bob",
                "title": "Faster <search>",
                "branch": "search_perf",
                "state": "accepted",
                "created_at": "2026-10-16T10:00:00"
            }
        ]))
    }
}

struct ApiDown;

impl AsyncServerCase for ApiDown {
    fn get_handlers(&self) -> Router<AppState> {
        router::routes()
    }
}

impl ServletTestCase for ApiDown {
    fn api_error(&self) -> Option<ApiError> {
        Some(ApiError::Transport("connection refused".to_string()))
    }
}

struct NotAList;

impl AsyncServerCase for NotAList {
    fn get_handlers(&self) -> Router<AppState> {
        router::routes()
    }
}

impl ServletTestCase for NotAList {
    fn api_response(&self) -> Option<Value> {
        Some(json!({"status": "ok"}))
    }
}

/// Tests rendering the requests returned by the API.
///
/// Verifies that the page calls the `requests` API method once, renders one row per
/// returned request through the `Request` module and releases the fixture's wait.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn renders_requests_from_api() -> Result<(), TestError> {
    let fixture = ServletFixture::start(TwoRequests).await?;

    let response = fixture.server().fetch("/requests").await?;
    assert_eq!(response.status(), StatusCode::OK);
    fixture.wait().await?;

    let calls = fixture.api().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "requests");
    assert!(calls[0].arguments.is_empty());

    let page = Html::parse_document(&response.text().await?);
    assert_eq!(text_of(&page, "#request-count"), "2 requests");
    assert_eq!(page.select(&selector(".push-request")).count(), 2);
    assert!(text_of(&page, "#requests").contains("Faster <search>"));
    assert!(text_of(&page, "#requests").contains("Oct 16, 2026 09:30"));

    fixture.teardown().await
}

/// Tests that anonymous visitors do not get the new request form.
///
/// Expected: Ok with 200 OK response and no form
#[tokio::test]
async fn hides_new_request_form_when_anonymous() -> Result<(), TestError> {
    let fixture = ServletFixture::start(TwoRequests).await?;

    let response = fixture.server().fetch("/requests").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let page = Html::parse_document(&response.text().await?);
    assert_eq!(page.select(&selector("#new-request-form")).count(), 0);

    fixture.teardown().await
}

/// Tests that the state filter is forwarded to the API.
///
/// Expected: Ok with the `state` argument recorded on the mocked call
#[tokio::test]
async fn forwards_state_filter() -> Result<(), TestError> {
    let fixture = ServletFixture::start(TwoRequests).await?;

    let response = fixture.server().fetch("/requests?state=accepted").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = fixture.api().calls();
    assert_eq!(
        calls[0].arguments.get("state").map(String::as_str),
        Some("accepted")
    );

    fixture.teardown().await
}

/// Tests an empty API reply.
///
/// Expected: Ok with 200 OK response listing no requests
#[tokio::test]
async fn renders_empty_listing() -> Result<(), TestError> {
    let fixture = ServletFixture::start(AllRoutes).await?;

    let response = fixture.server().fetch("/requests").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let page = Html::parse_document(&response.text().await?);
    assert_eq!(text_of(&page, "#request-count"), "0 requests");
    assert_eq!(page.select(&selector(".push-request")).count(), 0);

    fixture.teardown().await
}

/// Tests a failing API call.
///
/// Expected: Err with 502 BAD GATEWAY response
#[tokio::test]
async fn api_error_is_bad_gateway() -> Result<(), TestError> {
    let fixture = ServletFixture::start(ApiDown).await?;

    let response = fixture.server().fetch("/requests").await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: ErrorDto = response.json().await?;
    assert_eq!(body.error, "Upstream API request failed");

    fixture.teardown().await
}

/// Tests an API reply that is not a list of requests.
///
/// Expected: Err with 500 INTERNAL SERVER ERROR response
#[tokio::test]
async fn unexpected_api_body_is_internal_error() -> Result<(), TestError> {
    let fixture = ServletFixture::start(NotAList).await?;

    let response = fixture.server().fetch("/requests").await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    fixture.teardown().await
}

/// Tests the page against the real API client on a server without a database.
///
/// The page calls back into the same server, whose API answers 503; the page reports
/// the failed call.
///
/// Expected: Err with 502 BAD GATEWAY response
#[tokio::test]
async fn real_api_without_database_is_bad_gateway() -> Result<(), TestError> {
    let fixture = AsyncServerFixture::start(&AllRoutes).await?;

    let response = fixture.fetch("/requests").await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    fixture.teardown().await
}
