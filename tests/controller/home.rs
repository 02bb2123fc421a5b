//! Tests for the landing page.

use reqwest::StatusCode;
use scraper::Html;

use super::*;

/// Tests the landing page against the per-test service settings.
///
/// Verifies that the page names the IRC channel from the servlet fixture's settings
/// overlay and, with no logged in user, offers the login link.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn shows_test_irc_channel() -> Result<(), TestError> {
    let fixture = ServletFixture::start(AllRoutes).await?;

    let response = fixture.server().fetch("/").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let page = Html::parse_document(&response.text().await?);
    assert_eq!(text_of(&page, "#irc-channel"), "#pushmanagertest");
    assert_eq!(page.select(&selector("#login-link")).count(), 1);
    assert_eq!(page.select(&selector("#current-user")).count(), 0);

    fixture.teardown().await
}

/// Tests the landing page on the plain server fixture.
///
/// Verifies that the page renders with the production helpers, linking the stylesheet
/// through `static_url`, and that the stylesheet is actually served.
///
/// Expected: Ok with 200 OK responses
#[tokio::test]
async fn links_served_stylesheet() -> Result<(), TestError> {
    let fixture = AsyncServerFixture::start(&AllRoutes).await?;

    let response = fixture.fetch("/").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let page = Html::parse_document(&response.text().await?);
    let href = page
        .select(&selector("link[rel=stylesheet]"))
        .filter_map(|element| element.value().attr("href"))
        .next()
        .map(str::to_string);
    assert_eq!(href.as_deref(), Some("/static/css/pushmanager.css"));

    let stylesheet = fixture.fetch("/static/css/pushmanager.css").await?;
    assert_eq!(stylesheet.status(), StatusCode::OK);

    fixture.teardown().await
}
