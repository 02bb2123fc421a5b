//! End-to-end tests of the HTTP controllers, served by the harness fixtures.

use axum::Router;
use pushmanager::server::{model::app::AppState, router};
use pushmanager_test_utils::prelude::*;
use scraper::{Html, Selector};

mod api;
mod home;
mod request;

/// Serves every application route with the default mocked API reply.
struct AllRoutes;

impl AsyncServerCase for AllRoutes {
    fn get_handlers(&self) -> Router<AppState> {
        router::routes()
    }
}

impl ServletTestCase for AllRoutes {}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Joined text of every element matching `css`
fn text_of(page: &Html, css: &str) -> String {
    page.select(&selector(css))
        .flat_map(|element| element.text())
        .collect()
}
