//! Fixtures for testing Pushmanager handlers.
//!
//! - [`AsyncServerFixture`](fixtures::server::AsyncServerFixture) serves a set of handlers
//!   on an ephemeral port.
//! - [`TemplateFixture`](fixtures::template::TemplateFixture) renders one page without a
//!   server and parses the markup.
//! - [`ServletFixture`](fixtures::servlet::ServletFixture) adds a throwaway database and a
//!   mocked API client on top of the server fixture.

pub mod api;
pub mod constant;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod scoped;

pub use error::TestError;

pub mod prelude {
    pub use crate::{
        api::MockedApiClient,
        constant::{TEST_COOKIE_SECRET, TEST_USER},
        fixtures::{
            server::{AsyncServerCase, AsyncServerFixture, Stopper},
            servlet::{ServletFixture, ServletTestCase},
            template::TemplateFixture,
        },
        scoped::ScopedOverride,
        TestError,
    };
}
