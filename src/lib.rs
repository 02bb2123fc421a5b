//! Pushmanager: coordinates push requests between developers and the people
//! deploying them.
//!
//! The [`server`] module holds the web application. The companion
//! `pushmanager-test-utils` crate boots it for tests.

pub mod model;
pub mod server;
