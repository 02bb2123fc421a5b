//! Server application core modules.
//!
//! This module contains the server-side pieces of Pushmanager: configuration, the
//! application object with its template helper registries, the request handler that
//! renders pages, HTTP controllers and routing, the database layer, and the client for
//! the internal JSON API that page handlers call back into.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod config;
pub mod controller;
pub mod data;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod router;
pub mod startup;
pub mod ui;

#[cfg(test)]
pub(crate) mod util;
