//! The three test fixtures.

pub mod server;
pub mod servlet;
pub mod template;
