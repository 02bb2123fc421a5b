//! Data access layer repositories.

pub mod push_request;
