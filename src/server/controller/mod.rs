//! HTTP controller endpoints.
//!
//! Page controllers render templates through a
//! [`RequestHandler`](crate::server::handler::RequestHandler) and get their data from the
//! internal API. The API controllers under `/api/v1` read
//! the database directly and answer with JSON.

pub mod api;
pub mod home;
pub mod request;
