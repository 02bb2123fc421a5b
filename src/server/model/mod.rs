//! Server-side data models: the application object and its shared state, plus
//! type-safe wrappers for session data.

pub mod app;
pub mod session;
