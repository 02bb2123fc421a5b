//! Session data models and utilities.
//!
//! Type-safe wrappers for session data storage and retrieval using tower-sessions.

pub mod user;
