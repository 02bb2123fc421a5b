//! Helpers shared by the server's unit tests.
