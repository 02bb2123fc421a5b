pub mod prelude;

pub mod push_request;
