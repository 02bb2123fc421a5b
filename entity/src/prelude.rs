pub use super::push_request::Entity as PushRequest;
