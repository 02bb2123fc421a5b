use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// A push request as exposed by the JSON API and consumed by page handlers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PushRequestDto {
    /// Primary key
    pub id: i32,
    /// User who requested the push
    pub user: String,
    /// Short description shown in listings
    pub title: String,
    /// Branch to be pushed
    pub branch: String,
    /// Workflow state, `requested` for new requests
    pub state: String,
    /// When the request was created (UTC)
    pub created_at: NaiveDateTime,
}

impl From<entity::push_request::Model> for PushRequestDto {
    fn from(model: entity::push_request::Model) -> Self {
        Self {
            id: model.id,
            user: model.user,
            title: model.title,
            branch: model.branch,
            state: model.state,
            created_at: model.created_at,
        }
    }
}
