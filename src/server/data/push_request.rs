//! Push request persistence.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// State every new push request starts in
pub const REQUESTED: &str = "requested";

/// Queries and inserts push requests.
pub struct PushRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PushRequestRepository<'a, C> {
    /// Creates a new instance of [`PushRequestRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Files a new push request in the [`REQUESTED`] state
    pub async fn create(
        &self,
        user: &str,
        title: &str,
        branch: &str,
    ) -> Result<entity::push_request::Model, DbErr> {
        let request = entity::push_request::ActiveModel {
            user: ActiveValue::Set(user.to_string()),
            title: ActiveValue::Set(title.to_string()),
            branch: ActiveValue::Set(branch.to_string()),
            state: ActiveValue::Set(REQUESTED.to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        request.insert(self.db).await
    }

    /// Lists push requests in filing order, optionally only those in `state`
    pub async fn list(
        &self,
        state: Option<&str>,
    ) -> Result<Vec<entity::push_request::Model>, DbErr> {
        let mut query = entity::prelude::PushRequest::find();
        if let Some(state) = state {
            query = query.filter(entity::push_request::Column::State.eq(state));
        }

        query
            .order_by_asc(entity::push_request::Column::Id)
            .all(self.db)
            .await
    }
}
