use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PushRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(PushRequest::Id))
                    .col(string(PushRequest::User))
                    .col(string(PushRequest::Title))
                    .col(string(PushRequest::Branch))
                    .col(string(PushRequest::State))
                    .col(timestamp(PushRequest::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_push_request_state")
                    .table(PushRequest::Table)
                    .col(PushRequest::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_push_request_state")
                    .table(PushRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PushRequest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PushRequest {
    Table,
    Id,
    User,
    Title,
    Branch,
    State,
    CreatedAt,
}
