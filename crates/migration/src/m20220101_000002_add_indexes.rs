use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: lookups by category and the featured listing
        manager
            .create_index(
                Index::create()
                    .name("idx_service_category")
                    .table(Service::Table)
                    .col(Service::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_featured_title")
                    .table(Service::Table)
                    .col(Service::IsFeatured)
                    .col(Service::Title)
                    .to_owned(),
            )
            .await?;

        // AuthToken: session sweep scans by age
        manager
            .create_index(
                Index::create()
                    .name("idx_auth_token_created")
                    .table(AuthToken::Table)
                    .col(AuthToken::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ContactMessage: admin listing is newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_message_created")
                    .table(ContactMessage::Table)
                    .col(ContactMessage::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_category").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_featured_title").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_auth_token_created").table(AuthToken::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contact_message_created").table(ContactMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, CategoryId, IsFeatured, Title }

#[derive(DeriveIden)]
enum AuthToken { Table, CreatedAt }

#[derive(DeriveIden)]
enum ContactMessage { Table, CreatedAt }
