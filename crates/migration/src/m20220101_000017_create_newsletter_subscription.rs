//! Create `newsletter_subscription` table; `email` is unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscription::Table)
                    .if_not_exists()
                    .col(uuid(NewsletterSubscription::Id).primary_key())
                    .col(string_len(NewsletterSubscription::Email, 254).unique_key().not_null())
                    .col(string_len(NewsletterSubscription::Name, 100).not_null().default(""))
                    .col(boolean(NewsletterSubscription::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(NewsletterSubscription::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsletterSubscription::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NewsletterSubscription { Table, Id, Email, Name, IsActive, CreatedAt }
