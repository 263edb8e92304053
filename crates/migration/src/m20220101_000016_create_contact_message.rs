//! Create `contact_message` table.
//!
//! `status` holds one of `new`, `in_progress`, `responded`, `closed`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactMessage::Table)
                    .if_not_exists()
                    .col(uuid(ContactMessage::Id).primary_key())
                    .col(string_len(ContactMessage::Name, 100).not_null())
                    .col(string_len(ContactMessage::Email, 254).not_null())
                    .col(string_len(ContactMessage::Phone, 20).not_null().default(""))
                    .col(string_len(ContactMessage::Subject, 200).not_null())
                    .col(text(ContactMessage::Message).not_null())
                    .col(string_len(ContactMessage::Status, 20).not_null().default("new"))
                    .col(timestamp_with_time_zone(ContactMessage::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ContactMessage::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContactMessage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactMessage { Table, Id, Name, Email, Phone, Subject, Message, Status, CreatedAt, UpdatedAt }
