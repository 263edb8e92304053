//! Create `service` table with FK to `service_category`.
//!
//! Services are removed together with their category. `features` is a JSON
//! array of strings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(string_len(Service::Title, 200).not_null())
                    .col(string_len(Service::Slug, 50).unique_key().not_null())
                    .col(uuid(Service::CategoryId).not_null())
                    .col(text(Service::Description).not_null())
                    .col(string_len(Service::ShortDescription, 255).not_null())
                    .col(
                        ColumnDef::new(Service::Image)
                            .string_len(255)
                            .null(),
                    )
                    .col(boolean(Service::IsFeatured).not_null().default(false))
                    .col(
                        ColumnDef::new(Service::Price)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(json_binary(Service::Features).not_null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_category")
                            .from(Service::Table, Service::CategoryId)
                            .to(ServiceCategory::Table, ServiceCategory::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    Title,
    Slug,
    CategoryId,
    Description,
    ShortDescription,
    Image,
    IsFeatured,
    Price,
    Features,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceCategory { Table, Id }
