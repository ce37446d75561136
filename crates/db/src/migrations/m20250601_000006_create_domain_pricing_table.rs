//! Create `domain_pricing` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DomainPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainPricing::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DomainPricing::Extension)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DomainPricing::Price)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DomainPricing::UserPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DomainPricing::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DomainPricing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DomainPricing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DomainPricing {
    Table,
    Id,
    Extension,
    Price,
    UserPrice,
    IsActive,
    CreatedAt,
}
