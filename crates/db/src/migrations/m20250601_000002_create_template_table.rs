//! Create `template` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Template::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Template::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Template::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Template::Slug)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Template::Description).text())
                    .col(
                        ColumnDef::new(Template::Category)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Template::Price).big_integer().not_null())
                    .col(ColumnDef::new(Template::Features).json_binary())
                    .col(ColumnDef::new(Template::PreviewUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Template::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Template::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Template::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: category (catalog filtering)
        manager
            .create_index(
                Index::create()
                    .name("idx_template_category")
                    .table(Template::Table)
                    .col(Template::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Template::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Template {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Category,
    Price,
    Features,
    PreviewUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
