//! Create `photo` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photo::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photo::UserId).string_len(32))
                    .col(ColumnDef::new(Photo::OrderId).string_len(32))
                    .col(ColumnDef::new(Photo::Filename).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Photo::StoredFilename)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Photo::OriginalUrl)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Photo::ThumbnailUrl).string_len(1024))
                    .col(ColumnDef::new(Photo::Size).big_integer().not_null())
                    .col(ColumnDef::new(Photo::MimeType).string_len(128).not_null())
                    .col(ColumnDef::new(Photo::Width).integer())
                    .col(ColumnDef::new(Photo::Height).integer())
                    .col(ColumnDef::new(Photo::Alt).text())
                    .col(
                        ColumnDef::new(Photo::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Photo::UploadStatus)
                            .string_len(16)
                            .not_null()
                            .default("uploading"),
                    )
                    .col(ColumnDef::new(Photo::Md5).string_len(32))
                    .col(
                        ColumnDef::new(Photo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_user")
                            .from(Photo::Table, Photo::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_order")
                            .from(Photo::Table, Photo::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: order_id (listing an order's photos in sort order)
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_order_id")
                    .table(Photo::Table)
                    .col(Photo::OrderId)
                    .to_owned(),
            )
            .await?;

        // Index: user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_user_id")
                    .table(Photo::Table)
                    .col(Photo::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: md5 (duplicate detection)
        manager
            .create_index(
                Index::create()
                    .name("idx_photo_md5")
                    .table(Photo::Table)
                    .col(Photo::Md5)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Photo {
    Table,
    Id,
    UserId,
    OrderId,
    Filename,
    StoredFilename,
    OriginalUrl,
    ThumbnailUrl,
    Size,
    MimeType,
    Width,
    Height,
    Alt,
    SortOrder,
    UploadStatus,
    Md5,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Order {
    Table,
    Id,
}
