//! Create `contact_message` table migration.

use sea_orm_migration::prelude::*;

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
                    .col(
                        ColumnDef::new(ContactMessage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContactMessage::Name)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContactMessage::Email)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContactMessage::Phone).string_len(32))
                    .col(ColumnDef::new(ContactMessage::Subject).string_len(256))
                    .col(ColumnDef::new(ContactMessage::Message).text().not_null())
                    .col(
                        ColumnDef::new(ContactMessage::Status)
                            .string_len(16)
                            .not_null()
                            .default("unread"),
                    )
                    .col(ColumnDef::new(ContactMessage::RepliedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ContactMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (unread counters)
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_message_status")
                    .table(ContactMessage::Table)
                    .col(ContactMessage::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContactMessage {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Subject,
    Message,
    Status,
    RepliedAt,
    CreatedAt,
}
