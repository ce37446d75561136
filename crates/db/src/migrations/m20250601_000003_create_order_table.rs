//! Create `order` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Order::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Order::UserId).string_len(32))
                    .col(ColumnDef::new(Order::SalonName).string_len(256).not_null())
                    .col(ColumnDef::new(Order::OwnerName).string_len(256).not_null())
                    .col(ColumnDef::new(Order::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Order::Phone).string_len(32))
                    .col(ColumnDef::new(Order::Address).string_len(512))
                    .col(ColumnDef::new(Order::City).string_len(128))
                    .col(ColumnDef::new(Order::PostalCode).string_len(16))
                    .col(ColumnDef::new(Order::Domain).string_len(256))
                    .col(ColumnDef::new(Order::DomainExtension).string_len(16))
                    .col(ColumnDef::new(Order::DomainPrice).big_integer())
                    .col(ColumnDef::new(Order::DomainUserPrice).big_integer())
                    .col(ColumnDef::new(Order::TemplateId).string_len(32))
                    .col(ColumnDef::new(Order::TotalAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Order::Currency)
                            .string_len(8)
                            .not_null()
                            .default("eur"),
                    )
                    .col(ColumnDef::new(Order::StripeSessionId).string_len(256))
                    .col(
                        ColumnDef::new(Order::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Order::SetupStep)
                            .string_len(32)
                            .not_null()
                            .default("domain_selection"),
                    )
                    .col(
                        ColumnDef::new(Order::SetupCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Order::DesignPreferences).json_binary())
                    .col(ColumnDef::new(Order::AboutText).text())
                    .col(ColumnDef::new(Order::Services).json_binary())
                    .col(ColumnDef::new(Order::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Order::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Order::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_template")
                            .from(Order::Table, Order::TemplateId)
                            .to(Template::Table, Template::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (current-order lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_order_user_id")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: status (admin dashboards)
        manager
            .create_index(
                Index::create()
                    .name("idx_order_status")
                    .table(Order::Table)
                    .col(Order::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (recent orders, monthly stats)
        manager
            .create_index(
                Index::create()
                    .name("idx_order_created_at")
                    .table(Order::Table)
                    .col(Order::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: stripe_session_id (payment reconciliation)
        manager
            .create_index(
                Index::create()
                    .name("idx_order_stripe_session_id")
                    .table(Order::Table)
                    .col(Order::StripeSessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Order {
    Table,
    Id,
    UserId,
    SalonName,
    OwnerName,
    Email,
    Phone,
    Address,
    City,
    PostalCode,
    Domain,
    DomainExtension,
    DomainPrice,
    DomainUserPrice,
    TemplateId,
    TotalAmount,
    Currency,
    StripeSessionId,
    Status,
    SetupStep,
    SetupCompleted,
    DesignPreferences,
    AboutText,
    Services,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Template {
    Table,
    Id,
}
