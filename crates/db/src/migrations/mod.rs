//! Database migrations.

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_template_table;
mod m20250601_000003_create_order_table;
mod m20250601_000004_create_photo_table;
mod m20250601_000005_create_contact_message_table;
mod m20250601_000006_create_domain_pricing_table;

/// Migration runner.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_template_table::Migration),
            Box::new(m20250601_000003_create_order_table::Migration),
            Box::new(m20250601_000004_create_photo_table::Migration),
            Box::new(m20250601_000005_create_contact_message_table::Migration),
            Box::new(m20250601_000006_create_domain_pricing_table::Migration),
        ]
    }
}
