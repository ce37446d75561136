//! Domain pricing repository.

use std::sync::Arc;

use crate::entities::{DomainPricing, domain_pricing};
use salonkit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Domain pricing repository for database operations.
#[derive(Clone)]
pub struct DomainPricingRepository {
    db: Arc<DatabaseConnection>,
}

impl DomainPricingRepository {
    /// Create a new domain pricing repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a pricing row by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<domain_pricing::Model>> {
        DomainPricing::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a pricing row by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<domain_pricing::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Domain pricing not found: {id}")))
    }

    /// Find the pricing row for an extension (e.g. ".fr").
    pub async fn find_by_extension(
        &self,
        extension: &str,
    ) -> AppResult<Option<domain_pricing::Model>> {
        DomainPricing::find()
            .filter(domain_pricing::Column::Extension.eq(extension))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active pricing rows ordered by extension.
    pub async fn find_active(&self) -> AppResult<Vec<domain_pricing::Model>> {
        DomainPricing::find()
            .filter(domain_pricing::Column::IsActive.eq(true))
            .order_by_asc(domain_pricing::Column::Extension)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all pricing rows including inactive ones.
    pub async fn find_all(&self) -> AppResult<Vec<domain_pricing::Model>> {
        DomainPricing::find()
            .order_by_asc(domain_pricing::Column::Extension)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new pricing row.
    pub async fn create(
        &self,
        model: domain_pricing::ActiveModel,
    ) -> AppResult<domain_pricing::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a pricing row.
    pub async fn update(
        &self,
        model: domain_pricing::ActiveModel,
    ) -> AppResult<domain_pricing::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a pricing row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        DomainPricing::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_pricing(id: &str, extension: &str, is_active: bool) -> domain_pricing::Model {
        domain_pricing::Model {
            id: id.to_string(),
            extension: extension.to_string(),
            price: 899,
            user_price: 1200,
            is_active,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_extension_returns_row() {
        let pricing = create_test_pricing("dp1", ".fr", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pricing]])
                .into_connection(),
        );

        let repo = DomainPricingRepository::new(db);
        let found = repo.find_by_extension(".fr").await.unwrap().unwrap();

        assert_eq!(found.extension, ".fr");
        assert_eq!(found.user_price, 1200);
    }

    #[tokio::test]
    async fn test_find_active_returns_rows() {
        let fr = create_test_pricing("dp1", ".fr", true);
        let com = create_test_pricing("dp2", ".com", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[com, fr]])
                .into_connection(),
        );

        let repo = DomainPricingRepository::new(db);
        let rows = repo.find_active().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_active));
    }
}
