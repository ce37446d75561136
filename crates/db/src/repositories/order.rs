//! Order repository.

use std::sync::Arc;

use crate::entities::{Order, order};
use crate::types::OrderStatus;
use salonkit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

#[derive(FromQueryResult)]
struct SumResult {
    total: Option<i64>,
}

/// Order repository for database operations.
#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<DatabaseConnection>,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an order by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<order::Model>> {
        Order::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an order by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<order::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))
    }

    /// Find an order by ID scoped to its owning user.
    ///
    /// Orders belonging to another user are reported as not found so the
    /// response does not leak their existence.
    pub async fn get_by_id_for_user(&self, id: &str, user_id: &str) -> AppResult<order::Model> {
        Order::find_by_id(id)
            .filter(order::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))
    }

    /// Find the user's current order: the most recent pending or processing
    /// order whose setup is still in progress.
    pub async fn find_current_for_user(&self, user_id: &str) -> AppResult<Option<order::Model>> {
        Order::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Status.is_in([
                OrderStatus::Pending.as_str(),
                OrderStatus::Processing.as_str(),
            ]))
            .filter(order::Column::SetupCompleted.eq(false))
            .order_by_desc(order::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an order by its Stripe checkout session ID.
    pub async fn find_by_stripe_session(
        &self,
        session_id: &str,
    ) -> AppResult<Option<order::Model>> {
        Order::find()
            .filter(order::Column::StripeSessionId.eq(session_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all orders for a user (newest first).
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<order::Model>> {
        Order::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List orders (newest first), optionally filtered by status.
    pub async fn find_page(
        &self,
        status: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<order::Model>> {
        let mut query = Order::find().order_by_desc(order::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status));
        }

        query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the most recent orders.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<order::Model>> {
        Order::find()
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new order.
    pub async fn create(&self, model: order::ActiveModel) -> AppResult<order::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an order.
    pub async fn update(&self, model: order::ActiveModel) -> AppResult<order::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an order.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Order::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all orders.
    pub async fn count(&self) -> AppResult<u64> {
        Order::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's orders with a given status.
    pub async fn count_by_user_and_status(&self, user_id: &str, status: &str) -> AppResult<u64> {
        Order::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count orders with a given status.
    pub async fn count_by_status(&self, status: &str) -> AppResult<u64> {
        Order::find()
            .filter(order::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count orders created within a time window.
    pub async fn count_created_between(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        Order::find()
            .filter(order::Column::CreatedAt.gte(from))
            .filter(order::Column::CreatedAt.lt(to))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total revenue in cents across completed orders.
    pub async fn sum_completed_revenue(&self) -> AppResult<i64> {
        let result = Order::find()
            .filter(order::Column::Status.eq(OrderStatus::Completed.as_str()))
            .select_only()
            .column_as(order::Column::TotalAmount.sum(), "total")
            .into_model::<SumResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }

    /// Revenue in cents across completed orders for one template.
    pub async fn sum_completed_revenue_for_template(&self, template_id: &str) -> AppResult<i64> {
        let result = Order::find()
            .filter(order::Column::Status.eq(OrderStatus::Completed.as_str()))
            .filter(order::Column::TemplateId.eq(template_id))
            .select_only()
            .column_as(order::Column::TotalAmount.sum(), "total")
            .into_model::<SumResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }

    /// Revenue in cents across completed orders created within a time window.
    pub async fn sum_completed_revenue_between(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<i64> {
        let result = Order::find()
            .filter(order::Column::Status.eq(OrderStatus::Completed.as_str()))
            .filter(order::Column::CreatedAt.gte(from))
            .filter(order::Column::CreatedAt.lt(to))
            .select_only()
            .column_as(order::Column::TotalAmount.sum(), "total")
            .into_model::<SumResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_order(id: &str, user_id: &str, status: &str) -> order::Model {
        order::Model {
            id: id.to_string(),
            user_id: Some(user_id.to_string()),
            salon_name: "Salon Lumière".to_string(),
            owner_name: "Marie Dupont".to_string(),
            email: "marie@salon-lumiere.fr".to_string(),
            phone: None,
            address: None,
            city: None,
            postal_code: None,
            domain: Some("salon-lumiere".to_string()),
            domain_extension: Some(".fr".to_string()),
            domain_price: Some(899),
            domain_user_price: Some(1200),
            template_id: None,
            total_amount: 49900,
            currency: "eur".to_string(),
            stripe_session_id: None,
            status: status.to_string(),
            setup_step: "domain_selection".to_string(),
            setup_completed: false,
            design_preferences: None,
            about_text: None,
            services: None,
            completed_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_returns_order() {
        let order = create_test_order("ord1", "user1", "pending");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[order.clone()]])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let found = repo.get_by_id("ord1").await.unwrap();

        assert_eq!(found.id, "ord1");
        assert_eq!(found.salon_name, "Salon Lumière");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_is_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<order::Model>::new()])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_for_user_hides_foreign_order() {
        // The scoped query matches nothing for a foreign user.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<order::Model>::new()])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let result = repo.get_by_id_for_user("ord1", "other-user").await;

        assert!(matches!(result, Err(AppError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_current_for_user_returns_latest() {
        let order = create_test_order("ord2", "user1", "processing");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[order]])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let current = repo.find_current_for_user("user1").await.unwrap();

        assert_eq!(current.unwrap().id, "ord2");
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let count = repo.count_by_status("pending").await.unwrap();

        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn test_sum_completed_revenue_empty_is_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "total" => sea_orm::Value::BigInt(None)
                }]])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let total = repo.sum_completed_revenue().await.unwrap();

        assert_eq!(total, 0);
    }
}
