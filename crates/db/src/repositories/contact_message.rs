//! Contact message repository.

use std::sync::Arc;

use crate::entities::{ContactMessage, contact_message};
use salonkit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Contact message repository for database operations.
#[derive(Clone)]
pub struct ContactMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl ContactMessageRepository {
    /// Create a new contact message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contact_message::Model>> {
        ContactMessage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a message by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<contact_message::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message not found: {id}")))
    }

    /// List messages (newest first), optionally filtered by status.
    pub async fn find_page(
        &self,
        status: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<contact_message::Model>> {
        let mut query = ContactMessage::find().order_by_desc(contact_message::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(contact_message::Column::Status.eq(status));
        }

        query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new message.
    pub async fn create(
        &self,
        model: contact_message::ActiveModel,
    ) -> AppResult<contact_message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a message.
    pub async fn update(
        &self,
        model: contact_message::ActiveModel,
    ) -> AppResult<contact_message::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a message.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        ContactMessage::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all messages.
    pub async fn count(&self) -> AppResult<u64> {
        ContactMessage::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count messages with a given status.
    pub async fn count_by_status(&self, status: &str) -> AppResult<u64> {
        ContactMessage::find()
            .filter(contact_message::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_message(id: &str, status: &str) -> contact_message::Model {
        contact_message::Model {
            id: id.to_string(),
            name: "Claire Martin".to_string(),
            email: "claire@example.fr".to_string(),
            phone: None,
            subject: Some("Question tarifs".to_string()),
            message: "Bonjour, quel est le prix d'un site ?".to_string(),
            status: status.to_string(),
            replied_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_page_returns_messages() {
        let msg = create_test_message("msg1", "unread");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[msg]])
                .into_connection(),
        );

        let repo = ContactMessageRepository::new(db);
        let messages = repo.find_page(Some("unread"), 20, 0).await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].status, "unread");
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = ContactMessageRepository::new(db);
        let count = repo.count_by_status("unread").await.unwrap();

        assert_eq!(count, 4);
    }
}
