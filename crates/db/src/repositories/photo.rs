//! Photo repository.

use std::sync::Arc;

use crate::entities::{Photo, photo};
use salonkit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

#[derive(FromQueryResult)]
struct MaxSortResult {
    max_sort: Option<i32>,
}

/// Photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<photo::Model>> {
        Photo::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a photo by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<photo::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Find photos by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<photo::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Photo::find()
            .filter(photo::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List an order's photos in gallery order.
    pub async fn find_by_order(&self, order_id: &str) -> AppResult<Vec<photo::Model>> {
        Photo::find()
            .filter(photo::Column::OrderId.eq(order_id))
            .order_by_asc(photo::Column::SortOrder)
            .order_by_asc(photo::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's photos (newest first).
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<photo::Model>> {
        Photo::find()
            .filter(photo::Column::UserId.eq(user_id))
            .order_by_desc(photo::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an existing photo with the same MD5 digest on an order.
    pub async fn find_by_md5_for_order(
        &self,
        order_id: &str,
        md5: &str,
    ) -> AppResult<Option<photo::Model>> {
        Photo::find()
            .filter(photo::Column::OrderId.eq(order_id))
            .filter(photo::Column::Md5.eq(md5))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Highest sort order on an order, if any photos exist.
    pub async fn max_sort_order(&self, order_id: &str) -> AppResult<Option<i32>> {
        let result = Photo::find()
            .filter(photo::Column::OrderId.eq(order_id))
            .select_only()
            .column_as(photo::Column::SortOrder.max(), "max_sort")
            .into_model::<MaxSortResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.max_sort))
    }

    /// Create a new photo record.
    pub async fn create(&self, model: photo::ActiveModel) -> AppResult<photo::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a photo record.
    pub async fn update(&self, model: photo::ActiveModel) -> AppResult<photo::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a photo record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Photo::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete multiple photo records.
    pub async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Photo::delete_many()
            .filter(photo::Column::Id.is_in(ids.to_vec()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count all photos.
    pub async fn count(&self) -> AppResult<u64> {
        Photo::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count photos on an order.
    pub async fn count_by_order(&self, order_id: &str) -> AppResult<u64> {
        Photo::find()
            .filter(photo::Column::OrderId.eq(order_id))
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
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_photo(id: &str, order_id: &str, sort_order: i32) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            user_id: Some("user1".to_string()),
            order_id: Some(order_id.to_string()),
            filename: "devanture.jpg".to_string(),
            stored_filename: format!("1717243200000_{id}.jpg"),
            original_url: format!("http://localhost:3000/uploads/photos/1717243200000_{id}.jpg"),
            thumbnail_url: None,
            size: 204_800,
            mime_type: "image/jpeg".to_string(),
            width: Some(1920),
            height: Some(1080),
            alt: None,
            sort_order,
            upload_status: "completed".to_string(),
            md5: Some("d41d8cd98f00b204e9800998ecf8427e".to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_is_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<photo::Model>::new()])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::PhotoNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let photos = repo.find_by_ids(&[]).await.unwrap();

        assert!(photos.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_order_returns_in_sort_order() {
        let first = create_test_photo("p1", "ord1", 0);
        let second = create_test_photo("p2", "ord1", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[first, second]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let photos = repo.find_by_order("ord1").await.unwrap();

        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].sort_order, 0);
        assert_eq!(photos[1].sort_order, 1);
    }

    #[tokio::test]
    async fn test_delete_many_returns_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let deleted = repo
            .delete_many(&["p1".to_string(), "p2".to_string()])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_delete_many_empty_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let deleted = repo.delete_many(&[]).await.unwrap();

        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_max_sort_order_none_when_no_photos() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "max_sort" => sea_orm::Value::Int(None)
                }]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db);
        let max = repo.max_sort_order("ord1").await.unwrap();

        assert!(max.is_none());
    }
}
