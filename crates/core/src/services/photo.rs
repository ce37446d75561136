//! Photo ingestion service.

use chrono::Utc;
use salonkit_common::storage::generate_stored_filename;
use salonkit_common::{AppError, AppResult, IdGenerator, PhotoStorage};
use salonkit_db::entities::photo;
use salonkit_db::repositories::{OrderRepository, PhotoRepository};
use salonkit_db::types::UploadStatus;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;

use crate::services::media::{MAX_UPLOAD_BYTES, MediaProcessor};

/// An upload taken from the multipart request.
#[derive(Debug)]
pub struct UploadPhotoInput {
    /// Original client-side file name.
    pub filename: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
    /// Client-chosen photo ID, if any.
    pub photo_id: Option<String>,
    /// Order to attach the photo to.
    pub order_id: Option<String>,
}

/// A bulk operation over a list of owned photos.
///
/// Every referenced photo must belong to the caller (directly or through its
/// order) or the whole batch is rejected; partial application never happens.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "items", rename_all = "snake_case")]
pub enum BulkPhotoAction {
    /// Assign new sort positions.
    Reorder(Vec<ReorderItem>),
    /// Delete all listed photos.
    Delete(Vec<String>),
    /// Replace alt text.
    UpdateAlt(Vec<UpdateAltItem>),
}

/// One reorder entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: String,
    pub sort_order: i32,
}

/// One alt-text entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAltItem {
    pub id: String,
    pub alt: Option<String>,
}

/// Service for photo uploads and gallery management.
#[derive(Clone)]
pub struct PhotoService {
    photo_repo: PhotoRepository,
    order_repo: OrderRepository,
    storage: PhotoStorage,
    media: MediaProcessor,
    id_gen: IdGenerator,
}

impl PhotoService {
    /// Create a new photo service.
    #[must_use]
    pub const fn new(
        photo_repo: PhotoRepository,
        order_repo: OrderRepository,
        storage: PhotoStorage,
    ) -> Self {
        Self {
            photo_repo,
            order_repo,
            storage,
            media: MediaProcessor::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Ingest an uploaded photo.
    ///
    /// Size and type are checked before anything touches disk or the
    /// database. A re-upload of bytes already on the order returns the
    /// existing record.
    pub async fn upload(&self, user_id: &str, input: UploadPhotoInput) -> AppResult<photo::Model> {
        if input.data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "File exceeds the {} MiB upload limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        if !self.media.is_supported(&input.mime_type, &input.filename) {
            return Err(AppError::Validation(
                "Only JPEG, PNG and WebP images are accepted".to_string(),
            ));
        }

        if let Some(ref order_id) = input.order_id {
            self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        }

        let digest = format!("{:x}", md5::compute(&input.data));

        if let Some(ref order_id) = input.order_id {
            if let Some(existing) = self
                .photo_repo
                .find_by_md5_for_order(order_id, &digest)
                .await?
            {
                info!(photo_id = %existing.id, "duplicate upload, returning existing photo");
                return Ok(existing);
            }
        }

        let processed = self.media.process(&input.data, &input.mime_type);

        let stored_filename = generate_stored_filename(&input.filename);
        let stored = self
            .storage
            .save(
                &stored_filename,
                &processed.data,
                processed.thumbnail.as_deref(),
            )
            .await?;

        let sort_order = match input.order_id {
            Some(ref order_id) => self
                .photo_repo
                .max_sort_order(order_id)
                .await?
                .map_or(0, |max| max + 1),
            None => 0,
        };

        let size = i64::try_from(processed.data.len()).unwrap_or(i64::MAX);
        let model = photo::ActiveModel {
            id: Set(input.photo_id.unwrap_or_else(|| self.id_gen.generate())),
            user_id: Set(Some(user_id.to_string())),
            order_id: Set(input.order_id),
            filename: Set(input.filename),
            stored_filename: Set(stored.stored_filename),
            original_url: Set(stored.url),
            thumbnail_url: Set(stored.thumbnail_url),
            size: Set(size),
            mime_type: Set(processed.mime_type),
            width: Set(processed.width.and_then(|w| i32::try_from(w).ok())),
            height: Set(processed.height.and_then(|h| i32::try_from(h).ok())),
            alt: Set(None),
            sort_order: Set(sort_order),
            upload_status: Set(UploadStatus::Completed.as_str().to_string()),
            md5: Set(Some(digest)),
            created_at: Set(Utc::now().into()),
        };

        self.photo_repo.create(model).await
    }

    /// List photos on an order the caller owns.
    pub async fn list_for_order(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> AppResult<Vec<photo::Model>> {
        self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        self.photo_repo.find_by_order(order_id).await
    }

    /// List all of the caller's photos.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<photo::Model>> {
        self.photo_repo.find_by_user(user_id).await
    }

    /// Update a photo's alt text and sort position.
    pub async fn update(
        &self,
        user_id: &str,
        photo_id: &str,
        alt: Option<String>,
        sort_order: Option<i32>,
    ) -> AppResult<photo::Model> {
        let photo = self.get_owned(photo_id, user_id).await?;

        let mut active: photo::ActiveModel = photo.into();
        if let Some(alt) = alt {
            active.alt = Set(Some(alt));
        }
        if let Some(sort_order) = sort_order {
            active.sort_order = Set(sort_order);
        }

        self.photo_repo.update(active).await
    }

    /// Delete a photo and its files.
    ///
    /// Disk removal is best-effort; the database row goes away regardless of
    /// what is (or is not) on disk.
    pub async fn delete(&self, user_id: &str, photo_id: &str) -> AppResult<()> {
        let photo = self.get_owned(photo_id, user_id).await?;

        self.storage.delete(&photo.stored_filename).await;
        self.photo_repo.delete(photo_id).await
    }

    /// Apply a bulk action to a list of photos, all-or-nothing.
    pub async fn bulk(&self, user_id: &str, action: BulkPhotoAction) -> AppResult<u64> {
        let ids: Vec<String> = match &action {
            BulkPhotoAction::Reorder(items) => items.iter().map(|i| i.id.clone()).collect(),
            BulkPhotoAction::Delete(ids) => ids.clone(),
            BulkPhotoAction::UpdateAlt(items) => items.iter().map(|i| i.id.clone()).collect(),
        };

        if ids.is_empty() {
            return Err(AppError::Validation("No photos given".to_string()));
        }

        let photos = self.photo_repo.find_by_ids(&ids).await?;
        if photos.len() != ids.len() {
            return Err(AppError::PhotoNotFound(
                "One or more photos do not exist".to_string(),
            ));
        }

        for photo in &photos {
            if !self.owns(photo, user_id).await? {
                return Err(AppError::Forbidden(
                    "Batch contains photos owned by another account".to_string(),
                ));
            }
        }

        // Ownership verified for the whole batch; apply.
        match action {
            BulkPhotoAction::Reorder(items) => {
                let count = items.len() as u64;
                for item in items {
                    let photo = self.photo_repo.get_by_id(&item.id).await?;
                    let mut active: photo::ActiveModel = photo.into();
                    active.sort_order = Set(item.sort_order);
                    self.photo_repo.update(active).await?;
                }
                Ok(count)
            }
            BulkPhotoAction::Delete(ids) => {
                for photo in &photos {
                    self.storage.delete(&photo.stored_filename).await;
                }
                self.photo_repo.delete_many(&ids).await
            }
            BulkPhotoAction::UpdateAlt(items) => {
                let count = items.len() as u64;
                for item in items {
                    let photo = self.photo_repo.get_by_id(&item.id).await?;
                    let mut active: photo::ActiveModel = photo.into();
                    active.alt = Set(item.alt);
                    self.photo_repo.update(active).await?;
                }
                Ok(count)
            }
        }
    }

    /// Fetch a photo the caller owns, directly or through its order.
    ///
    /// Foreign photos are reported as not found.
    async fn get_owned(&self, photo_id: &str, user_id: &str) -> AppResult<photo::Model> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;
        if self.owns(&photo, user_id).await? {
            Ok(photo)
        } else {
            Err(AppError::PhotoNotFound(photo_id.to_string()))
        }
    }

    async fn owns(&self, photo: &photo::Model, user_id: &str) -> AppResult<bool> {
        if photo.user_id.as_deref() == Some(user_id) {
            return Ok(true);
        }

        if let Some(ref order_id) = photo.order_id {
            if let Some(order) = self.order_repo.find_by_id(order_id).await? {
                return Ok(order.user_id.as_deref() == Some(user_id));
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>, root: PathBuf) -> PhotoService {
        PhotoService::new(
            PhotoRepository::new(db.clone()),
            OrderRepository::new(db),
            PhotoStorage::new(root, "http://localhost:3000/uploads"),
        )
    }

    fn test_photo(id: &str, user_id: &str) -> photo::Model {
        photo::Model {
            id: id.to_string(),
            user_id: Some(user_id.to_string()),
            order_id: None,
            filename: "devanture.jpg".to_string(),
            stored_filename: format!("1717243200000_{id}.jpg"),
            original_url: format!("http://localhost:3000/uploads/photos/1717243200000_{id}.jpg"),
            thumbnail_url: None,
            size: 1024,
            mime_type: "image/jpeg".to_string(),
            width: Some(640),
            height: Some(480),
            alt: None,
            sort_order: 0,
            upload_status: "completed".to_string(),
            md5: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        // No query results are queued: any DB touch would panic the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(db, dir.path().to_path_buf());

        let result = service
            .upload(
                "user1",
                UploadPhotoInput {
                    filename: "huge.jpg".to_string(),
                    mime_type: "image/jpeg".to_string(),
                    data: vec![0u8; MAX_UPLOAD_BYTES + 1],
                    photo_id: None,
                    order_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_mime() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(db, dir.path().to_path_buf());

        let result = service
            .upload(
                "user1",
                UploadPhotoInput {
                    filename: "animation.gif".to_string(),
                    mime_type: "image/gif".to_string(),
                    data: vec![0u8; 128],
                    photo_id: None,
                    order_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_delete_with_missing_disk_file_removes_row() {
        let photo = test_photo("p1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[photo]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(db, dir.path().to_path_buf());

        // Nothing was ever written to disk for this photo.
        service.delete("user1", "p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_bulk_rejects_batch_with_foreign_photo() {
        let mine = test_photo("p1", "user1");
        let foreign = test_photo("p2", "someone-else");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[mine, foreign]])
                .into_connection(),
        );
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(db, dir.path().to_path_buf());

        let result = service
            .bulk(
                "user1",
                BulkPhotoAction::Delete(vec!["p1".to_string(), "p2".to_string()]),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_bulk_rejects_missing_photo() {
        let mine = test_photo("p1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[mine]])
                .into_connection(),
        );
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(db, dir.path().to_path_buf());

        let result = service
            .bulk(
                "user1",
                BulkPhotoAction::Delete(vec!["p1".to_string(), "gone".to_string()]),
            )
            .await;

        assert!(matches!(result, Err(AppError::PhotoNotFound(_))));
    }

    #[tokio::test]
    async fn test_bulk_empty_batch_is_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(db, dir.path().to_path_buf());

        let result = service.bulk("user1", BulkPhotoAction::Delete(vec![])).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
