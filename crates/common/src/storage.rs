//! On-disk storage for uploaded photos.
//!
//! Layout under the uploads root:
//!
//! - `photos/<generated-name>`: the re-encoded original
//! - `thumbnails/thumb_<generated-name>`: the derived thumbnail

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{AppError, AppResult};

/// Metadata about a stored photo file.
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    /// Generated on-disk file name.
    pub stored_filename: String,
    /// Public URL of the original.
    pub url: String,
    /// Public URL of the thumbnail, if one was written.
    pub thumbnail_url: Option<String>,
}

/// Local filesystem storage for photo originals and thumbnails.
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    base_url: String,
}

impl PhotoStorage {
    /// Create a new photo storage rooted at `root`, served under `base_url`.
    #[must_use]
    pub fn new(root: PathBuf, base_url: impl Into<String>) -> Self {
        Self {
            root,
            base_url: base_url.into(),
        }
    }

    /// Path of an original under the uploads root.
    #[must_use]
    pub fn photo_path(&self, stored_filename: &str) -> PathBuf {
        self.root.join("photos").join(stored_filename)
    }

    /// Path of a thumbnail under the uploads root.
    #[must_use]
    pub fn thumbnail_path(&self, stored_filename: &str) -> PathBuf {
        self.root
            .join("thumbnails")
            .join(format!("thumb_{stored_filename}"))
    }

    /// Public URL of an original.
    #[must_use]
    pub fn photo_url(&self, stored_filename: &str) -> String {
        format!(
            "{}/photos/{stored_filename}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Public URL of a thumbnail.
    #[must_use]
    pub fn thumbnail_url(&self, stored_filename: &str) -> String {
        format!(
            "{}/thumbnails/thumb_{stored_filename}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Write a photo original and (optionally) its thumbnail.
    pub async fn save(
        &self,
        stored_filename: &str,
        original: &[u8],
        thumbnail: Option<&[u8]>,
    ) -> AppResult<StoredPhoto> {
        let photo_path = self.photo_path(stored_filename);
        write_file(&photo_path, original).await?;

        let thumbnail_url = if let Some(thumb) = thumbnail {
            let thumb_path = self.thumbnail_path(stored_filename);
            write_file(&thumb_path, thumb).await?;
            Some(self.thumbnail_url(stored_filename))
        } else {
            None
        };

        Ok(StoredPhoto {
            stored_filename: stored_filename.to_string(),
            url: self.photo_url(stored_filename),
            thumbnail_url,
        })
    }

    /// Remove a photo original and its thumbnail from disk, best-effort.
    ///
    /// A missing file is not an error: the database row is the source of
    /// truth and disk state is allowed to lag behind it. Other I/O failures
    /// are logged and swallowed so the caller can proceed with the database
    /// deletion.
    pub async fn delete(&self, stored_filename: &str) {
        for path in [
            self.photo_path(stored_filename),
            self.thumbnail_path(stored_filename),
        ] {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to delete photo file, proceeding anyway"
                    );
                }
            }
        }
    }

    /// Check whether an original exists on disk.
    pub async fn exists(&self, stored_filename: &str) -> bool {
        tokio::fs::try_exists(self.photo_path(stored_filename))
            .await
            .unwrap_or(false)
    }
}

async fn write_file(path: &Path, data: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))
}

/// Generate a unique stored file name, keeping a sanitized extension.
#[must_use]
pub fn generate_stored_filename(original_name: &str) -> String {
    let extension = original_name
        .rsplit('.')
        .next()
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= 10
                && ext.chars().all(char::is_alphanumeric)
                && *ext != original_name
        })
        .map_or_else(|| "bin".to_string(), str::to_lowercase);

    let timestamp = chrono::Utc::now().timestamp_millis();
    format!("{timestamp}_{}.{extension}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_stored_filename() {
        let name = generate_stored_filename("salon.jpg");
        assert!(name.ends_with(".jpg"));

        let name = generate_stored_filename("photo.JPEG");
        assert!(name.ends_with(".jpeg"));

        let name = generate_stored_filename("noextension");
        assert!(name.ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_save_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path().to_path_buf(), "/uploads");

        let stored = storage
            .save("abc.jpg", b"original-bytes", Some(b"thumb-bytes"))
            .await
            .unwrap();

        assert_eq!(stored.url, "/uploads/photos/abc.jpg");
        assert_eq!(
            stored.thumbnail_url.as_deref(),
            Some("/uploads/thumbnails/thumb_abc.jpg")
        );
        assert!(storage.exists("abc.jpg").await);
        assert!(storage.thumbnail_path("abc.jpg").exists());

        storage.delete("abc.jpg").await;
        assert!(!storage.exists("abc.jpg").await);
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path().to_path_buf(), "/uploads");

        // Nothing was ever written; delete must still be fine.
        storage.delete("never-existed.jpg").await;
    }

    #[tokio::test]
    async fn test_save_without_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path().to_path_buf(), "/uploads");

        let stored = storage.save("deg.jpg", b"bytes", None).await.unwrap();
        assert!(stored.thumbnail_url.is_none());
        assert!(!storage.thumbnail_path("deg.jpg").exists());
    }
}
