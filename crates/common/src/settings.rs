//! Flat-file site settings document.
//!
//! Admin-editable settings that do not belong in the relational schema are
//! kept in a single JSON file, loaded on read and rewritten atomically on
//! save.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Site-wide settings document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Public site name.
    pub site_name: String,
    /// Contact email shown on the marketing site.
    pub contact_email: Option<String>,
    /// Email address receiving admin notifications.
    pub notification_email: Option<String>,
    /// Whether new checkouts are accepted.
    pub checkout_enabled: bool,
    /// Maintenance banner text (shown when set).
    pub maintenance_message: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Salonkit".to_string(),
            contact_email: None,
            notification_email: None,
            checkout_enabled: true,
            maintenance_message: None,
        }
    }
}

/// Loads and persists the [`SiteSettings`] document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load settings, falling back to defaults when the file is absent.
    pub async fn load(&self) -> AppResult<SiteSettings> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::Config(format!("Malformed settings file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SiteSettings::default()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read settings file: {e}"
            ))),
        }
    }

    /// Persist settings, writing to a temporary file and renaming into place.
    pub async fn save(&self, settings: &SiteSettings) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| AppError::Internal(format!("Failed to serialize settings: {e}")))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write settings file: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to replace settings file: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let settings = store.load().await.unwrap();
        assert_eq!(settings, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/settings.json"));

        let mut settings = SiteSettings::default();
        settings.site_name = "Coiffure & Co".to_string();
        settings.checkout_enabled = false;
        settings.maintenance_message = Some("Back soon".to_string());

        store.save(&settings).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, settings);
    }
}
