//! String-backed status types shared by entities, repositories and services.
//!
//! Columns store the lowercase string form; these enums are the typed view
//! used everywhere above the schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// String form stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the guided website setup wizard an order has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStep {
    DomainSelection,
    BusinessInfo,
    DesignPreferences,
    ContentUpload,
    PhotosUpload,
    ReviewLaunch,
    Completed,
}

impl SetupStep {
    /// String form stored in the `setup_step` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomainSelection => "domain_selection",
            Self::BusinessInfo => "business_info",
            Self::DesignPreferences => "design_preferences",
            Self::ContentUpload => "content_upload",
            Self::PhotosUpload => "photos_upload",
            Self::ReviewLaunch => "review_launch",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for SetupStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain_selection" => Ok(Self::DomainSelection),
            "business_info" => Ok(Self::BusinessInfo),
            "design_preferences" => Ok(Self::DesignPreferences),
            "content_upload" => Ok(Self::ContentUpload),
            "photos_upload" => Ok(Self::PhotosUpload),
            "review_launch" => Ok(Self::ReviewLaunch),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown setup step: {other}")),
        }
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Photo upload processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    /// String form stored in the `upload_status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for UploadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploading" => Ok(Self::Uploading),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown upload status: {other}")),
        }
    }
}

/// Inbound contact message status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    /// String form stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown message status: {other}")),
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Admin,
}

impl UserRole {
    /// String form stored in the `role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_setup_step_roundtrip() {
        for step in [
            SetupStep::DomainSelection,
            SetupStep::BusinessInfo,
            SetupStep::DesignPreferences,
            SetupStep::ContentUpload,
            SetupStep::PhotosUpload,
            SetupStep::ReviewLaunch,
            SetupStep::Completed,
        ] {
            assert_eq!(step.as_str().parse::<SetupStep>().unwrap(), step);
        }
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("payment".parse::<SetupStep>().is_err());
        assert!("root".parse::<UserRole>().is_err());
    }
}
