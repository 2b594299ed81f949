//! Asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curator_core::types::{AssetId, FolderId, UserId};

use super::kind::AssetKind;

/// A stored media asset.
///
/// Assets are leaves: they carry no materialized path of their own, only a
/// `folder_id` (null for root placement). The upload collaborator has
/// already persisted the bytes somewhere and handed back `url`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique asset identifier.
    pub id: AssetId,
    /// The containing folder (None = library root).
    pub folder_id: Option<FolderId>,
    /// Media category.
    pub kind: AssetKind,
    /// Display name.
    pub name: String,
    /// The filename at upload time.
    pub original_name: String,
    /// MIME type reported at upload.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Public URL of the stored bytes.
    pub url: String,
    /// Pixel width, for images and video.
    pub width: Option<i32>,
    /// Pixel height, for images and video.
    pub height: Option<i32>,
    /// Duration in seconds, for video.
    pub duration_seconds: Option<f64>,
    /// Thumbnail URL, when one was generated.
    pub thumbnail_url: Option<String>,
    /// Caption shown under the asset.
    pub caption: Option<String>,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Who uploaded the asset.
    pub uploaded_by: UserId,
    /// Who last updated the asset.
    pub updated_by: Option<UserId>,
    /// When the asset was registered.
    pub created_at: DateTime<Utc>,
    /// When the asset was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; live rows have `None`.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Asset {
    /// Check if the asset is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to register a new asset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAsset {
    /// The containing folder (None = library root).
    pub folder_id: Option<FolderId>,
    /// Media category.
    pub kind: AssetKind,
    /// Display name.
    pub name: String,
    /// The filename at upload time.
    pub original_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Public URL of the stored bytes.
    pub url: String,
    /// Pixel width.
    pub width: Option<i32>,
    /// Pixel height.
    pub height: Option<i32>,
    /// Duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// Caption.
    pub caption: Option<String>,
    /// Alt text.
    pub alt_text: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The uploading user.
    pub uploaded_by: UserId,
}

/// Editable asset fields (no structural impact).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFieldsUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New caption.
    pub caption: Option<String>,
    /// New alt text.
    pub alt_text: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}
