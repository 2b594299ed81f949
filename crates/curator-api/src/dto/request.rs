//! Request DTOs with validation.
//!
//! The wire format is camelCase throughout; ids arrive as untyped UUIDs
//! and are narrowed to their domain types at the service boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use curator_core::types::{SortDirection, SortKey};
use curator_entity::asset::AssetKind;

/// Query parameters of the library listing entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLibraryParams {
    /// Folder to browse (absent = library root).
    pub folder_id: Option<Uuid>,
    /// Case-insensitive substring filter.
    pub query: Option<String>,
    /// Sort column.
    pub sort_by: Option<SortKey>,
    /// Sort direction.
    pub sort_order: Option<SortDirection>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Assets per page.
    pub limit: Option<u64>,
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Parent folder ID.
    pub parent_id: Option<Uuid>,
    /// Description.
    pub description: Option<String>,
}

/// Update folder request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Query parameters for folder deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderParams {
    /// Also remove descendants and contained assets.
    #[serde(default)]
    pub recursive: bool,
}

/// Query parameters for a children listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChildrenParams {
    /// Case-insensitive substring filter.
    pub query: Option<String>,
    /// Sort column.
    pub sort_by: Option<SortKey>,
    /// Sort direction.
    pub sort_order: Option<SortDirection>,
}

/// Move selection request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemsRequest {
    /// Folder and asset ids being moved.
    #[validate(length(min = 1, message = "itemIds must not be empty"))]
    pub item_ids: Vec<Uuid>,
    /// Destination folder (null = library root).
    pub target_folder_id: Option<Uuid>,
}

/// Batch soft-delete / restore request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    /// Folder and asset ids.
    #[validate(length(min = 1, message = "itemIds must not be empty"))]
    pub item_ids: Vec<Uuid>,
}

/// Register an uploaded asset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetRequest {
    /// Target folder (absent = library root).
    pub folder_id: Option<Uuid>,
    /// Media category; inferred from the MIME type when omitted.
    pub kind: Option<AssetKind>,
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Filename at upload time.
    #[validate(length(min = 1, max = 255))]
    pub original_name: String,
    /// MIME type.
    #[validate(length(min = 1))]
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// URL produced by the upload collaborator.
    #[validate(url)]
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
}

/// Update asset request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255))]
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

/// Move a single asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAssetRequest {
    /// Destination folder (null = library root).
    pub target_folder_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_request_uses_camel_case() {
        let json = r#"{"itemIds":["6a0f1bb4-1111-4a6e-9c9f-5a5a5a5a5a5a"],"targetFolderId":null}"#;
        let req: MoveItemsRequest = serde_json::from_str(json).expect("parse");
        assert_eq!(req.item_ids.len(), 1);
        assert!(req.target_folder_id.is_none());
    }

    #[test]
    fn test_empty_selection_fails_validation() {
        let req = SelectionRequest { item_ids: vec![] };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_asset_requires_url() {
        let req = RegisterAssetRequest {
            folder_id: None,
            kind: None,
            name: "hero.png".into(),
            original_name: "hero.png".into(),
            mime_type: "image/png".into(),
            size_bytes: 10,
            url: "not a url".into(),
            width: None,
            height: None,
            duration_seconds: None,
            thumbnail_url: None,
            caption: None,
            alt_text: None,
            description: None,
            tags: vec![],
        };
        assert!(req.validate().is_err());
    }
}
