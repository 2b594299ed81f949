//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use curator_core::types::{FolderId, UserId};

/// A folder in the asset library.
///
/// Folders live in a flat table but form a tree through `parent_id`. Two
/// denormalized materialized paths keep descendant queries cheap:
///
/// * `path` is built from mutable *names* (`/Images/Photos`) and must be
///   rewritten whenever an ancestor is renamed or moved.
/// * `id_path` is built from immutable *ids* (`/f1/f2`) and survives
///   renames untouched; moves rewrite it for the whole subtree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier, assigned at creation, immutable.
    pub id: FolderId,
    /// Display name, unique only among live siblings.
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// Materialized name path (e.g., `/Images/Photos`).
    pub path: String,
    /// Materialized id path (e.g., `/f1/f2`).
    pub id_path: String,
    /// Optional description.
    pub description: Option<String>,
    /// Denormalized count of live child folders. Informational only.
    pub child_count: i32,
    /// Denormalized count of live assets in this folder. Informational only.
    pub asset_count: i32,
    /// Who created the folder.
    pub created_by: UserId,
    /// Who last updated the folder.
    pub updated_by: Option<UserId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; live rows have `None`.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if the folder is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new folder.
///
/// `path` and `id_path` are computed by the caller before insertion; the
/// repository persists them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolder {
    /// The pre-generated folder id (it is a segment of `id_path`).
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Pre-computed name path.
    pub path: String,
    /// Pre-computed id path.
    pub id_path: String,
    /// Optional description.
    pub description: Option<String>,
    /// The creating user.
    pub created_by: UserId,
}

/// Non-structural field edits (no path impact by themselves).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFieldsUpdate {
    /// New name, if changing.
    pub name: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
}

/// A structural patch: where a folder sits and both its materialized paths.
///
/// Used by the move cascade and by the path repair pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderStructureUpdate {
    /// The folder to patch.
    pub id: FolderId,
    /// New parent (None for root).
    pub parent_id: Option<FolderId>,
    /// New name path.
    pub path: String,
    /// New id path.
    pub id_path: String,
}

/// A folder whose stored paths disagree with its parent's, the residue of
/// an interrupted cascade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PathInconsistency {
    /// The affected folder.
    pub folder_id: FolderId,
    /// The path currently stored.
    pub actual_path: String,
    /// The path the parent chain implies.
    pub expected_path: String,
    /// The id path currently stored.
    pub actual_id_path: String,
    /// The id path the parent chain implies.
    pub expected_id_path: String,
}
