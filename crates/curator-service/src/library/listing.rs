//! Library browsing: one folder level, folders unpaginated, assets paged.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use curator_core::types::pagination::PageRequest;
use curator_core::types::{FolderId, SortDirection, SortKey, UserId};
use curator_core::{AppError, AppResult};
use curator_database::repositories::asset::AssetRepository;
use curator_database::repositories::folder::FolderRepository;
use curator_database::repositories::user::UserRepository;
use curator_entity::asset::model::Asset;
use curator_entity::folder::model::Folder;

use crate::context::RequestContext;

/// A browse request for one folder level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryQuery {
    /// The folder being browsed (None = library root).
    pub folder_id: Option<FolderId>,
    /// Optional case-insensitive substring filter.
    pub query: Option<String>,
    /// Sort column.
    #[serde(default)]
    pub sort_by: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortDirection,
    /// Asset pagination; folders are always returned in full.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// A folder row with its creator's display name joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderItem {
    /// The folder.
    #[serde(flatten)]
    pub folder: Folder,
    /// Display name of the creating user, when still known.
    pub created_by_name: Option<String>,
}

/// An asset row with its uploader's display name joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetItem {
    /// The asset.
    #[serde(flatten)]
    pub asset: Asset,
    /// Display name of the uploading user, when still known.
    pub uploaded_by_name: Option<String>,
}

/// Asset pagination for the listing response.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPagination {
    /// Current page (1-based).
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total matching assets across all pages.
    pub total_assets: u64,
    /// Total pages.
    pub total_pages: u64,
}

/// One level of the library.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryListing {
    /// The folder being browsed (None at the root).
    pub current_folder: Option<Folder>,
    /// All matching child folders, unpaginated.
    pub folders: Vec<FolderItem>,
    /// The requested page of matching assets.
    pub assets: Vec<AssetItem>,
    /// Asset pagination.
    pub pagination: LibraryPagination,
}

/// Read-side composition for the library browser.
#[derive(Debug, Clone)]
pub struct ListingService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Asset repository.
    asset_repo: Arc<AssetRepository>,
    /// User repository (display-name joins).
    user_repo: Arc<UserRepository>,
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        asset_repo: Arc<AssetRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            folder_repo,
            asset_repo,
            user_repo,
        }
    }

    /// Browse one folder level.
    ///
    /// The child-folder query and the asset page (with its count) are
    /// dispatched concurrently, for round-trip hiding rather than
    /// atomicity, then creator/uploader display names are joined via one
    /// chunked user lookup.
    pub async fn browse(
        &self,
        ctx: &RequestContext,
        query: LibraryQuery,
    ) -> AppResult<LibraryListing> {
        ctx.require_admin()?;

        let current_folder = match query.folder_id {
            Some(id) => {
                let folder = self
                    .folder_repo
                    .find_by_id(id)
                    .await?
                    .filter(|f| !f.is_deleted())
                    .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
                Some(folder)
            }
            None => None,
        };

        let filter = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty());

        let folders_fut = self.folder_repo.find_children(
            query.folder_id,
            filter,
            query.sort_by,
            query.sort_order,
        );
        let assets_fut = self.asset_repo.find_by_folder(
            query.folder_id,
            filter,
            query.sort_by,
            query.sort_order,
            &query.page,
        );
        let (folders, asset_page) = tokio::try_join!(folders_fut, assets_fut)?;

        let mut user_ids: HashSet<UserId> = HashSet::new();
        user_ids.extend(folders.iter().map(|f| f.created_by));
        user_ids.extend(asset_page.items.iter().map(|a| a.uploaded_by));
        let user_ids: Vec<UserId> = user_ids.into_iter().collect();
        let labels = self.user_repo.find_labels(&user_ids).await?;

        let pagination = LibraryPagination {
            page: asset_page.page,
            limit: asset_page.limit,
            total_assets: asset_page.total_items,
            total_pages: asset_page.total_pages,
        };

        Ok(LibraryListing {
            current_folder,
            folders: folders
                .into_iter()
                .map(|folder| {
                    let created_by_name = labels.get(&folder.created_by).cloned();
                    FolderItem {
                        folder,
                        created_by_name,
                    }
                })
                .collect(),
            assets: asset_page
                .items
                .into_iter()
                .map(|asset| {
                    let uploaded_by_name = labels.get(&asset.uploaded_by).cloned();
                    AssetItem {
                        asset,
                        uploaded_by_name,
                    }
                })
                .collect(),
            pagination,
        })
    }
}
