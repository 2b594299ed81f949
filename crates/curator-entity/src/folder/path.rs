//! Materialized-path derivation.
//!
//! Pure functions; every mutating folder operation goes through these to
//! compute `path` and `id_path` values before touching storage.
//!
//! Segments are slash-delimited and neither names nor ids may contain `/`,
//! so no stored path is ever a non-boundary prefix of another. Prefix
//! matching must still be boundary-aware on the consuming side; see
//! [`starts_within`].

use curator_core::types::FolderId;
use curator_core::{AppError, AppResult};

/// Validate a folder or asset display name.
///
/// Rejects empty and whitespace-only names, and names containing `/`
/// (which would corrupt the materialized paths).
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.contains('/') {
        return Err(AppError::validation("Name cannot contain '/'"));
    }
    Ok(())
}

/// Build a folder's name path from its parent's path and its own name.
///
/// Root folders (no parent) get `/{name}`.
pub fn build_path(parent_path: Option<&str>, name: &str) -> AppResult<String> {
    validate_name(name)?;
    match parent_path {
        Some(parent) => Ok(format!("{parent}/{name}")),
        None => Ok(format!("/{name}")),
    }
}

/// Build a folder's id path from its parent's id path and its own id.
///
/// Ids never change, so this value is stable across renames.
pub fn build_id_path(parent_id_path: Option<&str>, id: FolderId) -> String {
    match parent_id_path {
        Some(parent) => format!("{parent}/{id}"),
        None => format!("/{id}"),
    }
}

/// Whether `candidate` equals `ancestor` or sits inside its subtree.
///
/// Boundary-aware: `/Apps` is not within `/App`.
pub fn starts_within(candidate: &str, ancestor: &str) -> bool {
    candidate == ancestor
        || (candidate.starts_with(ancestor) && candidate.as_bytes().get(ancestor.len()) == Some(&b'/'))
}

/// Rewrite the `old_prefix` of a materialized path to `new_prefix`.
///
/// Only rewrites at a slash boundary (or an exact match); anything else is
/// returned unchanged.
pub fn replace_path_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    if path == old_prefix {
        return new_prefix.to_string();
    }
    if starts_within(path, old_prefix) {
        return format!("{new_prefix}{}", &path[old_prefix.len()..]);
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_path_root_and_nested() {
        assert_eq!(build_path(None, "Images").unwrap(), "/Images");
        assert_eq!(
            build_path(Some("/Images"), "Photos").unwrap(),
            "/Images/Photos"
        );
    }

    #[test]
    fn test_build_path_rejects_bad_names() {
        assert!(build_path(None, "").is_err());
        assert!(build_path(None, "   ").is_err());
        assert!(build_path(None, "a/b").is_err());
    }

    #[test]
    fn test_build_id_path() {
        let f1 = FolderId::new();
        let f2 = FolderId::new();
        let root = build_id_path(None, f1);
        assert_eq!(root, format!("/{f1}"));
        assert_eq!(build_id_path(Some(&root), f2), format!("/{f1}/{f2}"));
    }

    #[test]
    fn test_starts_within_is_boundary_aware() {
        assert!(starts_within("/App/Sub", "/App"));
        assert!(starts_within("/App", "/App"));
        assert!(!starts_within("/Apps", "/App"));
        assert!(!starts_within("/Ap", "/App"));
    }

    #[test]
    fn test_replace_path_prefix() {
        assert_eq!(replace_path_prefix("/A/B/C", "/A", "/A2"), "/A2/B/C");
        assert_eq!(replace_path_prefix("/A", "/A", "/A2"), "/A2");
        // Not a boundary match; untouched.
        assert_eq!(replace_path_prefix("/AB/C", "/A", "/A2"), "/AB/C");
    }

    #[test]
    fn test_rename_keeps_descendant_suffix() {
        // Renaming /A to /A2 rewrites the prefix of every descendant.
        let descendant = "/A/B/deep/leaf";
        assert_eq!(
            replace_path_prefix(descendant, "/A", "/A2"),
            "/A2/B/deep/leaf"
        );
    }
}
