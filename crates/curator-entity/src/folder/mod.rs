//! Folder domain entities and path derivation.

pub mod model;
pub mod path;

pub use model::{CreateFolder, Folder, FolderFieldsUpdate, FolderStructureUpdate, PathInconsistency};
