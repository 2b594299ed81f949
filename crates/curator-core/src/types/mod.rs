//! Core type definitions used across the Curator workspace.

pub mod batch;
pub mod id;
pub mod pagination;
pub mod sorting;

pub use batch::{BatchFailure, BatchOutcome};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortKey};
