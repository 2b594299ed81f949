//! Asset operations.

pub mod service;

pub use service::{AssetService, RegisterAssetRequest};
