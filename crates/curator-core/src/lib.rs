//! # curator-core
//!
//! Core crate for Curator. Contains configuration schemas, typed
//! identifiers, pagination/sorting/batch types, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Curator crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
