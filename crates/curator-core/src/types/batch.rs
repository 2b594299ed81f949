//! Per-row outcome reporting for batch operations.
//!
//! Multi-row cascades carry no cross-row atomicity guarantee, so callers
//! receive the outcome of every row instead of an all-or-nothing error.

use serde::Serialize;

/// A single failed row within a batch operation.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure<K: Serialize> {
    /// The identifier of the row that failed.
    pub id: K,
    /// What went wrong.
    pub message: String,
}

/// Outcome of a batch operation, row by row.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome<K: Serialize> {
    /// Rows that were persisted.
    pub succeeded: Vec<K>,
    /// Rows that were not.
    pub failed: Vec<BatchFailure<K>>,
}

impl<K: Serialize> BatchOutcome<K> {
    /// An outcome with no rows at all.
    pub fn empty() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Whether every row succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total rows attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

impl<K: Serialize> Default for BatchOutcome<K> {
    fn default() -> Self {
        Self::empty()
    }
}
