//! Sorting types for list endpoints.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Columns a library listing may be sorted by.
///
/// Both folder and asset listings accept the same keys; the enum keeps the
/// column name out of user-controlled input so it can be interpolated into
/// `ORDER BY` clauses safely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Sort by display name.
    #[default]
    Name,
    /// Sort by creation time.
    CreatedAt,
    /// Sort by last-update time.
    UpdatedAt,
}

impl SortKey {
    /// Return the column name for this key.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sql() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_sort_key_deserializes_camel_case() {
        let key: SortKey = serde_json::from_str("\"createdAt\"").expect("parse");
        assert_eq!(key, SortKey::CreatedAt);
        assert_eq!(key.as_sql(), "created_at");
    }
}
