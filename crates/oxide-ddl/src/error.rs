//! Error types for schema translation.

use std::fmt;

/// The kind of schema entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A table.
    Table,
    /// A column of a table.
    Column,
    /// An index of a table.
    Index,
    /// A foreign key of a table.
    ForeignKey,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Index => "index",
            Self::ForeignKey => "foreign key",
        };
        f.write_str(s)
    }
}

/// Errors that can occur while translating an operation.
///
/// Every error is terminal for the operation being translated. Effects of
/// operations translated earlier in the same session stay applied to the
/// schema snapshot.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// A table, column, index or foreign key is missing from the snapshot.
    #[error("Could not find {kind} '{name}'")]
    NotFound {
        /// What was looked up.
        kind: EntityKind,
        /// The qualified name that was looked up.
        name: String,
    },

    /// An operation carrying a fixed-size payload got the wrong count.
    #[error("{operation} expects {expected} names, got {actual}")]
    Arity {
        /// The operation that was given the wrong payload.
        operation: &'static str,
        /// The number of names it requires.
        expected: usize,
        /// The number of names it got.
        actual: usize,
    },

    /// The abstract column type has no mapping in the target dialect.
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// The dialect cannot express the operation, not even through table recreation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The requested definition contradicts itself or the current schema.
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// IO error (reading/writing script or snapshot files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TranslateError {
    pub(crate) fn table_not_found(table: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Table,
            name: table.to_string(),
        }
    }

    pub(crate) fn column_not_found(table: &str, column: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Column,
            name: format!("{}.{}", table, column),
        }
    }

    pub(crate) fn index_not_found(table: &str, index: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Index,
            name: format!("{}.{}", table, index),
        }
    }

    pub(crate) fn foreign_key_not_found(table: &str, name: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::ForeignKey,
            name: format!("{}.{}", table, name),
        }
    }
}

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;
