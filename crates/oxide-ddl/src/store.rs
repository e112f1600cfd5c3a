//! Schema snapshot storage.
//!
//! The translator reads the current shape of a table from a [`SchemaStore`]
//! before translating an operation and writes the new shape back right
//! after, so later operations in the same script see the updated state.
//!
//! A store is single-owner mutable state: it is passed explicitly into every
//! translation call and must not be shared between concurrent translations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslateError};
use crate::schema::{Column, Index, Table};

/// Read/write access to the current schema.
pub trait SchemaStore {
    /// Returns a copy of the named table's definition.
    fn table_info(&self, table: &str) -> Result<Table>;

    /// Inserts or replaces a table, keyed by its name.
    fn set_table(&mut self, table: Table);

    /// Removes a table. Removing an unknown table is a no-op.
    fn delete_table(&mut self, table: &str);

    /// Returns a copy of an index definition.
    fn index_info(&self, table: &str, index: &str) -> Result<Index> {
        self.table_info(table)?
            .get_index(index)
            .cloned()
            .ok_or_else(|| TranslateError::index_not_found(table, index))
    }

    /// Returns a copy of a column definition.
    fn column_info(&self, table: &str, column: &str) -> Result<Column> {
        self.table_info(table)?
            .get_column(column)
            .cloned()
            .ok_or_else(|| TranslateError::column_not_found(table, column))
    }
}

/// In-memory schema snapshot keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemorySchema {
    tables: BTreeMap<String, Table>,
}

impl InMemorySchema {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table to the snapshot.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.set_table(table);
        self
    }

    /// Gets a table by name without copying it.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&Table> {
        self.tables.get(table)
    }

    /// Returns whether the snapshot knows the table.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Returns table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the snapshot holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SchemaStore for InMemorySchema {
    fn table_info(&self, table: &str) -> Result<Table> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| TranslateError::table_not_found(table))
    }

    fn set_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    fn delete_table(&mut self, table: &str) {
        self.tables.remove(table);
    }
}
