//! Schema-change operations.
//!
//! An [`Operation`] is an already-parsed, database-agnostic description of a
//! single schema change. It is consumed once by the translator and not
//! retained.

use serde::{Deserialize, Serialize};

use crate::schema::{Column, ForeignKey, Table};

/// A single schema-change operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create a new table.
    CreateTable {
        /// Full table definition.
        table: Table,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: String,
    },

    /// Rename a table. Exactly two names are required: old then new.
    RenameTable {
        /// Old and new table name.
        names: Vec<String>,
    },

    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        column: Column,
    },

    /// Drop a column from a table.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: String,
        /// Old column name.
        old_name: String,
        /// New column name.
        new_name: String,
    },

    /// Replace a column's type and options. The column is matched by name.
    ChangeColumn {
        /// Table name.
        table: String,
        /// New column definition.
        column: Column,
    },

    /// Create an index.
    AddIndex {
        /// Table name.
        table: String,
        /// Columns to index.
        columns: Vec<String>,
        /// Explicit index name, derived from table and columns when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Whether this is a unique index.
        #[serde(default)]
        unique: bool,
    },

    /// Drop an index.
    DropIndex {
        /// Table name.
        table: String,
        /// Index name.
        name: String,
    },

    /// Rename an index.
    RenameIndex {
        /// Table name.
        table: String,
        /// Old index name.
        old_name: String,
        /// New index name.
        new_name: String,
    },

    /// Add a foreign key constraint.
    AddForeignKey {
        /// Table name.
        table: String,
        /// Foreign key definition.
        foreign_key: ForeignKey,
    },

    /// Drop a foreign key constraint.
    DropForeignKey {
        /// Table name.
        table: String,
        /// Constraint name (explicit or derived).
        name: String,
    },

    /// Run a raw SQL statement. The schema snapshot is left untouched.
    RawSql {
        /// The statement.
        sql: String,
    },
}

impl Operation {
    /// Creates a CreateTable operation.
    #[must_use]
    pub fn create_table(table: Table) -> Self {
        Self::CreateTable { table }
    }

    /// Creates a DropTable operation.
    #[must_use]
    pub fn drop_table(name: impl Into<String>) -> Self {
        Self::DropTable { name: name.into() }
    }

    /// Creates a RenameTable operation.
    #[must_use]
    pub fn rename_table(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::RenameTable {
            names: vec![old_name.into(), new_name.into()],
        }
    }

    /// Creates an AddColumn operation.
    #[must_use]
    pub fn add_column(table: impl Into<String>, column: Column) -> Self {
        Self::AddColumn {
            table: table.into(),
            column,
        }
    }

    /// Creates a DropColumn operation.
    #[must_use]
    pub fn drop_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DropColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a RenameColumn operation.
    #[must_use]
    pub fn rename_column(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameColumn {
            table: table.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    /// Creates a ChangeColumn operation.
    #[must_use]
    pub fn change_column(table: impl Into<String>, column: Column) -> Self {
        Self::ChangeColumn {
            table: table.into(),
            column,
        }
    }

    /// Creates an AddIndex operation with a derived name.
    #[must_use]
    pub fn add_index(table: impl Into<String>, columns: Vec<String>, unique: bool) -> Self {
        Self::AddIndex {
            table: table.into(),
            columns,
            name: None,
            unique,
        }
    }

    /// Creates an AddIndex operation with an explicit name.
    #[must_use]
    pub fn add_named_index(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<String>,
        unique: bool,
    ) -> Self {
        Self::AddIndex {
            table: table.into(),
            columns,
            name: Some(name.into()),
            unique,
        }
    }

    /// Creates a DropIndex operation.
    #[must_use]
    pub fn drop_index(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DropIndex {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Creates a RenameIndex operation.
    #[must_use]
    pub fn rename_index(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameIndex {
            table: table.into(),
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    /// Creates an AddForeignKey operation.
    #[must_use]
    pub fn add_foreign_key(table: impl Into<String>, foreign_key: ForeignKey) -> Self {
        Self::AddForeignKey {
            table: table.into(),
            foreign_key,
        }
    }

    /// Creates a DropForeignKey operation.
    #[must_use]
    pub fn drop_foreign_key(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DropForeignKey {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Creates a RawSql operation.
    #[must_use]
    pub fn raw_sql(sql: impl Into<String>) -> Self {
        Self::RawSql { sql: sql.into() }
    }

    /// Returns a human-readable description of this operation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable { table } => format!("Create table '{}'", table.name),
            Self::DropTable { name } => format!("Drop table '{}'", name),
            Self::RenameTable { names } => match names.as_slice() {
                [old, new] => format!("Rename table '{}' to '{}'", old, new),
                _ => format!("Rename table {:?}", names),
            },
            Self::AddColumn { table, column } => {
                format!("Add column '{}' to table '{}'", column.name, table)
            }
            Self::DropColumn { table, column } => {
                format!("Drop column '{}' from table '{}'", column, table)
            }
            Self::RenameColumn {
                table,
                old_name,
                new_name,
            } => format!(
                "Rename column '{}' to '{}' in table '{}'",
                old_name, new_name, table
            ),
            Self::ChangeColumn { table, column } => {
                format!("Change column '{}' in table '{}'", column.name, table)
            }
            Self::AddIndex { table, columns, .. } => {
                format!("Add index on {}({})", table, columns.join(", "))
            }
            Self::DropIndex { table, name } => {
                format!("Drop index '{}' from table '{}'", name, table)
            }
            Self::RenameIndex {
                table,
                old_name,
                new_name,
            } => format!(
                "Rename index '{}' to '{}' on table '{}'",
                old_name, new_name, table
            ),
            Self::AddForeignKey { table, foreign_key } => format!(
                "Add foreign key '{}' to table '{}'",
                foreign_key.name_for(table),
                table
            ),
            Self::DropForeignKey { table, name } => {
                format!("Drop foreign key '{}' from table '{}'", name, table)
            }
            Self::RawSql { .. } => "Run custom SQL".to_string(),
        }
    }
}
