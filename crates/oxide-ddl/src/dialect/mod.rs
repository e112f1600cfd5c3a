//! Database dialect implementations.
//!
//! A dialect maps abstract column types to its own type literals and renders
//! schema entities into DDL text. The default methods produce the common
//! double-quoted form; dialects override what their syntax does differently.

mod sqlite;

pub use sqlite::{SqliteDialect, SQLITE_UUID_DEFAULT};

use crate::error::Result;
use crate::schema::{Column, ColumnOptions, ForeignKey, Index, Table};

/// Result of mapping an abstract column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Dialect type literal, e.g. `INTEGER` or `char(36)`.
    pub sql_type: String,
    /// Whether a primary-key column of this type auto-increments.
    pub autoincrement: bool,
    /// Default expression implied by the type when the column has none.
    pub implied_default: Option<String>,
}

impl MappedType {
    /// A plain type literal with no extra semantics.
    #[must_use]
    pub fn plain(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            autoincrement: false,
            implied_default: None,
        }
    }
}

/// Trait for database-specific DDL generation.
pub trait MigrationDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Maps an abstract column type and its options to a dialect type.
    ///
    /// Fails with `UnsupportedType` for unknown types.
    fn map_type(&self, col_type: &str, options: &ColumnOptions) -> Result<MappedType>;

    /// Returns the auto-increment keyword for this dialect.
    fn auto_increment_keyword(&self) -> &'static str;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name)
    }

    /// Name of the table an existing table is moved aside to during recreation.
    fn temp_table_name(&self, table: &str) -> String {
        format!("_{}_tmp", table)
    }

    /// Generates a column definition.
    fn column_definition(&self, column: &Column) -> Result<String> {
        let mapped = self.map_type(&column.col_type, &column.options)?;
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            mapped.sql_type
        );

        if column.options.primary {
            sql.push_str(" PRIMARY KEY");
            if mapped.autoincrement {
                sql.push(' ');
                sql.push_str(self.auto_increment_keyword());
            }
        } else if !column.options.nullable {
            sql.push_str(" NOT NULL");
        }

        let default = match (&column.options.default_raw, &column.options.default) {
            (Some(raw), _) => Some(raw.clone()),
            (None, Some(value)) => Some(value.to_sql()),
            (None, None) => mapped.implied_default,
        };
        if let Some(default) = default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }

        Ok(sql)
    }

    /// Generates a table-level foreign key clause.
    fn foreign_key_clause(&self, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            fk.column, fk.references_table, fk.references_column
        );
        if let Some(action) = &fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action);
        }
        if let Some(action) = &fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action);
        }
        sql
    }

    /// Generates a composite primary key clause.
    fn primary_key_clause(&self, columns: &[String]) -> String {
        let quoted: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        format!("PRIMARY KEY({})", quoted.join(", "))
    }

    /// Generates CREATE TABLE: columns, then foreign keys, then the composite
    /// primary key, one clause per line.
    fn create_table(&self, table: &Table) -> Result<String> {
        let mut clauses = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect::<Result<Vec<_>>>()?;

        clauses.extend(table.foreign_keys.iter().map(|fk| self.foreign_key_clause(fk)));

        if table.has_composite_primary_key() {
            clauses.push(self.primary_key_clause(&table.primary_key));
        }

        Ok(format!(
            "CREATE TABLE {} (\n{}\n);",
            self.quote_identifier(&table.name),
            clauses.join(",\n")
        ))
    }

    /// Generates DROP TABLE.
    fn drop_table(&self, name: &str) -> String {
        format!("DROP TABLE {};", self.quote_identifier(name))
    }

    /// Generates a table rename.
    fn rename_table(&self, old_name: &str, new_name: &str) -> String;

    /// Generates ADD COLUMN.
    fn add_column(&self, table: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {};",
            self.quote_identifier(table),
            self.column_definition(column)?
        ))
    }

    /// Generates CREATE INDEX.
    fn create_index(&self, table: &str, index: &Index) -> String {
        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        sql.push_str(&self.quote_identifier(&index.name));
        sql.push_str(" ON ");
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (");
        sql.push_str(&index.columns.join(", "));
        sql.push_str(");");
        sql
    }

    /// Generates DROP INDEX.
    fn drop_index(&self, name: &str) -> String;

    /// Generates the row copy from `source_table` into `table`.
    ///
    /// `target_columns` and `source_columns` are matched by position.
    fn copy_rows(
        &self,
        table: &str,
        target_columns: &[String],
        source_table: &str,
        source_columns: &[String],
    ) -> String {
        format!(
            "INSERT INTO {} ({}) SELECT {} FROM {};",
            self.quote_identifier(table),
            target_columns.join(", "),
            source_columns.join(", "),
            self.quote_identifier(source_table)
        )
    }
}
