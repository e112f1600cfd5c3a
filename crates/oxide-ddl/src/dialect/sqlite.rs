//! SQLite dialect.
//!
//! SQLite has limited ALTER TABLE support, so dropping, renaming or
//! retyping a column and changing foreign keys go through the table
//! recreation planner. This dialect only renders; it never decides
//! whether recreation is needed.

use super::{MappedType, MigrationDialect};
use crate::error::{Result, TranslateError};
use crate::schema::ColumnOptions;

/// Default expression generating a random lowercase hex id.
pub const SQLITE_UUID_DEFAULT: &str = "lower(hex(randomblob(16)))";

/// SQLite migration dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteDialect {
    uuid_default: Option<String>,
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid_default: Some(SQLITE_UUID_DEFAULT.to_string()),
        }
    }

    /// Sets the default expression implied for non-primary `uuid` columns.
    /// `None` renders them without a default.
    #[must_use]
    pub fn with_uuid_default(mut self, expr: Option<String>) -> Self {
        self.uuid_default = expr;
        self
    }

    /// Returns the implied `uuid` default expression.
    #[must_use]
    pub fn uuid_default(&self) -> Option<&str> {
        self.uuid_default.as_deref()
    }
}

impl MigrationDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn map_type(&self, col_type: &str, options: &ColumnOptions) -> Result<MappedType> {
        let normalized = col_type.to_lowercase();

        if options.primary {
            return match normalized.as_str() {
                "integer" | "int" => Ok(MappedType {
                    sql_type: "INTEGER".to_string(),
                    autoincrement: true,
                    implied_default: None,
                }),
                "string" | "text" | "uuid" => Ok(MappedType::plain("TEXT")),
                other => Err(TranslateError::InvalidDefinition(format!(
                    "can not use {} as a primary key",
                    other
                ))),
            };
        }

        // size/precision/scale carry no meaning in SQLite's type affinity
        let mapped = match normalized.as_str() {
            "string" | "text" | "json" => MappedType::plain("TEXT"),
            "integer" | "int" => MappedType::plain("INTEGER"),
            "float" | "decimal" => MappedType::plain("REAL"),
            "blob" | "[]byte" => MappedType::plain("BLOB"),
            "timestamp" | "time" | "datetime" => MappedType::plain("DATETIME"),
            "boolean" | "date" => MappedType::plain("NUMERIC"),
            "uuid" => MappedType {
                sql_type: "char(36)".to_string(),
                autoincrement: false,
                implied_default: self.uuid_default.clone(),
            },
            _ => return Err(TranslateError::UnsupportedType(col_type.to_string())),
        };
        Ok(mapped)
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {};",
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )
    }

    fn drop_index(&self, name: &str) -> String {
        // SQLite index names are global, not per-table
        format!("DROP INDEX IF EXISTS {};", self.quote_identifier(name))
    }
}
