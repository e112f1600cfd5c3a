//! Schema representation types.
//!
//! These types describe the shape of a table as the translator tracks it:
//! columns in declaration order, indexes, foreign keys and an optional
//! composite primary key. Column types are abstract names (`string`,
//! `integer`, `uuid`, ...) that a dialect maps to its own type literals.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranslateError};

/// Literal default value for a column.
///
/// Literals are always rendered single-quoted. Use
/// [`ColumnOptions::default_raw`] for SQL expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
}

impl DefaultValue {
    /// Returns the quoted SQL literal for this value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("'{}'", self.to_string().replace('\'', "''"))
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for DefaultValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for DefaultValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Options attached to a column definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Whether the column allows NULL values. Columns are NOT NULL unless set.
    #[serde(rename = "null")]
    pub nullable: bool,
    /// Literal default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Default as a raw SQL expression, rendered verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_raw: Option<String>,
    /// Whether this single column is the primary key.
    pub primary: bool,
    /// Size hint (ignored by dialects where it has no meaning).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Numeric precision hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    /// Numeric scale hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Abstract, dialect-independent type name.
    #[serde(rename = "type")]
    pub col_type: String,
    /// Column options.
    #[serde(default)]
    pub options: ColumnOptions,
}

impl Column {
    /// Creates a NOT NULL column without default.
    #[must_use]
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            options: ColumnOptions::default(),
        }
    }

    /// Allows NULL values.
    #[must_use]
    pub fn null(mut self) -> Self {
        self.options.nullable = true;
        self
    }

    /// Sets a literal default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    /// Sets a raw SQL default expression.
    #[must_use]
    pub fn default_raw(mut self, expr: impl Into<String>) -> Self {
        self.options.default_raw = Some(expr.into());
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.options.primary = true;
        self.options.nullable = false;
        self
    }

    /// Sets the size hint.
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.options.size = Some(size);
        self
    }

    /// Checks the column's options for contradictions.
    pub fn validate(&self) -> Result<()> {
        if self.options.primary && self.options.nullable {
            return Err(TranslateError::InvalidDefinition(format!(
                "primary key column '{}' cannot be nullable",
                self.name
            )));
        }
        if self.options.default.is_some() && self.options.default_raw.is_some() {
            return Err(TranslateError::InvalidDefinition(format!(
                "column '{}' has both a literal and a raw default",
                self.name
            )));
        }
        Ok(())
    }
}

/// An index definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    /// Creates a non-unique index.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
        }
    }

    /// Makes this a unique index.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Derives the index name used when none is given: `<table>_<col1>_<col2>_idx`.
    #[must_use]
    pub fn derived_name(table: &str, columns: &[String]) -> String {
        format!("{}_{}_idx", table, columns.join("_"))
    }
}

/// A foreign key definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Explicit constraint name. Derived from the owning table when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Referencing column in the owning table.
    pub column: String,
    /// Referenced table.
    pub references_table: String,
    /// Referenced column.
    pub references_column: String,
    /// ON DELETE action, rendered verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    /// ON UPDATE action, rendered verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

impl ForeignKey {
    /// Creates a foreign key from `column` to `references_table.references_column`.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        references_table: impl Into<String>,
        references_column: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            column: column.into(),
            references_table: references_table.into(),
            references_column: references_column.into(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Sets an explicit constraint name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub fn on_delete(mut self, action: impl Into<String>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub fn on_update(mut self, action: impl Into<String>) -> Self {
        self.on_update = Some(action.into());
        self
    }

    /// Returns the constraint name, deriving `<table>_<ref_table>_<ref_column>_fk`
    /// when no explicit name was set.
    #[must_use]
    pub fn name_for(&self, table: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}_{}_{}_fk",
                table, self.references_table, self.references_column
            ),
        }
    }
}

/// Complete definition of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Index definitions.
    #[serde(default)]
    pub indexes: Vec<Index>,
    /// Foreign key definitions.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Explicit composite primary key clause.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<String>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds `created_at` and `updated_at` datetime columns.
    #[must_use]
    pub fn timestamps(self) -> Self {
        self.column(Column::new("created_at", "datetime"))
            .column(Column::new("updated_at", "datetime"))
    }

    /// Declares the primary key.
    ///
    /// A single existing column is flagged as primary in place; anything else
    /// becomes a composite `PRIMARY KEY(...)` clause.
    #[must_use]
    pub fn primary_key(mut self, columns: Vec<String>) -> Self {
        if let [single] = columns.as_slice() {
            if let Some(col) = self.get_column_mut(single) {
                col.options.primary = true;
                col.options.nullable = false;
                return self;
            }
        }
        self.primary_key = columns;
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gets a mutable column by name.
    #[must_use]
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Gets an index by name.
    #[must_use]
    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Whether the composite `PRIMARY KEY(...)` clause applies.
    #[must_use]
    pub fn has_composite_primary_key(&self) -> bool {
        !self.primary_key.is_empty() && !self.columns.iter().any(|c| c.options.primary)
    }

    /// Checks the table-level invariants.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.name.as_str()) {
                return Err(TranslateError::InvalidDefinition(format!(
                    "column '{}' is declared twice in table '{}'",
                    column.name, self.name
                )));
            }
        }

        let flagged: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.options.primary)
            .map(|c| c.name.as_str())
            .collect();
        if flagged.len() > 1 {
            return Err(TranslateError::InvalidDefinition(format!(
                "table '{}' flags more than one primary column: {}",
                self.name,
                flagged.join(", ")
            )));
        }
        if !flagged.is_empty() && !self.primary_key.is_empty() {
            return Err(TranslateError::InvalidDefinition(format!(
                "table '{}' declares both a primary column and a composite primary key",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for index in &self.indexes {
            if !seen.insert(index.name.as_str()) {
                return Err(TranslateError::InvalidDefinition(format!(
                    "index '{}' is declared twice on table '{}'",
                    index.name, self.name
                )));
            }
        }
        Ok(())
    }
}
