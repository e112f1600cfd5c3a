//! Operation translation.
//!
//! The [`Translator`] turns one [`Operation`] at a time into DDL statements
//! for its dialect, reading the current table shape from a [`SchemaStore`]
//! and writing the new shape back before returning. Operations that the
//! dialect cannot express directly are handed to the recreation planner.
//!
//! Translation is synchronous. A store must only be driven by one
//! translation at a time; independent stores can be translated in parallel.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dialect::MigrationDialect;
use crate::error::{Result, TranslateError};
use crate::operations::Operation;
use crate::recreate::{plan_recreate, Mutation};
use crate::schema::{Column, Index, Table};
use crate::store::SchemaStore;

/// Translator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Rewrite index and foreign key column references when a recreation
    /// drops or renames a column, and re-create the table's indexes
    /// after the recreation.
    pub rewrite_dependents: bool,
}

/// Translates operations into DDL for a dialect.
#[derive(Debug, Clone)]
pub struct Translator<D: MigrationDialect> {
    dialect: D,
    config: TranslatorConfig,
}

impl<D: MigrationDialect> Translator<D> {
    /// Creates a translator with the default configuration.
    pub fn new(dialect: D) -> Self {
        Self::with_config(dialect, TranslatorConfig::default())
    }

    /// Creates a translator with an explicit configuration.
    pub fn with_config(dialect: D, config: TranslatorConfig) -> Self {
        Self { dialect, config }
    }

    /// Returns the dialect.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translates a sequence of operations and joins all statements with newlines.
    ///
    /// Stops at the first failing operation. Operations translated before it
    /// keep their effect on the store.
    pub fn translate_all<S>(&self, schema: &mut S, operations: &[Operation]) -> Result<String>
    where
        S: SchemaStore + ?Sized,
    {
        let mut statements = Vec::new();
        for operation in operations {
            statements.extend(self.translate(schema, operation)?);
        }
        Ok(statements.join("\n"))
    }

    /// Translates a single operation and updates the store.
    ///
    /// Nothing is written to the store when an error is returned.
    pub fn translate<S>(&self, schema: &mut S, operation: &Operation) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        debug!(
            dialect = self.dialect.name(),
            "translating: {}",
            operation.description()
        );

        match operation {
            Operation::CreateTable { table } => self.create_table(schema, table),

            Operation::DropTable { name } => {
                schema.delete_table(name);
                Ok(vec![self.dialect.drop_table(name)])
            }

            Operation::RenameTable { names } => self.rename_table(schema, names),

            Operation::AddColumn { table, column } => self.add_column(schema, table, column),

            Operation::DropColumn { table, column } => {
                self.recreate(schema, table, Mutation::DropColumn(column.clone()))
            }

            Operation::RenameColumn {
                table,
                old_name,
                new_name,
            } => self.recreate(
                schema,
                table,
                Mutation::RenameColumn {
                    old_name: old_name.clone(),
                    new_name: new_name.clone(),
                },
            ),

            Operation::ChangeColumn { table, column } => {
                self.recreate(schema, table, Mutation::ChangeColumn(column.clone()))
            }

            Operation::AddIndex {
                table,
                columns,
                name,
                unique,
            } => {
                let name = name
                    .clone()
                    .unwrap_or_else(|| Index::derived_name(table, columns));
                let index = Index {
                    name,
                    columns: columns.clone(),
                    unique: *unique,
                };
                self.add_index(schema, table, index)
            }

            Operation::DropIndex { table, name } => self.drop_index(schema, table, name),

            Operation::RenameIndex {
                table,
                old_name,
                new_name,
            } => self.rename_index(schema, table, old_name, new_name),

            Operation::AddForeignKey { table, foreign_key } => {
                self.recreate(schema, table, Mutation::AddForeignKey(foreign_key.clone()))
            }

            Operation::DropForeignKey { table, name } => {
                self.recreate(schema, table, Mutation::DropForeignKey(name.clone()))
            }

            Operation::RawSql { sql } => {
                let sql = sql.trim_end();
                if sql.ends_with(';') {
                    Ok(vec![sql.to_string()])
                } else {
                    Ok(vec![format!("{};", sql)])
                }
            }
        }
    }

    fn create_table<S>(&self, schema: &mut S, table: &Table) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        table.validate()?;

        let mut statements = vec![self.dialect.create_table(table)?];
        statements.extend(
            table
                .indexes
                .iter()
                .map(|index| self.dialect.create_index(&table.name, index)),
        );

        schema.set_table(table.clone());
        Ok(statements)
    }

    fn rename_table<S>(&self, schema: &mut S, names: &[String]) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        let [old_name, new_name] = names else {
            return Err(TranslateError::Arity {
                operation: "rename_table",
                expected: 2,
                actual: names.len(),
            });
        };

        if old_name != new_name && schema.table_info(new_name).is_ok() {
            return Err(TranslateError::InvalidDefinition(format!(
                "cannot rename table '{}' to '{}': table already exists",
                old_name, new_name
            )));
        }

        match schema.table_info(old_name) {
            Ok(mut table) => {
                table.name = new_name.clone();
                schema.delete_table(old_name);
                schema.set_table(table);
            }
            Err(TranslateError::NotFound { .. }) => {
                warn!(
                    table = %old_name,
                    "renaming a table the schema snapshot does not know"
                );
            }
            Err(e) => return Err(e),
        }

        Ok(vec![self.dialect.rename_table(old_name, new_name)])
    }

    fn add_column<S>(&self, schema: &mut S, table: &str, column: &Column) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        let mut info = schema.table_info(table)?;
        if info.get_column(&column.name).is_some() {
            return Err(TranslateError::InvalidDefinition(format!(
                "column '{}' already exists in table '{}'",
                column.name, table
            )));
        }
        info.columns.push(column.clone());
        info.validate()?;

        let sql = self.dialect.add_column(table, column)?;
        schema.set_table(info);
        Ok(vec![sql])
    }

    fn recreate<S>(&self, schema: &mut S, table: &str, mutation: Mutation) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        let info = schema.table_info(table)?;
        let plan = plan_recreate(
            &self.dialect,
            &info,
            &mutation,
            self.config.rewrite_dependents,
        )?;
        schema.set_table(plan.target);
        Ok(plan.statements)
    }

    fn add_index<S>(&self, schema: &mut S, table: &str, index: Index) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        let mut info = schema.table_info(table)?;
        if info.get_index(&index.name).is_some() {
            return Err(TranslateError::InvalidDefinition(format!(
                "index '{}' already exists on table '{}'",
                index.name, table
            )));
        }

        let sql = self.dialect.create_index(table, &index);
        info.indexes.push(index);
        schema.set_table(info);
        Ok(vec![sql])
    }

    fn drop_index<S>(&self, schema: &mut S, table: &str, name: &str) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        let mut info = schema.table_info(table)?;
        let idx = info
            .indexes
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| TranslateError::index_not_found(table, name))?;
        info.indexes.remove(idx);

        schema.set_table(info);
        Ok(vec![self.dialect.drop_index(name)])
    }

    fn rename_index<S>(
        &self,
        schema: &mut S,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<Vec<String>>
    where
        S: SchemaStore + ?Sized,
    {
        let mut info = schema.table_info(table)?;
        if old_name != new_name && info.get_index(new_name).is_some() {
            return Err(TranslateError::InvalidDefinition(format!(
                "index '{}' already exists on table '{}'",
                new_name, table
            )));
        }
        let index = info
            .indexes
            .iter_mut()
            .find(|i| i.name == old_name)
            .ok_or_else(|| TranslateError::index_not_found(table, old_name))?;
        index.name = new_name.to_string();

        let statements = vec![
            self.dialect.drop_index(old_name),
            self.dialect.create_index(table, index),
        ];
        schema.set_table(info);
        Ok(statements)
    }
}
