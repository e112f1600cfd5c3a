//! Table recreation planning.
//!
//! When a dialect cannot alter a table in place, the table is rebuilt:
//!
//! 1. `ALTER TABLE "t" RENAME TO "_t_tmp";`
//! 2. `CREATE TABLE "t" (...);` with the target shape
//! 3. `INSERT INTO "t" (<target columns>) SELECT <original columns> FROM "_t_tmp";`
//! 4. `DROP TABLE "_t_tmp";`
//!
//! The target table is the current table with exactly one mutation applied.
//! Column order is preserved; a renamed or changed column keeps its position,
//! which is what lets the insert map old names to new ones by position.
//!
//! Indexes and foreign keys that mention a dropped or renamed column are left
//! as they are unless `rewrite_dependents` is set. With it set, their column
//! references are rewritten (or the entries removed, for a drop), and the
//! surviving indexes are re-created after step 4, since dropping the
//! temporary table also dropped the indexes it carried.

use tracing::debug;

use crate::dialect::MigrationDialect;
use crate::error::{Result, TranslateError};
use crate::schema::{Column, ForeignKey, Table};

/// A point change that requires rebuilding the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Remove a column.
    DropColumn(String),
    /// Rename a column in place.
    RenameColumn {
        /// Current column name.
        old_name: String,
        /// New column name.
        new_name: String,
    },
    /// Replace a column's type and options; the column is matched by name.
    ChangeColumn(Column),
    /// Append a foreign key constraint.
    AddForeignKey(ForeignKey),
    /// Remove a foreign key constraint by (explicit or derived) name.
    DropForeignKey(String),
}

/// Outcome of planning a recreation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecreatePlan {
    /// The table as it looks after the mutation.
    pub target: Table,
    /// Statements in execution order.
    pub statements: Vec<String>,
}

/// Computes the target table and the recreate-copy-drop statements.
pub fn plan_recreate<D>(
    dialect: &D,
    current: &Table,
    mutation: &Mutation,
    rewrite_dependents: bool,
) -> Result<RecreatePlan>
where
    D: MigrationDialect + ?Sized,
{
    let (target, source_columns) = apply_mutation(current, mutation, rewrite_dependents)?;
    target.validate()?;

    let name = &current.name;
    let temp = dialect.temp_table_name(name);
    let target_columns = target.column_names();

    let mut statements = vec![
        dialect.rename_table(name, &temp),
        dialect.create_table(&target)?,
        dialect.copy_rows(name, &target_columns, &temp, &source_columns),
        dialect.drop_table(&temp),
    ];

    if rewrite_dependents {
        statements.extend(
            target
                .indexes
                .iter()
                .map(|index| dialect.create_index(name, index)),
        );
    }

    debug!(
        table = %name,
        statements = statements.len(),
        "planned table recreation"
    );

    Ok(RecreatePlan { target, statements })
}

/// Applies the mutation to a copy of `current`.
///
/// Returns the target table and the original column names positionally
/// matching the target's columns.
fn apply_mutation(
    current: &Table,
    mutation: &Mutation,
    rewrite_dependents: bool,
) -> Result<(Table, Vec<String>)> {
    let mut target = current.clone();

    match mutation {
        Mutation::DropColumn(column) => {
            let idx = column_position(current, column)?;
            target.columns.remove(idx);

            if rewrite_dependents {
                target.indexes.retain(|i| !i.columns.contains(column));
                target.foreign_keys.retain(|fk| fk.column != *column);
                target.primary_key.retain(|c| c != column);
            }

            let names = target.column_names();
            Ok((target, names))
        }

        Mutation::RenameColumn { old_name, new_name } => {
            let idx = column_position(current, old_name)?;
            if old_name != new_name && current.get_column(new_name).is_some() {
                return Err(TranslateError::InvalidDefinition(format!(
                    "column '{}' already exists in table '{}'",
                    new_name, current.name
                )));
            }
            target.columns[idx].name = new_name.clone();

            if rewrite_dependents {
                let rename = |c: &mut String| {
                    if c == old_name {
                        *c = new_name.clone();
                    }
                };
                for index in &mut target.indexes {
                    index.columns.iter_mut().for_each(rename);
                }
                for fk in &mut target.foreign_keys {
                    rename(&mut fk.column);
                }
                target.primary_key.iter_mut().for_each(rename);
            }

            Ok((target, current.column_names()))
        }

        Mutation::ChangeColumn(column) => {
            let idx = column_position(current, &column.name)?;
            target.columns[idx] = column.clone();
            let names = target.column_names();
            Ok((target, names))
        }

        Mutation::AddForeignKey(fk) => {
            let name = fk.name_for(&current.name);
            if current
                .foreign_keys
                .iter()
                .any(|existing| existing.name_for(&current.name) == name)
            {
                return Err(TranslateError::InvalidDefinition(format!(
                    "foreign key '{}' already exists on table '{}'",
                    name, current.name
                )));
            }
            target.foreign_keys.push(fk.clone());
            let names = target.column_names();
            Ok((target, names))
        }

        Mutation::DropForeignKey(name) => {
            let idx = current
                .foreign_keys
                .iter()
                .position(|fk| fk.name_for(&current.name) == *name)
                .ok_or_else(|| TranslateError::foreign_key_not_found(&current.name, name))?;
            target.foreign_keys.remove(idx);
            let names = target.column_names();
            Ok((target, names))
        }
    }
}

fn column_position(table: &Table, column: &str) -> Result<usize> {
    table
        .columns
        .iter()
        .position(|c| c.name == column)
        .ok_or_else(|| TranslateError::column_not_found(&table.name, column))
}
