//! Schema-change translation for Rust.
//!
//! `oxide-ddl` turns abstract, database-agnostic schema operations into the
//! literal DDL statements of a specific SQL dialect, while keeping an
//! always-current snapshot of every table's columns, indexes and foreign keys.
//!
//! # Architecture
//!
//! - **Schema** - `Table`, `Column`, `Index` and `ForeignKey` definitions
//! - **Store** - The schema snapshot the translator reads from and writes back to
//! - **Operations** - Schema changes like `CreateTable`, `DropColumn`, `RenameIndex`
//! - **Dialect** - Type mapping and DDL rendering for a database
//! - **Recreate** - Rebuilds a table when the dialect cannot alter it in place
//! - **Translator** - Dispatches each operation to direct rendering or recreation
//!
//! SQLite cannot drop, rename or retype a column directly, so those
//! operations become a four-statement sequence: move the table aside,
//! create the new shape under the real name, copy the rows, drop the old
//! table.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let translator = Translator::new(SqliteDialect::new());
//! let mut schema = InMemorySchema::new();
//!
//! let users = Table::new("users")
//!     .column(Column::new("id", "integer").primary())
//!     .column(Column::new("first_name", "string"))
//!     .timestamps();
//!
//! let ddl = translator
//!     .translate_all(
//!         &mut schema,
//!         &[
//!             Operation::create_table(users),
//!             Operation::drop_column("users", "created_at"),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert!(ddl.ends_with("DROP TABLE \"_users_tmp\";"));
//! assert!(schema.column_info("users", "created_at").is_err());
//! ```

pub mod dialect;
pub mod error;
pub mod operations;
pub mod recreate;
pub mod schema;
pub mod script;
pub mod store;
pub mod translator;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{MappedType, MigrationDialect, SqliteDialect, SQLITE_UUID_DEFAULT};
    pub use crate::error::{EntityKind, Result, TranslateError};
    pub use crate::operations::Operation;
    pub use crate::recreate::{plan_recreate, Mutation, RecreatePlan};
    pub use crate::schema::{Column, ColumnOptions, DefaultValue, ForeignKey, Index, Table};
    pub use crate::store::{InMemorySchema, SchemaStore};
    pub use crate::translator::{Translator, TranslatorConfig};
}
