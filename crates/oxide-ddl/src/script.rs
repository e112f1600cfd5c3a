//! Loading and saving migration scripts and schema snapshots as JSON.
//!
//! A script is a JSON array of operations, each tagged by `op`:
//!
//! ```json
//! [
//!   {"op": "create_table", "table": {"name": "users", "columns": [
//!     {"name": "id", "type": "integer", "options": {"primary": true}}
//!   ]}},
//!   {"op": "add_index", "table": "users", "columns": ["id"], "unique": true}
//! ]
//! ```
//!
//! A snapshot is a JSON object mapping table names to table definitions.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::operations::Operation;
use crate::store::InMemorySchema;

/// Reads a list of operations from a JSON file.
pub fn load_operations(path: impl AsRef<Path>) -> Result<Vec<Operation>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let operations: Vec<Operation> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), count = operations.len(), "loaded operations");
    Ok(operations)
}

/// Reads a schema snapshot from a JSON file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<InMemorySchema> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let schema: InMemorySchema = serde_json::from_str(&content)?;
    debug!(path = %path.display(), tables = schema.len(), "loaded schema snapshot");
    Ok(schema)
}

/// Writes a schema snapshot to a JSON file, pretty-printed.
pub fn save_snapshot(path: impl AsRef<Path>, schema: &InMemorySchema) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(schema)?;
    fs::write(path, content)?;
    debug!(path = %path.display(), tables = schema.len(), "saved schema snapshot");
    Ok(())
}
