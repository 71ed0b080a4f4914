#![allow(clippy::result_large_err)]

use crate::errors::{io_error, schema_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Split on `;`, trim, and drop chunks that hold only comments
pub fn split_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|chunk| {
            chunk
                .lines()
                .map(str::trim)
                .any(|line| !line.is_empty() && !line.starts_with("--"))
        })
        .collect()
}

/// Read a schema file
pub fn load_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        io_error("initialize_schema", e).with_entity_id(path.display().to_string())
    })
}

/// Apply statements in order, stopping at the first failure
///
/// Returns the number of statements applied.
pub fn apply(conn: &Connection, sql: &str) -> Result<usize> {
    let statements = split_statements(sql);
    for (index, statement) in statements.iter().enumerate() {
        conn.execute_batch(statement)
            .map_err(|e| schema_error(index, &e.to_string()))?;
        tracing::debug!(index, "schema statement applied");
    }
    Ok(statements.len())
}
