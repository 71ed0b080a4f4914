//! Schema loading
//!
//! A schema is a `;`-separated list of SQL statements applied in order,
//! one at a time. The first failure stops the load; statements before it
//! stay applied.

mod embedded;
mod loader;

pub use embedded::EMBEDDED_SCHEMA;
pub use loader::{apply, load_file, split_statements};
