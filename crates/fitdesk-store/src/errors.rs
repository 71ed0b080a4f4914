//! Error handling for fitdesk-store
//!
//! Wraps fitdesk-core ExError with store-specific helpers

use fitdesk_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// A schema statement failed to apply
pub fn schema_error(index: usize, reason: &str) -> ExError {
    ExError::new(ExErrorKind::SchemaLoad)
        .with_op("initialize_schema")
        .with_message(format!("Statement {} failed: {}", index + 1, reason))
}

/// The entity type has no table mapping
pub fn unknown_entity(op: &str, entity: &str) -> ExError {
    ExError::new(ExErrorKind::UnknownEntityType)
        .with_op(op.to_string())
        .with_message(format!("Entity type {} has no table", entity))
}

/// A filter does not resolve to a column of the table's live schema
pub fn invalid_filter(op: &str, table: &str, filter: &str) -> ExError {
    ExError::new(ExErrorKind::FilterInvalid)
        .with_op(op.to_string())
        .with_table(table.to_string())
        .with_message(format!("Filter {} is not a column of {}", filter, table))
}

/// Configuration file could not be parsed
pub fn config_error(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_message(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_carries_table() {
        let err = invalid_filter("delete_row", "users", "FamilyName");
        assert_eq!(err.kind(), ExErrorKind::FilterInvalid);
        assert_eq!(err.table(), Some("users"));
    }

    #[test]
    fn test_schema_error_numbers_statements_from_one() {
        let err = schema_error(0, "syntax error");
        assert!(err.message().starts_with("Statement 1 failed"));
        assert_eq!(err.code(), "ERR_SCHEMA_LOAD");
    }
}
