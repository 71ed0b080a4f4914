// Integration tests for schema initialisation from files

use fitdesk_store::{EntityType, Filter, PersistenceEngine, StoreConfig};
use std::fs;

fn file_engine(dir: &tempfile::TempDir) -> PersistenceEngine {
    let config = StoreConfig::default().database_path(dir.path().join("data").join("fitdesk.db"));
    PersistenceEngine::open(&config).unwrap()
}

#[test]
fn test_embedded_schema_creates_catalog_tables() {
    let dir = tempfile::tempdir().unwrap();
    let engine = file_engine(&dir);
    assert!(engine.initialize());

    for entity in EntityType::ALL {
        if let Some(table) = entity.table() {
            assert!(!engine.table_columns(table).is_empty(), "{table} missing");
        }
    }
    assert!(dir.path().join("data").join("fitdesk.db").exists());
}

#[test]
fn test_schema_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.sql");
    fs::write(
        &schema,
        "-- minimal\nCREATE TABLE users (idUser INTEGER PRIMARY KEY, userName TEXT);\n\nCREATE TABLE clients (idUser INTEGER PRIMARY KEY, plan TEXT);\n",
    )
    .unwrap();

    let engine = file_engine(&dir);
    assert!(engine.initialize_schema(&schema));
    assert!(engine.is_valid_filter_for_table("users", Filter::UserName));
    assert!(engine.table_columns("trainers").is_empty());
}

#[test]
fn test_configured_schema_path_used_by_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.sql");
    fs::write(&schema, "CREATE TABLE states (idState INTEGER PRIMARY KEY, Name TEXT)").unwrap();

    let config = StoreConfig::default()
        .database_path(dir.path().join("fitdesk.db"))
        .schema_path(&schema);
    let engine = PersistenceEngine::open(&config).unwrap();
    assert!(engine.initialize());
    assert!(!engine.table_columns("states").is_empty());
    assert!(engine.table_columns("users").is_empty());
}

#[test]
fn test_failing_statement_stops_application() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("broken.sql");
    fs::write(
        &schema,
        "CREATE TABLE users (idUser INTEGER PRIMARY KEY);\nCREATE TABLEX oops;\nCREATE TABLE clients (idUser INTEGER);",
    )
    .unwrap();

    let engine = file_engine(&dir);
    assert!(!engine.initialize_schema(&schema));
    assert!(!engine.table_columns("users").is_empty());
    assert!(engine.table_columns("clients").is_empty());
}

#[test]
fn test_missing_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = file_engine(&dir);
    assert!(!engine.initialize_schema(dir.path().join("nope.sql")));
}
