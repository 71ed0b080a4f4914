//! Persistence engine
//!
//! Turns (entity type, filter, values) into SQL against the single owned
//! connection. Every public operation fails soft: errors are logged and a
//! neutral value (`false`, `None`, an empty relation) is returned. The
//! `_impl` functions underneath return `Result<_, ExError>` and propagate
//! with `?`.
//!
//! Filters are checked against the live column list of the target table,
//! cached per table on first use and dropped whenever a schema is applied
//! or [`PersistenceEngine::reset_schema_cache`] is called.

#![allow(clippy::result_large_err)]

mod ids;
mod read;
pub mod sql;
mod write;

use crate::catalog::{EntityType, Filter};
use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, unknown_entity, Result};
use crate::schema;
use fitdesk_core::errors::ExError;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const UNIT_OF_WORK_SAVEPOINT: &str = "fitdesk_unit_of_work";

pub struct PersistenceEngine {
    conn: Connection,
    columns: RefCell<HashMap<String, Vec<String>>>,
    id_search_limit: i64,
    atomic_writes: bool,
    schema_path: Option<PathBuf>,
}

impl PersistenceEngine {
    /// Wrap an open connection with default settings
    pub fn new(conn: Connection) -> Self {
        Self::with_config(conn, &StoreConfig::default())
    }

    pub fn with_config(conn: Connection, config: &StoreConfig) -> Self {
        Self {
            conn,
            columns: RefCell::new(HashMap::new()),
            id_search_limit: config.id_search_limit.max(1),
            atomic_writes: config.atomic_writes,
            schema_path: config.schema_path.clone(),
        }
    }

    /// Open the configured database file
    ///
    /// The schema is not applied; call [`PersistenceEngine::initialize`].
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let conn = db::open(&config.database_path)?;
        Ok(Self::with_config(conn, config))
    }

    /// In-memory database with the embedded schema applied
    pub fn open_in_memory(config: &StoreConfig) -> Result<Self> {
        let conn = db::open_in_memory()?;
        let engine = Self::with_config(conn, config);
        schema::apply(&engine.conn, schema::EMBEDDED_SCHEMA)?;
        Ok(engine)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn id_search_limit(&self) -> i64 {
        self.id_search_limit
    }

    pub fn atomic_writes(&self) -> bool {
        self.atomic_writes
    }

    // ---- schema ----

    /// Apply the configured schema file, or the embedded schema when none
    /// is configured
    pub fn initialize(&self) -> bool {
        match self.schema_path.clone() {
            Some(path) => self.initialize_schema(path),
            None => self.initialize_default_schema(),
        }
    }

    /// Apply a `;`-separated schema file
    ///
    /// Stops at the first failing statement; statements before it stay
    /// applied.
    pub fn initialize_schema(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = schema::load_file(path).and_then(|sql| schema::apply(&self.conn, &sql));
        self.reset_schema_cache();
        self.settle("initialize_schema", result.map(|n| {
            tracing::debug!(path = %path.display(), statements = n, "schema applied");
            true
        }), false)
    }

    pub fn initialize_schema_from_sql(&self, sql: &str) -> bool {
        let result = schema::apply(&self.conn, sql);
        self.reset_schema_cache();
        self.settle("initialize_schema", result.map(|_| true), false)
    }

    pub fn initialize_default_schema(&self) -> bool {
        self.initialize_schema_from_sql(schema::EMBEDDED_SCHEMA)
    }

    /// Forget every cached column list
    pub fn reset_schema_cache(&self) {
        self.columns.borrow_mut().clear();
    }

    /// Live column names of a table; empty when the table does not exist
    pub fn table_columns(&self, table: &str) -> Vec<String> {
        let result = self.table_columns_impl(table);
        self.settle("table_columns", result, Vec::new())
    }

    pub(crate) fn table_columns_impl(&self, table: &str) -> Result<Vec<String>> {
        let key = table.to_ascii_lowercase();
        if let Some(cols) = self.columns.borrow().get(&key) {
            return Ok(cols.clone());
        }

        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1)")
            .map_err(from_rusqlite)?;
        let cols = stmt
            .query_map([table], |row| row.get::<_, String>(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        // A missing table is not cached so that creating it later is seen
        if !cols.is_empty() {
            self.columns.borrow_mut().insert(key, cols.clone());
        }
        Ok(cols)
    }

    /// True when the filter's column exists in the table's live schema
    pub fn is_valid_filter_for_table(&self, table: &str, filter: Filter) -> bool {
        self.resolve_filter(table, filter).ok().flatten().is_some()
    }

    /// The table's own spelling of the filter column, if it has one
    pub(crate) fn resolve_filter(&self, table: &str, filter: Filter) -> Result<Option<String>> {
        let wanted = filter.column();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .table_columns_impl(table)?
            .into_iter()
            .find(|c| c.eq_ignore_ascii_case(wanted)))
    }

    pub(crate) fn mapping(
        &self,
        op: &str,
        entity: EntityType,
    ) -> Result<(&'static str, &'static str)> {
        match (entity.table(), entity.primary_key()) {
            (Some(table), Some(pk)) => Ok((table, pk)),
            _ => Err(unknown_entity(op, entity.name())),
        }
    }

    // ---- units of work ----

    /// Run a multi-statement operation
    ///
    /// With `atomic_writes` on, the closure runs inside a savepoint that is
    /// rolled back when it returns `false`. Otherwise every statement
    /// autocommits and earlier writes survive a later failure.
    pub fn unit_of_work<F>(&self, op: &str, f: F) -> bool
    where
        F: FnOnce(&Self) -> bool,
    {
        if !self.atomic_writes {
            return f(self);
        }

        if let Err(err) = self
            .conn
            .execute_batch(&format!("SAVEPOINT {UNIT_OF_WORK_SAVEPOINT}"))
            .map_err(from_rusqlite)
        {
            return self.settle(op, Err(err), false);
        }

        let ok = f(self);
        let end = if ok {
            format!("RELEASE {UNIT_OF_WORK_SAVEPOINT}")
        } else {
            tracing::debug!(op, "rolling back unit of work");
            format!("ROLLBACK TO {UNIT_OF_WORK_SAVEPOINT}; RELEASE {UNIT_OF_WORK_SAVEPOINT}")
        };
        let closed = self.conn.execute_batch(&end).map_err(from_rusqlite);
        let closed = self.settle(op, closed.map(|_| true), false);
        ok && closed
    }

    /// Collapse an internal result into the public neutral value
    pub(crate) fn settle<T>(&self, op: &str, result: Result<T>, neutral: T) -> T {
        match result {
            Ok(v) => v,
            Err(err) => {
                log_failure(op, &err);
                neutral
            }
        }
    }
}

fn log_failure(op: &str, err: &ExError) {
    tracing::warn!(
        op,
        err_kind = ?err.kind(),
        err_code = err.code(),
        table = err.table().unwrap_or_default(),
        "{}",
        err.message()
    );
}
