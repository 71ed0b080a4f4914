#![allow(clippy::result_large_err)]

use super::sql::quote_ident;
use super::PersistenceEngine;
use crate::catalog::EntityType;
use crate::errors::{from_rusqlite, Result};

impl PersistenceEngine {
    /// Smallest unused primary key in `1..=id_search_limit`
    ///
    /// An empty table yields 1. When every id in the range is taken the
    /// next id above the current maximum is returned. `None` only when the
    /// entity has no table or the query fails.
    pub fn generate_id(&self, entity: EntityType) -> Option<i64> {
        let result = self.generate_id_impl(entity).map(Some);
        self.settle("generate_id", result, None)
    }

    fn generate_id_impl(&self, entity: EntityType) -> Result<i64> {
        let (table, pk) = self.mapping("generate_id", entity)?;
        let (table_q, pk_q) = (quote_ident(table), quote_ident(pk));

        // 1 is free unless taken; otherwise the first id whose successor is free
        let sql = format!(
            "SELECT CASE \
                WHEN NOT EXISTS (SELECT 1 FROM {t} WHERE {k} = 1) THEN 1 \
                ELSE (SELECT MIN(a.{k}) + 1 FROM {t} a \
                      WHERE a.{k} >= 1 AND a.{k} < ?1 \
                        AND NOT EXISTS (SELECT 1 FROM {t} b WHERE b.{k} = a.{k} + 1)) \
             END",
            t = table_q,
            k = pk_q
        );
        let gap: Option<i64> = self
            .conn
            .query_row(&sql, [self.id_search_limit], |row| row.get(0))
            .map_err(|e| from_rusqlite(e).with_op("generate_id").with_table(table))?;

        if let Some(id) = gap {
            tracing::debug!(table, id, "id allocated");
            return Ok(id);
        }

        let max_sql = format!("SELECT COALESCE(MAX({pk_q}), 0) + 1 FROM {table_q}");
        let id: i64 = self
            .conn
            .query_row(&max_sql, [], |row| row.get(0))
            .map_err(|e| from_rusqlite(e).with_op("generate_id").with_table(table))?;
        tracing::debug!(table, id, "id search range exhausted, allocated above maximum");
        Ok(id)
    }
}
