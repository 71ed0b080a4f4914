#![allow(clippy::result_large_err)]

use super::sql::{conjunction, from_sql, placeholders, quote_ident, to_sql};
use super::PersistenceEngine;
use crate::catalog::{EntityType, Filter};
use crate::errors::{from_rusqlite, Result};
use crate::relation::Relation;
use fitdesk_core::model::Value;
use rusqlite::params_from_iter;

impl PersistenceEngine {
    /// Every row of the entity's table
    pub fn get_all(&self, entity: EntityType) -> Relation {
        self.get_where(entity, &[])
    }

    /// Rows where `filter = value`
    ///
    /// The filter is dropped, and the whole table returned, when the value
    /// is not supplied or the column is not part of the table.
    pub fn get(&self, entity: EntityType, filter: Filter, value: impl Into<Value>) -> Relation {
        let result = self.get_impl(entity, &[(filter, value.into())], Mode::Equal);
        self.settle("get", result, Relation::error())
    }

    /// Rows where `filter IN (values)`
    pub fn get_in(&self, entity: EntityType, filter: Filter, values: &[Value]) -> Relation {
        let conditions: Vec<(Filter, Value)> =
            values.iter().map(|v| (filter, v.clone())).collect();
        let result = self.get_impl(entity, &conditions, Mode::In);
        self.settle("get_in", result, Relation::error())
    }

    /// Rows matching every `filter = value` pair
    ///
    /// Pairs whose value is not supplied or whose column the table lacks
    /// are dropped individually, the same way the single-value form drops
    /// its filter.
    pub fn get_where(&self, entity: EntityType, conditions: &[(Filter, Value)]) -> Relation {
        let result = self.get_impl(entity, conditions, Mode::Equal);
        self.settle("get_where", result, Relation::error())
    }

    fn get_impl(
        &self,
        entity: EntityType,
        conditions: &[(Filter, Value)],
        mode: Mode,
    ) -> Result<Relation> {
        let (table, _) = self.mapping("get", entity)?;

        let mut columns: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        for (filter, value) in conditions {
            if !value.is_supplied() {
                continue;
            }
            match self.resolve_filter(table, *filter)? {
                Some(column) => {
                    if mode == Mode::Equal || columns.is_empty() {
                        columns.push(column);
                    }
                    params.push(value.clone());
                }
                None => {
                    tracing::debug!(table, filter = %filter, "filter not in table schema, ignored");
                }
            }
        }

        let mut sql = format!("SELECT * FROM {}", quote_ident(table));
        if !params.is_empty() {
            let clause = match mode {
                Mode::Equal => conjunction(&columns, 1),
                Mode::In => format!(
                    "{} IN ({})",
                    quote_ident(&columns[0]),
                    placeholders(params.len(), 1)
                ),
            };
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }

        let relation = self.query_relation(table, &sql, &params)?;
        tracing::debug!(table, rows = relation.row_count(), "get");
        Ok(relation)
    }

    /// Run a query and collect its result set
    pub(crate) fn query_relation(&self, name: &str, sql: &str, params: &[Value]) -> Result<Relation> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let mut relation = Relation::new(name);
        relation.set_columns(stmt.column_names().into_iter().map(String::from));
        let width = stmt.column_count();

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_sql)))
            .map_err(from_rusqlite)?;
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_sql(row.get_ref(i).map_err(from_rusqlite)?));
            }
            relation.add_row(values);
        }
        Ok(relation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Equal,
    In,
}
