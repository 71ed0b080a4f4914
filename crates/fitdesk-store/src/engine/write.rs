#![allow(clippy::result_large_err)]

use super::sql::{conjunction, ident_list, placeholders, quote_ident, to_sql};
use super::PersistenceEngine;
use crate::catalog::{EntityType, Filter};
use crate::errors::{from_rusqlite, invalid_filter, Result};
use crate::relation::Relation;
use fitdesk_core::errors::{ExError, ExErrorKind};
use fitdesk_core::model::Value;
use rusqlite::{params_from_iter, OptionalExtension};

impl PersistenceEngine {
    /// Persist every row of `relation` into the entity's table
    ///
    /// With a supplied value and a filter that is a column of the table,
    /// each row is upserted: UPDATE when a row matches both
    /// `filter = value` and the row's primary key, INSERT otherwise. In
    /// every other case rows are written with `REPLACE INTO`, which
    /// collapses rows sharing a primary key.
    ///
    /// Stops at the first failing row and returns `false`; rows before it
    /// stay written. A filtered save on a replace-only entity (see
    /// [`EntityType::is_replace_only`]) is refused.
    pub fn save(
        &self,
        entity: EntityType,
        relation: &Relation,
        filter: Filter,
        value: impl Into<Value>,
    ) -> bool {
        let result = self.save_impl(entity, relation, filter, &value.into());
        self.settle("save", result.map(|_| true), false)
    }

    /// `save` without a filter: replace mode
    pub fn replace(&self, entity: EntityType, relation: &Relation) -> bool {
        self.save(entity, relation, Filter::None, Value::Null)
    }

    fn save_impl(
        &self,
        entity: EntityType,
        relation: &Relation,
        filter: Filter,
        value: &Value,
    ) -> Result<()> {
        let (table, pk) = self.mapping("save", entity)?;
        if relation.column_count() == 0 {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("save")
                .with_table(table)
                .with_message("relation has no columns"));
        }

        let filter_column = if value.is_supplied() {
            self.resolve_filter(table, filter)?
        } else {
            None
        };

        match filter_column {
            Some(_) if entity.is_replace_only() => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("save")
                .with_table(table)
                .with_message(format!("{} has a composite key; save it without a filter", entity))),
            Some(filter_column) => self.upsert_rows(table, pk, &filter_column, value, relation),
            None => self.replace_rows(table, relation),
        }
    }

    fn upsert_rows(
        &self,
        table: &str,
        pk: &str,
        filter_column: &str,
        value: &Value,
        relation: &Relation,
    ) -> Result<()> {
        let pk_index = relation.column_index(pk).ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("save")
                .with_table(table)
                .with_message(format!("primary key column {} missing from relation", pk))
        })?;

        let columns = relation.columns();
        let key = conjunction(&[filter_column, pk], 1);
        let exists_sql = format!("SELECT 1 FROM {} WHERE {} LIMIT 1", quote_ident(table), key);
        let update_sql = format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(table),
            columns
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{} = ?{}", quote_ident(c), i + 3))
                .collect::<Vec<_>>()
                .join(", "),
            key
        );
        let insert_sql = insert_statement("INSERT", table, columns);

        for row in relation.rows() {
            let key_params = [to_sql(value), to_sql(&row[pk_index])];
            let exists = self
                .conn
                .query_row(&exists_sql, params_from_iter(key_params.iter()), |_| Ok(()))
                .optional()
                .map_err(|e| from_rusqlite(e).with_table(table))?
                .is_some();

            if exists {
                let params = key_params.into_iter().chain(row.iter().map(to_sql));
                self.conn
                    .execute(&update_sql, params_from_iter(params))
                    .map_err(|e| from_rusqlite(e).with_table(table))?;
                tracing::debug!(table, "row updated");
            } else {
                self.conn
                    .execute(&insert_sql, params_from_iter(row.iter().map(to_sql)))
                    .map_err(|e| from_rusqlite(e).with_table(table))?;
                tracing::debug!(table, "row inserted");
            }
        }
        Ok(())
    }

    fn replace_rows(&self, table: &str, relation: &Relation) -> Result<()> {
        let sql = insert_statement("REPLACE", table, relation.columns());
        for row in relation.rows() {
            self.conn
                .execute(&sql, params_from_iter(row.iter().map(to_sql)))
                .map_err(|e| from_rusqlite(e).with_table(table))?;
        }
        tracing::debug!(table, rows = relation.row_count(), "rows replaced");
        Ok(())
    }

    /// Delete rows where `filter = value`
    ///
    /// `true` means the statement ran, not that a row was removed. An
    /// unsupplied value or a filter the table lacks is refused.
    pub fn delete_row(&self, entity: EntityType, filter: Filter, value: impl Into<Value>) -> bool {
        let result = self.delete_impl("delete_row", entity, &[(filter, value.into())], false);
        self.settle("delete_row", result.map(|_| true), false)
    }

    /// Delete rows where `filter IN (values)`; an empty list deletes nothing
    pub fn delete_in(&self, entity: EntityType, filter: Filter, values: &[Value]) -> bool {
        if values.is_empty() {
            return true;
        }
        let conditions: Vec<(Filter, Value)> =
            values.iter().map(|v| (filter, v.clone())).collect();
        let result = self.delete_impl("delete_in", entity, &conditions, true);
        self.settle("delete_in", result.map(|_| true), false)
    }

    /// Delete rows matching every `filter = value` pair
    ///
    /// Every pair must be valid for the table; an empty list is refused
    /// rather than clearing the table.
    pub fn delete_where(&self, entity: EntityType, conditions: &[(Filter, Value)]) -> bool {
        let result = self.delete_impl("delete_where", entity, conditions, false);
        self.settle("delete_where", result.map(|_| true), false)
    }

    fn delete_impl(
        &self,
        op: &str,
        entity: EntityType,
        conditions: &[(Filter, Value)],
        in_list: bool,
    ) -> Result<usize> {
        let (table, _) = self.mapping(op, entity)?;
        if conditions.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op(op.to_string())
                .with_table(table)
                .with_message("no filter given"));
        }

        let mut columns = Vec::new();
        let mut params = Vec::new();
        for (filter, value) in conditions {
            if !value.is_supplied() {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op(op.to_string())
                    .with_table(table)
                    .with_message(format!("no value for filter {}", filter)));
            }
            let column = self
                .resolve_filter(table, *filter)?
                .ok_or_else(|| invalid_filter(op, table, &filter.to_string()))?;
            columns.push(column);
            params.push(to_sql(value));
        }

        let clause = if in_list {
            format!("{} IN ({})", quote_ident(&columns[0]), placeholders(params.len(), 1))
        } else {
            conjunction(&columns, 1)
        };
        let sql = format!("DELETE FROM {} WHERE {}", quote_ident(table), clause);
        let removed = self
            .conn
            .execute(&sql, params_from_iter(params))
            .map_err(|e| from_rusqlite(e).with_op(op.to_string()).with_table(table))?;
        tracing::debug!(table, removed, "{}", op);
        Ok(removed)
    }
}

fn insert_statement(verb: &str, table: &str, columns: &[String]) -> String {
    format!(
        "{} INTO {} ({}) VALUES ({})",
        verb,
        quote_ident(table),
        ident_list(columns),
        placeholders(columns.len(), 1)
    )
}
