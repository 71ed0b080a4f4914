//! Client profile persistence
//!
//! Each category lives in its own table with one row per client keyed by
//! `idClient`. Enum-keyed categories map fields to columns one to one.
//! Additional is a single JSON object in `client_additional.data`.

#![allow(clippy::result_large_err)]

use crate::catalog::{EntityType, Filter};
use crate::engine::PersistenceEngine;
use crate::errors::Result;
use crate::relation::Relation;
use fitdesk_core::errors::{ExError, ExErrorKind, ModelError};
use fitdesk_core::model::{ClientProfile, ProfileCategory, Value};

/// Key column of every profile table
pub const CLIENT_KEY: &str = "idClient";

/// Column of `client_additional` holding the JSON object
pub const ADDITIONAL_COLUMN: &str = "data";

/// Read every category of a client's profile
///
/// Missing rows leave their category empty. Columns that are not fields of
/// the category are dropped; stored values a field rejects are logged and
/// dropped.
pub fn load(engine: &PersistenceEngine, client_id: i64) -> Result<ClientProfile> {
    let mut profile = ClientProfile::new(client_id);
    for category in ProfileCategory::ALL {
        let entity = EntityType::for_profile(category);
        let rows = engine.get(entity, Filter::IdClient, client_id);
        if rows.is_error() {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("get_client_profile")
                .with_entity_id(client_id.to_string())
                .with_table(entity.table().unwrap_or_default())
                .with_message(format!("{} category could not be read", category.name())));
        }
        if rows.is_empty() {
            continue;
        }
        match category {
            ProfileCategory::Additional => read_additional(&mut profile, &rows),
            _ => read_category(&mut profile, category, &rows),
        }
    }
    Ok(profile)
}

fn read_category(profile: &mut ClientProfile, category: ProfileCategory, rows: &Relation) {
    for (column, value) in rows.row_entries(0) {
        if column.eq_ignore_ascii_case(CLIENT_KEY) || value.is_null() {
            continue;
        }
        match profile.set_in(category, column, value) {
            Ok(()) => {}
            Err(ModelError::UnknownField { .. }) => {
                tracing::debug!(category = category.name(), column, "column is not a profile field, dropped");
            }
            Err(e) => {
                tracing::warn!(
                    client_id = profile.client_id(),
                    category = category.name(),
                    column,
                    error = %e,
                    "stored profile value rejected"
                );
            }
        }
    }
}

fn read_additional(profile: &mut ClientProfile, rows: &Relation) {
    let raw = rows.value(0, ADDITIONAL_COLUMN).to_text();
    if raw.trim().is_empty() {
        return;
    }
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw) {
        Ok(object) => {
            for (key, value) in object {
                profile.set_additional(key, json_to_value(value));
            }
        }
        Err(e) => {
            tracing::warn!(client_id = profile.client_id(), error = %e, "additional data is not a JSON object, dropped");
        }
    }
}

/// JSON scalar to cell value; arrays and objects keep their JSON text
fn json_to_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => b.into(),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Real).unwrap_or_default(),
        },
        serde_json::Value::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    }
}

/// Write every category of a profile under `client_id`
///
/// Categories are upserted independently; a failing category does not
/// stop the rest. Returns true only if every category was written.
pub fn save(engine: &PersistenceEngine, client_id: i64, profile: &ClientProfile) -> bool {
    let mut saved = true;
    for category in ProfileCategory::ALL {
        let entity = EntityType::for_profile(category);
        let ok = match category_row(engine, client_id, profile, category) {
            Ok(row) => engine.save(entity, &row, Filter::IdClient, client_id),
            Err(e) => {
                tracing::warn!(category = category.name(), err_code = e.code(), "{}", e.message());
                false
            }
        };
        if !ok {
            tracing::warn!(client_id, category = category.name(), "profile category not saved");
        }
        saved &= ok;
    }
    saved
}

/// Single-row relation for one category
///
/// Enum-keyed categories carry every field the live table has, unset ones
/// as `Null`, so a cleared field is cleared in storage too.
pub fn category_row(
    engine: &PersistenceEngine,
    client_id: i64,
    profile: &ClientProfile,
    category: ProfileCategory,
) -> Result<Relation> {
    let entity = EntityType::for_profile(category);
    let table = entity.table().unwrap_or_default();
    let mut columns = vec![CLIENT_KEY.to_string()];
    let mut row = vec![Value::Integer(client_id)];

    if category == ProfileCategory::Additional {
        let json = serde_json::to_string(profile.additional()).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("save_client_profile")
                .with_table(table)
                .with_message(e.to_string())
        })?;
        columns.push(ADDITIONAL_COLUMN.to_string());
        row.push(json.into());
    } else {
        let live = engine.table_columns(table);
        for (column, value) in profile.columns(category) {
            if !live.is_empty() && !live.iter().any(|c| c.eq_ignore_ascii_case(&column)) {
                if value.is_supplied() {
                    tracing::warn!(table, column = %column, "field has no column, not saved");
                }
                continue;
            }
            columns.push(column);
            row.push(value);
        }
    }

    let mut relation = Relation::new(table);
    relation.set_columns(columns);
    relation.add_row(row);
    Ok(relation)
}
