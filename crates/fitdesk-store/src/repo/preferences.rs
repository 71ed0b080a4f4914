//! User preferences persistence: one `userpreferences` row per user

#![allow(clippy::result_large_err)]

use crate::catalog::{EntityType, Filter};
use crate::engine::PersistenceEngine;
use crate::errors::Result;
use crate::relation::Relation;
use fitdesk_core::errors::{ExError, ExErrorKind};
use fitdesk_core::model::{UserPreferences, Value};

const COLUMNS: [&str; 6] = ["idUser", "dualMode", "infoSound", "alertSound", "mute", "connections"];

/// Stored preferences, `Ok(None)` when the user has no row
///
/// Flags that are missing or unreadable keep their defaults.
pub fn load(engine: &PersistenceEngine, user_id: i64) -> Result<Option<UserPreferences>> {
    let rows = engine.get(EntityType::Preferences, Filter::IdUser, user_id);
    if rows.is_error() {
        return Err(ExError::new(ExErrorKind::Persistence)
            .with_op("get_user_preferences")
            .with_entity_id(user_id.to_string())
            .with_message("preferences could not be read"));
    }
    if rows.is_empty() {
        return Ok(None);
    }

    let mut prefs = UserPreferences::new(user_id);
    let flag = |column: &str, default: bool| rows.value(0, column).as_bool().unwrap_or(default);
    prefs.dual_mode = flag("dualMode", prefs.dual_mode);
    prefs.info_sound = flag("infoSound", prefs.info_sound);
    prefs.alert_sound = flag("alertSound", prefs.alert_sound);
    prefs.mute = flag("mute", prefs.mute);
    prefs.connections = UserPreferences::parse_connections(&rows.value(0, "connections").to_text())
        .map_err(|e| ExError::from(e).with_op("get_user_preferences"))?;
    Ok(Some(prefs))
}

/// Upsert the user's preferences row
pub fn save(engine: &PersistenceEngine, prefs: &UserPreferences) -> Result<bool> {
    let row = preferences_row(prefs)?;
    Ok(engine.save(EntityType::Preferences, &row, Filter::IdUser, prefs.user_id))
}

fn preferences_row(prefs: &UserPreferences) -> Result<Relation> {
    let connections = prefs
        .connections_json()
        .map_err(|e| ExError::from(e).with_op("save_user_preferences"))?;
    let mut relation = Relation::new(EntityType::Preferences.table().unwrap_or_default());
    relation.set_columns(COLUMNS);
    relation.add_row(vec![
        prefs.user_id.into(),
        prefs.dual_mode.into(),
        prefs.info_sound.into(),
        prefs.alert_sound.into(),
        prefs.mute.into(),
        Value::Text(connections),
    ]);
    Ok(relation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_stored_as_words() {
        let mut prefs = UserPreferences::new(4);
        prefs.mute = true;
        prefs.connect(11, 13);
        let row = preferences_row(&prefs).unwrap();
        assert_eq!(row.value(0, "mute"), &Value::from("true"));
        assert_eq!(row.value(0, "dualMode"), &Value::from("false"));
        assert_eq!(row.value(0, "connections"), &Value::from("[[11,13]]"));
    }
}
