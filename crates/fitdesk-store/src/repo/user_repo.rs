//! User repository
//!
//! Composes engine calls into whole-user operations. Every public
//! operation follows the same logging shape:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure, after which the neutral value is returned

#![allow(clippy::result_large_err)]

use super::hydration::{
    apply_calendar, calendar_rows, common_row, merge_rows, picture_png, stored_user_type,
    user_from_rows, variant_row,
};
use super::{elapsed_ms, invalid_id, preferences, profile, read_failed, write_failed, UserStore};
use crate::catalog::{EntityType, Filter};
use crate::config::StoreConfig;
use crate::engine::PersistenceEngine;
use crate::errors::Result;
use crate::relation::Relation;
use fitdesk_core::errors::{ExError, ExErrorKind};
use fitdesk_core::model::{ClientData, ClientProfile, User, UserPreferences, UserType, NEW_ID};
use fitdesk_core::{log_op_end, log_op_error, log_op_start};
use std::path::PathBuf;
use std::time::Instant;

/// Every (table, key) pair that can hold rows of a user
const USER_TABLES: [(EntityType, Filter); 13] = [
    (EntityType::User, Filter::IdUser),
    (EntityType::Client, Filter::IdUser),
    (EntityType::Trainer, Filter::IdUser),
    (EntityType::Admin, Filter::IdUser),
    (EntityType::ProfileGeneral, Filter::IdClient),
    (EntityType::ProfileFunctional, Filter::IdClient),
    (EntityType::ProfileMorphology, Filter::IdClient),
    (EntityType::ProfileRom, Filter::IdClient),
    (EntityType::ProfileLifestyle, Filter::IdClient),
    (EntityType::ProfileMedical, Filter::IdClient),
    (EntityType::ProfileAdditional, Filter::IdClient),
    (EntityType::ClientWorkoutCalendar, Filter::IdClient),
    (EntityType::Preferences, Filter::IdUser),
];

pub struct UserRepository<'a> {
    engine: &'a PersistenceEngine,
    blank_picture_path: Option<PathBuf>,
}

impl<'a> UserRepository<'a> {
    pub fn new(engine: &'a PersistenceEngine) -> Self {
        Self::with_config(engine, &StoreConfig::default())
    }

    pub fn with_config(engine: &'a PersistenceEngine, config: &StoreConfig) -> Self {
        Self {
            engine,
            blank_picture_path: config.blank_picture_path.clone(),
        }
    }

    pub fn engine(&self) -> &PersistenceEngine {
        self.engine
    }

    fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        if id < 0 {
            return Err(invalid_id("get_user_by_id", id));
        }
        let engine = self.engine;

        let common = engine.get(EntityType::User, Filter::IdUser, id);
        if common.is_error() {
            return Err(read_failed("get_user_by_id", "users row").with_entity_id(id.to_string()));
        }
        if !common.contains("idUser", &id.into()) {
            return Ok(None);
        }

        let user_type = stored_user_type(&common)?;
        let variant_entity = EntityType::for_user_type(user_type);
        let variant = engine.get(variant_entity, Filter::IdUser, id);
        if variant.is_error() {
            return Err(read_failed("get_user_by_id", "variant row").with_entity_id(id.to_string()));
        }
        if variant.is_empty() {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("get_user_by_id")
                .with_entity_id(id.to_string())
                .with_table(variant_entity.table().unwrap_or_default())
                .with_message(format!("{} row missing", user_type)));
        }

        let mut user = user_from_rows(user_type, &merge_rows(&common, &variant))?;
        if let Some(client) = user.as_client_mut() {
            self.load_client_data(id, client)?;
        }
        Ok(Some(user))
    }

    fn load_client_data(&self, id: i64, client: &mut ClientData) -> Result<()> {
        let calendar = self
            .engine
            .get(EntityType::ClientWorkoutCalendar, Filter::IdClient, id);
        if calendar.is_error() {
            return Err(read_failed("get_user_by_id", "workout calendar").with_entity_id(id.to_string()));
        }
        apply_calendar(client, &calendar);

        let profile = profile::load(self.engine, id)?;
        if !profile.is_empty() {
            client.profile = Some(profile);
        }
        Ok(())
    }

    fn save_user_impl(&self, user: &mut User) -> Result<()> {
        if !user.is_valid() {
            return Err(ExError::new(ExErrorKind::ValidationFailure)
                .with_op("save_user")
                .with_entity_id(user.id().to_string())
                .with_message("user is missing a name, email or password"));
        }

        let allocated = user.id() == NEW_ID;
        if allocated {
            let id = self.engine.generate_id(EntityType::User).ok_or_else(|| {
                ExError::new(ExErrorKind::Persistence)
                    .with_op("save_user")
                    .with_message("no user id could be allocated")
            })?;
            user.set_id(id);
        } else if user.id() < 0 {
            return Err(invalid_id("save_user", user.id()));
        }

        let id = user.id();
        let written = picture_png(user, self.blank_picture_path.as_deref()).map(|png| {
            let common = common_row(user, png);
            let variant = variant_row(user);
            let variant_entity = EntityType::for_user_type(user.user_type());
            self.engine.unit_of_work("save_user", |engine| {
                let mut ok = engine.save(EntityType::User, &common, Filter::IdUser, id);
                ok &= engine.save(variant_entity, &variant, Filter::IdUser, id);
                if let Some(client) = user.as_client() {
                    if let Some(p) = &client.profile {
                        ok &= profile::save(engine, id, p);
                    }
                    ok &= save_calendar(engine, id, client);
                }
                ok
            })
        });

        // A rolled-back or never-started write leaves nothing under the new id
        let nothing_written = written.is_err() || self.engine.atomic_writes();
        let err = match written {
            Ok(true) => return Ok(()),
            Ok(false) => write_failed("save_user", id, "user"),
            Err(e) => e,
        };
        if allocated && nothing_written {
            user.set_id(NEW_ID);
        }
        Err(err)
    }

    fn delete_user_impl(&self, id: i64) -> Result<()> {
        if id < 0 {
            return Err(invalid_id("delete_user", id));
        }
        let mut failed = 0usize;
        let ok = self.engine.unit_of_work("delete_user", |engine| {
            for (entity, filter) in USER_TABLES {
                if !engine.delete_row(entity, filter, id) {
                    tracing::warn!(user_id = id, table = entity.table().unwrap_or_default(), "delete failed, continuing");
                    failed += 1;
                }
            }
            failed == 0
        });
        if failed > 0 {
            return Err(write_failed("delete_user", id, "user")
                .with_message(format!("{} of {} deletes failed", failed, USER_TABLES.len())));
        }
        if !ok {
            return Err(write_failed("delete_user", id, "user"));
        }
        Ok(())
    }

    fn save_client_profile_impl(&self, client_id: i64, profile: &ClientProfile) -> Result<()> {
        if client_id < 0 {
            return Err(invalid_id("save_client_profile", client_id));
        }
        let ok = self
            .engine
            .unit_of_work("save_client_profile", |engine| profile::save(engine, client_id, profile));
        if !ok {
            return Err(write_failed("save_client_profile", client_id, "profile"));
        }
        Ok(())
    }
}

fn save_calendar(engine: &PersistenceEngine, client_id: i64, client: &ClientData) -> bool {
    let cleared = engine.delete_row(EntityType::ClientWorkoutCalendar, Filter::IdClient, client_id);
    cleared && engine.replace(EntityType::ClientWorkoutCalendar, &calendar_rows(client_id, client))
}

impl UserStore for UserRepository<'_> {
    fn get_user_by_id(&self, id: i64) -> Option<User> {
        log_op_start!("get_user_by_id", user_id = id);
        let start = Instant::now();

        match self.get_user_by_id_impl(id) {
            Ok(user) => {
                log_op_end!(
                    "get_user_by_id",
                    duration_ms = elapsed_ms(start),
                    found = user.is_some()
                );
                user
            }
            Err(e) => {
                log_op_error!("get_user_by_id", e, duration_ms = elapsed_ms(start), user_id = id);
                None
            }
        }
    }

    fn save_user(&self, user: &mut User) -> bool {
        log_op_start!("save_user", user_id = user.id());
        let start = Instant::now();

        match self.save_user_impl(user) {
            Ok(()) => {
                log_op_end!("save_user", duration_ms = elapsed_ms(start), user_id = user.id());
                true
            }
            Err(e) => {
                log_op_error!("save_user", e, duration_ms = elapsed_ms(start));
                false
            }
        }
    }

    fn delete_user(&self, id: i64) -> bool {
        log_op_start!("delete_user", user_id = id);
        let start = Instant::now();

        match self.delete_user_impl(id) {
            Ok(()) => {
                log_op_end!("delete_user", duration_ms = elapsed_ms(start));
                true
            }
            Err(e) => {
                log_op_error!("delete_user", e, duration_ms = elapsed_ms(start), user_id = id);
                false
            }
        }
    }

    fn get_client_profile(&self, client_id: i64) -> Option<ClientProfile> {
        log_op_start!("get_client_profile", client_id = client_id);
        let start = Instant::now();

        let result = if client_id < 0 {
            Err(invalid_id("get_client_profile", client_id))
        } else {
            profile::load(self.engine, client_id)
        };
        match result {
            Ok(profile) => {
                log_op_end!("get_client_profile", duration_ms = elapsed_ms(start));
                Some(profile)
            }
            Err(e) => {
                log_op_error!("get_client_profile", e, duration_ms = elapsed_ms(start));
                None
            }
        }
    }

    fn save_client_profile(&self, client_id: i64, profile: &ClientProfile) -> bool {
        log_op_start!("save_client_profile", client_id = client_id);
        let start = Instant::now();

        match self.save_client_profile_impl(client_id, profile) {
            Ok(()) => {
                log_op_end!("save_client_profile", duration_ms = elapsed_ms(start));
                true
            }
            Err(e) => {
                log_op_error!("save_client_profile", e, duration_ms = elapsed_ms(start));
                false
            }
        }
    }

    fn get_user_preferences(&self, user_id: i64) -> Option<UserPreferences> {
        log_op_start!("get_user_preferences", user_id = user_id);
        let start = Instant::now();

        let result = if user_id < 0 {
            Err(invalid_id("get_user_preferences", user_id))
        } else {
            preferences::load(self.engine, user_id)
        };
        match result {
            Ok(prefs) => {
                log_op_end!(
                    "get_user_preferences",
                    duration_ms = elapsed_ms(start),
                    found = prefs.is_some()
                );
                prefs
            }
            Err(e) => {
                log_op_error!("get_user_preferences", e, duration_ms = elapsed_ms(start));
                None
            }
        }
    }

    fn save_user_preferences(&self, prefs: &UserPreferences) -> bool {
        log_op_start!("save_user_preferences", user_id = prefs.user_id);
        let start = Instant::now();

        let result = if prefs.user_id < 0 {
            Err(invalid_id("save_user_preferences", prefs.user_id))
        } else {
            preferences::save(self.engine, prefs).and_then(|saved| {
                if saved {
                    Ok(())
                } else {
                    Err(write_failed("save_user_preferences", prefs.user_id, "preferences"))
                }
            })
        };
        match result {
            Ok(()) => {
                log_op_end!("save_user_preferences", duration_ms = elapsed_ms(start));
                true
            }
            Err(e) => {
                log_op_error!("save_user_preferences", e, duration_ms = elapsed_ms(start));
                false
            }
        }
    }

    fn list_users(&self, user_type: UserType) -> Relation {
        log_op_start!("list_users", user_type = user_type.as_str());
        let start = Instant::now();

        let all = self.engine.get_all(EntityType::User);
        if all.is_error() {
            log_op_error!(
                "list_users",
                read_failed("list_users", "users"),
                duration_ms = elapsed_ms(start)
            );
            return all;
        }

        let mut listed = Relation::new(all.name());
        listed.set_columns(all.columns().iter().cloned());
        for (index, row) in all.rows().enumerate() {
            let stored = all.value(index, "userType").to_text();
            if stored.parse::<UserType>().ok() == Some(user_type) {
                listed.add_row(row);
            }
        }
        log_op_end!(
            "list_users",
            duration_ms = elapsed_ms(start),
            row_count = listed.row_count()
        );
        listed
    }

    fn check_user_name(&self, user_name: &str) -> bool {
        log_op_start!("check_user_name");
        let start = Instant::now();

        if user_name.trim().is_empty() {
            log_op_end!("check_user_name", duration_ms = elapsed_ms(start), available = false);
            return false;
        }
        let rows = self.engine.get(EntityType::User, Filter::UserName, user_name);
        if rows.is_error() {
            log_op_error!(
                "check_user_name",
                read_failed("check_user_name", "users"),
                duration_ms = elapsed_ms(start)
            );
            return false;
        }
        let available = rows.is_empty();
        log_op_end!("check_user_name", duration_ms = elapsed_ms(start), available = available);
        available
    }
}
