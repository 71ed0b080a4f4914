//! Repository layer: domain objects on top of the persistence engine
//!
//! A user is spread over the common `users` row, one variant row and, for
//! clients, seven profile tables and a workout calendar. The functions in
//! this module assemble and disassemble those rows; [`UserRepository`]
//! sequences them and owns lifecycle logging.

pub mod hydration;
pub mod preferences;
pub mod profile;
pub mod training_repo;
pub mod user_repo;

pub use training_repo::TrainingRepository;
pub use user_repo::UserRepository;

use crate::relation::Relation;
use fitdesk_core::errors::{ExError, ExErrorKind};
use fitdesk_core::model::{ClientProfile, User, UserPreferences, UserType};
use std::time::Instant;

/// Operations business collaborators (session manager, login) rely on
///
/// Every method fails soft: lookups return `None`, writes return `false`,
/// and the reason is logged.
pub trait UserStore {
    /// Fully assembled user, or `None` when absent, unreadable or invalid
    fn get_user_by_id(&self, id: i64) -> Option<User>;

    /// Write a user; a user with id [`fitdesk_core::NEW_ID`] is given a
    /// fresh id first
    fn save_user(&self, user: &mut User) -> bool;

    /// Remove a user from every table that can reference them
    fn delete_user(&self, id: i64) -> bool;

    fn get_client_profile(&self, client_id: i64) -> Option<ClientProfile>;

    fn save_client_profile(&self, client_id: i64, profile: &ClientProfile) -> bool;

    fn get_user_preferences(&self, user_id: i64) -> Option<UserPreferences>;

    fn save_user_preferences(&self, preferences: &UserPreferences) -> bool;

    /// Common rows of every user of one type
    fn list_users(&self, user_type: UserType) -> Relation;

    /// True when no user has this name yet
    fn check_user_name(&self, user_name: &str) -> bool;
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

pub(crate) fn invalid_id(op: &str, id: i64) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(op.to_string())
        .with_entity_id(id.to_string())
        .with_message("id must not be negative")
}

pub(crate) fn read_failed(op: &str, what: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(format!("{} could not be read", what))
}

pub(crate) fn write_failed(op: &str, id: i64, what: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_entity_id(id.to_string())
        .with_message(format!("{} not fully written", what))
}
