//! FitDesk Core - domain model and shared facilities
//!
//! This crate provides:
//! - The user hierarchy (Client, Trainer, Admin) with its validity rule
//! - Client profiles with per-field range validation
//! - User preferences and PNG profile pictures
//! - The dynamically typed `Value` cells relations are made of
//! - The error facility (`ExError`) and the structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ModelError, Result};
pub use model::{
    ClientProfile, ProfileCategory, ProfileField, ProfilePicture, User, UserKind, UserPreferences,
    UserType, Value, NEW_ID,
};
