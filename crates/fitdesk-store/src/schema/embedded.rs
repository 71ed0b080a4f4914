//! Default schema, embedded at compile time using include_str!

/// Tables for users, their variants, preferences, the seven profile
/// categories, the workout calendar and the training catalogue
pub const EMBEDDED_SCHEMA: &str = include_str!("../../schema/schema.sql");
