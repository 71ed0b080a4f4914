//! Core types shared across FitDesk facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities and by the persistence layer:
//!
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
