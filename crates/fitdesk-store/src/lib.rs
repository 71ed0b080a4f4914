//! FitDesk Store - generic entity persistence over SQLite
//!
//! Provides:
//! - In-memory relations (named, column-labelled row sets)
//! - The entity/filter catalog mapping domain vocabulary to tables
//! - A fail-soft persistence engine over one owned connection
//! - The user repository composing engine calls into aggregate operations

pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod relation;
pub mod repo;
pub mod schema;

// Re-export key types
pub use catalog::{EntityType, Filter};
pub use config::StoreConfig;
pub use engine::PersistenceEngine;
pub use errors::Result;
pub use relation::Relation;
pub use repo::{TrainingRepository, UserRepository, UserStore};
