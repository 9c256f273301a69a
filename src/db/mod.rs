//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing different storage backends to be swapped without changing
//! business logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Todo, Priority)
//! - `query`: Filter and pagination types for list requests
//! - `repository`: Trait definitions for data access
//! - `validation`: Field rules applied before anything is persisted
//! - `sqlite`: SQLite implementation of the repository traits

mod error;
mod models;
mod query;
mod repository;
pub mod sqlite;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod models_test;
#[cfg(test)]
mod validation_test;

pub use error::{DbError, DbResult};
pub use models::*;
pub use query::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
