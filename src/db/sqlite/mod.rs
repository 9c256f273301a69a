//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module.

mod connection;
mod helpers;
mod todo;

#[cfg(test)]
mod connection_test;

pub use connection::{DEFAULT_MAX_CONNECTIONS, SqliteDatabase};
pub use todo::SqliteTodoRepository;
