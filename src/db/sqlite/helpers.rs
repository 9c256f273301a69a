//! Shared helper functions for SQLite repositories.

use sqlx::{QueryBuilder, Sqlite};

use crate::db::TodoFilter;

/// Columns selected for every todo read.
pub const TODO_COLUMNS: &str = "id, title, description, completed, priority, created_at, updated_at";

/// Deterministic list order: newest first, equal timestamps by ascending id.
pub const TODO_ORDER: &str = " ORDER BY created_at DESC, id ASC";

/// Append the WHERE clause for a todo filter.
///
/// Used for both the page fetch and the count so the two always agree.
pub fn push_todo_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &TodoFilter) {
    let mut separator = " WHERE ";

    if let Some(completed) = filter.completed {
        builder.push(separator).push("completed = ").push_bind(completed);
        separator = " AND ";
    }

    if let Some(priority) = filter.priority {
        builder
            .push(separator)
            .push("priority = ")
            .push_bind(priority.as_str());
    }
}
