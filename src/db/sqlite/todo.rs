//! SQLite TodoRepository implementation.

use std::str::FromStr;

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::warn;

use super::helpers::{TODO_COLUMNS, TODO_ORDER, push_todo_filter};
use crate::db::utils::current_timestamp;
use crate::db::{
    DbError, DbResult, Id, ListResult, NewTodo, Priority, Todo, TodoQuery, TodoRepository,
};

/// SQLx-backed todo repository.
pub struct SqliteTodoRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> TodoRepository for SqliteTodoRepository<'a> {
    async fn create(&self, todo: &NewTodo) -> DbResult<Todo> {
        // Always generate timestamps - never trust caller input
        let now = current_timestamp();

        let row = sqlx::query(&format!(
            "INSERT INTO todo (title, description, completed, priority, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.priority.as_str())
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await?;

        Ok(row_to_todo(&row))
    }

    async fn get(&self, id: Id) -> DbResult<Todo> {
        let row = sqlx::query(&format!("SELECT {} FROM todo WHERE id = ?", TODO_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::todo_not_found(id))?;

        Ok(row_to_todo(&row))
    }

    async fn list(&self, query: &TodoQuery) -> DbResult<ListResult<Todo>> {
        let limit = query.pagination.limit();
        let offset = query.pagination.offset();

        let mut page_query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM todo", TODO_COLUMNS));
        push_todo_filter(&mut page_query, &query.filter);
        page_query
            .push(TODO_ORDER)
            .push(" LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(offset as i64);

        let rows = page_query.build().fetch_all(self.pool).await?;
        let items: Vec<Todo> = rows.iter().map(row_to_todo).collect();

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM todo");
        push_todo_filter(&mut count_query, &query.filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        Ok(ListResult {
            items,
            total: total.max(0) as u64,
            limit,
            offset,
        })
    }

    async fn update(&self, todo: &Todo) -> DbResult<Todo> {
        let row = sqlx::query(&format!(
            "UPDATE todo
             SET title = ?, description = ?, completed = ?, priority = ?, updated_at = ?
             WHERE id = ?
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.priority.as_str())
        .bind(current_timestamp())
        .bind(todo.id)
        .fetch_optional(self.pool)
        .await?;

        // No row back means it was deleted (or never existed)
        let row = row.ok_or_else(|| DbError::todo_not_found(todo.id))?;

        Ok(row_to_todo(&row))
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::todo_not_found(id));
        }

        Ok(())
    }
}

/// Convert a database row to a Todo model.
fn row_to_todo(row: &sqlx::sqlite::SqliteRow) -> Todo {
    Todo {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: row.get("completed"),
        priority: {
            let priority_str: String = row.get("priority");
            Priority::from_str(&priority_str).unwrap_or_else(|_| {
                warn!(
                    id = row.get::<i64, _>("id"),
                    priority = %priority_str,
                    "Stored priority is outside the enumeration, reading it as MEDIUM"
                );
                Priority::default()
            })
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
