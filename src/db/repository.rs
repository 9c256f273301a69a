//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//!
//! Methods return `Send` futures so handlers generic over [`Database`] can
//! run on a multi-threaded runtime.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Id, ListResult, NewTodo, Todo},
    query::TodoQuery,
};

/// Repository for Todo operations.
pub trait TodoRepository {
    /// Insert a new todo. Storage assigns the id and both timestamps.
    fn create(&self, todo: &NewTodo) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Get a todo by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Todo>> + Send;

    /// List one page of todos plus the total count for the same filter.
    fn list(&self, query: &TodoQuery) -> impl Future<Output = DbResult<ListResult<Todo>>> + Send;

    /// Overwrite the mutable fields of an existing todo and refresh `updated_at`.
    ///
    /// `id` selects the row; `created_at` and `updated_at` on the input are
    /// ignored. Returns the stored record.
    fn update(&self, todo: &Todo) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Delete a todo by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync + 'static {
    type Todos<'a>: TodoRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the todo repository.
    fn todos(&self) -> Self::Todos<'_>;
}
