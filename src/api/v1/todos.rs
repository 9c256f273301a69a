//! Todo management handlers.
//!
//! Update and toggle are read/modify/write sequences with no version check:
//! concurrent writers to the same todo are last-write-wins, and a todo deleted
//! between the read and the write answers 404.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::api::AppState;
use crate::api::envelope::{
    ApiResponse, ErrorResponse, MessageResponse, PageMeta, PaginatedResponse,
};
use crate::api::error::ApiError;
use crate::db::validation::{TodoCandidate, Violation, validate};
use crate::db::{
    Database, Id, NewTodo, Pagination, Priority, Todo, TodoFilter, TodoQuery, TodoRepository,
};

// =============================================================================
// DTOs
// =============================================================================

/// Todo response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "Semi-skimmed, two litres")]
    pub description: Option<String>,
    #[schema(example = false)]
    pub completed: bool,
    #[schema(example = "MEDIUM")]
    pub priority: String,
    #[schema(example = "2025-01-01T00:00:00.000000Z")]
    pub created_at: String,
    #[schema(example = "2025-01-01T00:00:00.000000Z")]
    pub updated_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            completed: t.completed,
            priority: t.priority.to_string(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Create todo request DTO
///
/// Every field is optional at the wire level so that a missing title or an
/// unknown priority is reported as a validation failure, not a parse error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Required, 1-100 characters
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
    /// At most 500 characters
    #[schema(example = "Semi-skimmed, two litres")]
    pub description: Option<String>,
    /// LOW, MEDIUM or HIGH (defaults to MEDIUM)
    #[schema(example = "HIGH")]
    pub priority: Option<String>,
}

/// Update todo request DTO (partial update)
///
/// Absent fields are left untouched. `description: null` clears the
/// description; `null` for title, completed or priority is rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[schema(example = "Buy oat milk")]
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    pub description: Option<Option<String>>,
    #[schema(value_type = Option<bool>, example = true)]
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    pub completed: Option<Option<bool>>,
    #[schema(example = "HIGH")]
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    pub priority: Option<Option<String>>,
}

impl UpdateTodoRequest {
    /// Apply the patch onto `target`, then validate the whole merged record.
    ///
    /// On failure `target` is left unchanged.
    pub fn merge_into(self, target: &mut Todo) -> Result<(), Vec<Violation>> {
        let title = match &self.title {
            None => Some(target.title.as_str()),
            Some(title) => title.as_deref(),
        };
        let description = match &self.description {
            None => target.description.as_deref(),
            Some(description) => description.as_deref(),
        };
        // An explicit null can never be a valid priority
        let priority = match &self.priority {
            None => Some(target.priority.as_str()),
            Some(priority) => Some(priority.as_deref().unwrap_or("")),
        };

        let validated = validate(&TodoCandidate {
            title,
            description,
            priority,
        });

        let completed = match self.completed {
            None => Ok(target.completed),
            Some(Some(completed)) => Ok(completed),
            Some(None) => Err(Violation::new("completed", "completed must be true or false")),
        };

        let (fields, completed) = match (validated, completed) {
            (Ok(fields), Ok(completed)) => (fields, completed),
            (validated, completed) => {
                let mut violations = validated.err().unwrap_or_default();
                violations.extend(completed.err());
                return Err(violations);
            }
        };

        target.title = fields.title;
        target.description = fields.description;
        if let Some(priority) = fields.priority {
            target.priority = priority;
        }
        target.completed = completed;

        Ok(())
    }
}

/// Query parameters for listing todos.
///
/// Kept as raw strings so malformed values produce a specific 400 message.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListTodosQuery {
    /// Filter by completion status
    #[param(value_type = Option<bool>, example = true)]
    pub completed: Option<String>,
    /// Filter by priority (LOW, MEDIUM, HIGH)
    #[param(example = "HIGH")]
    pub priority: Option<String>,
    /// Page number, starting at 1 (page mode)
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
    /// Items per page, default 10, max 100 (page mode)
    #[param(value_type = Option<i64>, example = 10)]
    pub per_page: Option<String>,
    /// Maximum number of items to return, default 10, max 100
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
    /// Number of items to skip
    #[param(value_type = Option<i64>, example = 0)]
    pub offset: Option<String>,
}

impl ListTodosQuery {
    /// Parse and normalize into a storage query.
    pub fn into_db_query(self) -> Result<TodoQuery, ApiError> {
        let completed = non_empty(self.completed)
            .map(|raw| {
                parse_bool(&raw).ok_or_else(|| {
                    ApiError::MalformedRequest("Invalid completed parameter".to_string())
                })
            })
            .transpose()?;

        let priority = non_empty(self.priority)
            .map(|raw| {
                raw.parse::<Priority>().map_err(|_| {
                    ApiError::MalformedRequest("Invalid priority parameter".to_string())
                })
            })
            .transpose()?;

        let pagination = Pagination::from_params(
            parse_int("page", self.page)?,
            parse_int("per_page", self.per_page)?,
            parse_int("limit", self.limit)?,
            parse_int("offset", self.offset)?,
        );

        Ok(TodoQuery {
            filter: TodoFilter {
                completed,
                priority,
            },
            pagination,
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List todos
///
/// Returns one page of todos, newest first, optionally filtered by
/// completion status and priority.
#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Paginated list of todos", body = PaginatedResponse<TodoResponse>),
        (status = 400, description = "Malformed query parameter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todos<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<TodoResponse>>, ApiError> {
    let Query(query) = query?;
    let db_query = query.into_db_query()?;

    let result = state.db().todos().list(&db_query).await?;

    let meta = PageMeta::new(&db_query.pagination, result.total);
    let items: Vec<TodoResponse> = result.items.into_iter().map(TodoResponse::from).collect();

    Ok(Json(PaginatedResponse::ok(
        items,
        meta,
        "Todos retrieved successfully",
    )))
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = ApiResponse<TodoResponse>),
        (status = 400, description = "Invalid todo ID", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<ApiResponse<TodoResponse>>, ApiError> {
    let id = todo_id(id)?;

    let todo = state.db().todos().get(id).await?;

    Ok(Json(ApiResponse::ok(
        TodoResponse::from(todo),
        "Todo retrieved successfully",
    )))
}

/// Create a todo
///
/// New todos start incomplete; priority defaults to MEDIUM.
#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = ApiResponse<TodoResponse>),
        (status = 400, description = "Validation failed or malformed body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_todo<D: Database>(
    State(state): State<AppState<D>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TodoResponse>>), ApiError> {
    let Json(req) = payload?;

    let fields = validate(&TodoCandidate {
        title: req.title.as_deref(),
        description: req.description.as_deref(),
        // An empty priority counts as omitted on create
        priority: req.priority.as_deref().filter(|p| !p.is_empty()),
    })
    .map_err(ApiError::Validation)?;

    let new_todo = NewTodo {
        title: fields.title,
        description: fields.description,
        completed: false,
        priority: fields.priority.unwrap_or_default(),
    };

    let created = state.db().todos().create(&new_todo).await?;
    info!(id = created.id, "Todo created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            TodoResponse::from(created),
            "Todo created successfully",
        )),
    ))
}

/// Partially update a todo
///
/// Only the fields present in the body change; the merged record is
/// validated as a whole before it is saved.
#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = ApiResponse<TodoResponse>),
        (status = 400, description = "Validation failed or malformed body", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TodoResponse>>, ApiError> {
    let id = todo_id(id)?;
    let Json(req) = payload?;

    let mut todo = state.db().todos().get(id).await?;
    req.merge_into(&mut todo).map_err(ApiError::Validation)?;

    let updated = state.db().todos().update(&todo).await?;
    info!(id = id, "Todo updated");

    Ok(Json(ApiResponse::ok(
        TodoResponse::from(updated),
        "Todo updated successfully",
    )))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 400, description = "Invalid todo ID", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = todo_id(id)?;

    state.db().todos().delete(id).await?;
    info!(id = id, "Todo deleted");

    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}

/// Toggle completion
///
/// Flips `completed` and saves the todo.
#[utoipa::path(
    patch,
    path = "/todos/{id}/toggle",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Completion toggled", body = ApiResponse<TodoResponse>),
        (status = 400, description = "Invalid todo ID", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn toggle_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<ApiResponse<TodoResponse>>, ApiError> {
    let id = todo_id(id)?;

    let mut todo = state.db().todos().get(id).await?;
    todo.completed = !todo.completed;
    validate(&TodoCandidate::from(&todo)).map_err(ApiError::Validation)?;

    let updated = state.db().todos().update(&todo).await?;
    info!(id = id, completed = updated.completed, "Todo toggled");

    Ok(Json(ApiResponse::ok(
        TodoResponse::from(updated),
        "Todo completion status toggled successfully",
    )))
}

// =============================================================================
// Helpers
// =============================================================================

/// Ids are positive; anything else is a malformed path, not a missing todo.
fn todo_id(id: Result<Path<Id>, PathRejection>) -> Result<Id, ApiError> {
    match id {
        Ok(Path(id)) if id >= 1 => Ok(id),
        _ => Err(ApiError::MalformedRequest("Invalid todo ID".to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Boolean spellings accepted for the `completed` filter.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_int(name: &str, value: Option<String>) -> Result<Option<i64>, ApiError> {
    non_empty(value)
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| ApiError::MalformedRequest(format!("Invalid {} parameter", name)))
        })
        .transpose()
}
