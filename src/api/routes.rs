//! API route configuration.

use std::any::Any;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::envelope::{ErrorResponse, MessageResponse, PageMeta};
use super::error::internal_error_body;
use super::state::AppState;
use super::v1::{self, CreateTodoRequest, HealthResponse, TodoResponse, UpdateTodoRequest};
use crate::db::Database;
use crate::db::validation::Violation;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Todo list REST API with filtering, pagination and partial updates",
        license(name = "GPL-2.0")
    ),
    paths(
        v1::health,
        v1::list_todos,
        v1::get_todo,
        v1::create_todo,
        v1::update_todo,
        v1::delete_todo,
        v1::toggle_todo,
    ),
    components(
        schemas(
            HealthResponse,
            TodoResponse,
            CreateTodoRequest,
            UpdateTodoRequest,
            MessageResponse,
            ErrorResponse,
            PageMeta,
            Violation,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "todos", description = "Todo management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation.
///
/// Todo routes are served both at the root (`/todos`) and under `/api`.
pub fn create_router<D: Database>(state: AppState<D>, request_timeout: Duration) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/health", get(v1::health))
        .route("/openapi.json", get(openapi_json));

    // Todo routes (generic over Database)
    let todo_routes = routes!(D => {
        get "/todos" => v1::list_todos,
        post "/todos" => v1::create_todo,
        get "/todos/{id}" => v1::get_todo,
        put "/todos/{id}" => v1::update_todo,
        delete "/todos/{id}" => v1::delete_todo,
        patch "/todos/{id}/toggle" => v1::toggle_todo,
    });

    system_routes
        .merge(todo_routes.clone())
        .nest("/api", todo_routes)
        .merge(Scalar::with_url("/docs", api))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(timeout_envelope))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Give the empty 408 produced by the timeout layer a standard error body.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("Request timed out");

    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ErrorResponse::new("Request timed out", "Request Timeout")),
    )
        .into_response()
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Resource not found", "Not Found")),
    )
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed", "Method Not Allowed")),
    )
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Turn a handler panic into the standard 500 envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(internal_error_body())).into_response()
}
