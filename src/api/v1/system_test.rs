//! Integration tests for system endpoints.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::db::{Database, SqliteDatabase};

async fn test_app() -> axum::Router {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    routes::create_router(AppState::new(db), Duration::from_secs(15))
}

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok() {
    let response = get(test_app().await, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Todo API is running");
}

#[tokio::test(flavor = "multi_thread")]
async fn openapi_document_lists_todo_paths() {
    let response = get(test_app().await, "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let doc: Value = serde_json::from_slice(&body).unwrap();
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/health"));
    assert!(paths.contains_key("/todos"));
    assert!(paths.contains_key("/todos/{id}"));
    assert!(paths.contains_key("/todos/{id}/toggle"));
}

#[tokio::test(flavor = "multi_thread")]
async fn docs_ui_is_served() {
    let response = get(test_app().await, "/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_route_is_404_envelope() {
    let response = get(test_app().await, "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test(flavor = "multi_thread")]
async fn unsupported_method_is_405_envelope() {
    let app = test_app().await;

    for uri in ["/todos", "/api/todos", "/todos/1"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");

        let body = json_body(response).await;
        assert_eq!(body["success"], false, "{uri}");
        assert_eq!(body["message"], "Method not allowed", "{uri}");
        assert_eq!(body["error"], "Method Not Allowed", "{uri}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn timed_out_request_gets_envelope() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    let app = routes::create_router(AppState::new(db), Duration::ZERO);

    let response = get(app, "/todos").await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Request timed out");
    assert_eq!(body["error"], "Request Timeout");
}

#[tokio::test(flavor = "multi_thread")]
async fn cors_headers_are_present() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
