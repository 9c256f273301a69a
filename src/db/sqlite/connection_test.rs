//! Tests for SQLite database connection and migrations.

use crate::db::{Database, NewTodo, SqliteDatabase, TodoRepository};

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_todo_table() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("Migration should succeed");

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Query should succeed");

    // _sqlx_migrations is created by sqlx for migration tracking.
    for table in ["_sqlx_migrations", "todo"] {
        assert!(
            tables.iter().any(|t| t == table),
            "Missing table: {}. Found tables: {:?}",
            table,
            tables
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("First migration should succeed");
    db.migrate().await.expect("Second migration should succeed");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo")
        .fetch_one(db.pool())
        .await
        .expect("Query should succeed");

    assert_eq!(count, 0, "Migrations must not seed any todos");
}

#[tokio::test(flavor = "multi_thread")]
async fn schema_rejects_unknown_priority() {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let result = sqlx::query(
        "INSERT INTO todo (title, completed, priority, created_at, updated_at)
         VALUES ('x', 0, 'URGENT', 'now', 'now')",
    )
    .execute(db.pool())
    .await;

    assert!(result.is_err(), "CHECK constraint should reject URGENT");
}

#[tokio::test(flavor = "multi_thread")]
async fn open_creates_database_file_and_persists() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("todos.db");

    {
        let db = SqliteDatabase::open(&path, 2)
            .await
            .expect("Open should create the file");
        db.migrate().await.unwrap();
        db.todos()
            .create(&NewTodo::new("Survives restart"))
            .await
            .unwrap();
        db.close().await;
    }

    assert!(path.exists());

    let db = SqliteDatabase::open(&path, 2).await.unwrap();
    db.migrate().await.unwrap();
    let todo = db.todos().get(1).await.expect("Todo should persist");
    assert_eq!(todo.title, "Survives restart");
}

#[tokio::test(flavor = "multi_thread")]
async fn open_fails_for_unreachable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("todos.db");

    let result = SqliteDatabase::open(&path, 1).await;
    assert!(matches!(
        result,
        Err(crate::db::DbError::Connection { .. })
    ));
}
