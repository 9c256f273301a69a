//! Todo API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use todo_api::api::{self, Config, ServeError};
use todo_api::db::{Database, DbError, SqliteDatabase};
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(todo_api::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(todo_api::binary::io))]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    #[diagnostic(code(todo_api::binary::api))]
    Api(#[from] ServeError),
}

/// Flags override `TODO_API_*` environment variables, which override defaults.
#[derive(Parser)]
#[command(name = "todo-api")]
#[command(author, version, about = "Todo list REST API server", long_about = None)]
struct Cli {
    /// Host address to bind to [env: TODO_API_HOST, default: 0.0.0.0]
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on [env: TODO_API_PORT or PORT, default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Database file path [env: TODO_API_DB, default: todos.db]
    #[arg(long)]
    db: Option<PathBuf>,

    /// Connection pool size [env: TODO_API_MAX_CONNECTIONS, default: 5]
    #[arg(long)]
    max_connections: Option<u32>,

    /// Per-request timeout in seconds [env: TODO_API_REQUEST_TIMEOUT_SECS, default: 15]
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Graceful shutdown drain window in seconds [env: TODO_API_SHUTDOWN_TIMEOUT_SECS, default: 30]
    #[arg(long)]
    shutdown_timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new();
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(db) = self.db {
            config = config.with_db_path(db);
        }
        if let Some(n) = self.max_connections {
            config = config.with_max_connections(n);
        }
        if let Some(secs) = self.request_timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.shutdown_timeout_secs {
            config = config.with_shutdown_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    api::init_tracing();

    let config = Cli::parse().into_config();

    info!("Opening database at {:?}", config.db_path);

    // Ensure parent directory exists
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&config.db_path, config.max_connections).await?;

    // Run migrations before starting the server
    db.migrate().await?;
    info!("Database migrations complete");

    api::run(config, db).await?;

    Ok(())
}
