//! HTTP API: configuration, routing and the serve loop.

pub mod envelope;
pub mod error;
pub mod routes;
mod state;
pub mod v1;


use std::future::{Future, IntoFuture};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::Router;
use miette::Diagnostic;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::ApiError;
pub use state::AppState;

use crate::db::Database;
use crate::db::sqlite::DEFAULT_MAX_CONNECTIONS;

/// API server errors
#[derive(Error, Diagnostic, Debug)]
pub enum ServeError {
    #[error("Failed to bind to address {addr}: {source}")]
    #[diagnostic(code(todo_api::server::bind))]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(todo_api::server::io))]
    Io(#[from] std::io::Error),
}

/// API server configuration
///
/// Precedence: builder overrides (CLI flags) > environment variables > defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Size of the SQLite connection pool
    pub max_connections: u32,
    /// Per-request timeout enforced by middleware
    pub request_timeout: Duration,
    /// How long in-flight requests may drain after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            db_path: PathBuf::from("todos.db"),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            request_timeout: Duration::from_secs(15),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Defaults overlaid with `TODO_API_*` environment variables.
    ///
    /// `PORT` is honored when `TODO_API_PORT` is unset. Unparseable values
    /// are logged and ignored.
    pub fn new() -> Self {
        let defaults = Self::default();
        Self {
            host: env_parse("TODO_API_HOST").unwrap_or(defaults.host),
            port: env_parse("TODO_API_PORT")
                .or_else(|| env_parse("PORT"))
                .unwrap_or(defaults.port),
            db_path: std::env::var_os("TODO_API_DB")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            max_connections: env_parse("TODO_API_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            request_timeout: env_parse("TODO_API_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            shutdown_timeout: env_parse("TODO_API_SHUTDOWN_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_timeout),
        }
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok().filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value {:?} for {}", raw, key);
            None
        }
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the API server with the given configuration and database.
///
/// Returns once a shutdown signal (Ctrl+C / SIGTERM) has been handled.
pub async fn run<D: Database>(config: Config, db: D) -> Result<(), ServeError> {
    let state = AppState::new(db);
    let app = routes::create_router(state, config.request_timeout);

    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);
    info!("API documentation available at http://{}/docs", addr);

    serve(listener, app, config.shutdown_timeout, shutdown_signal()).await
}

/// Serve `app` until `signal` resolves, then drain for at most `drain_timeout`.
///
/// Connections still busy when the drain window closes are dropped.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    drain_timeout: Duration,
    signal: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = CancellationToken::new();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signal.await;
        trigger.cancel();
    });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = server => result?,
        () = drain_deadline => {
            warn!(
                "In-flight requests did not finish within {:?}, forcing shutdown",
                drain_timeout
            );
        }
    }

    info!("Server exited gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
