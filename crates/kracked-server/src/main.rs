//! HTTP server entry point and Axum router setup.
//!
//! Bootstraps the SQLite schema, optionally seeds the agent roster, and serves
//! the `/api` routes until Ctrl-C. The database handle is released once the
//! server has drained.

mod config;
mod dto;
mod error;
mod handlers;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use kracked_store::{roster, schema, StoreError};
use rusqlite::Connection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Upper bound on a single request, database work included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared server state accessible from all handlers.
pub struct ServerState {
    /// `None` once the handle has been released at shutdown.
    db: Mutex<Option<Connection>>,
    /// Mirrors `db.is_some()` so health checks never wait on a running query.
    db_open: AtomicBool,
}

impl ServerState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(Some(conn)),
            db_open: AtomicBool::new(true),
        }
    }

    /// Whether a database handle is held. Performs no I/O and takes no lock.
    pub fn db_connected(&self) -> bool {
        self.db_open.load(Ordering::Acquire)
    }

    /// Runs `f` against the shared connection on the blocking pool.
    ///
    /// Awaiting the blocking task lets the request deadline fire while a query
    /// is still running. The query itself runs to completion.
    pub async fn with_db<T, F>(self: &Arc<Self>, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || state.with_db_blocking(f))
            .await
            .map_err(|e| {
                error!("Database task failed: {}", e);
                AppError::Internal("database task failed".into())
            })?
    }

    /// Runs `f` against the shared connection on the current thread.
    pub fn with_db_blocking<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, AppError> {
        let guard = self.db.lock().map_err(|e| {
            error!("DB lock poisoned: {}", e);
            AppError::Internal("database lock error".into())
        })?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| AppError::Internal("database connection is closed".into()))?;
        f(conn).map_err(|e| {
            error!("Database request failed: {}", e);
            AppError::from(e)
        })
    }

    /// Takes the handle out of the state and closes it.
    pub fn close_db(&self) {
        self.db_open.store(false, Ordering::Release);
        let conn = match self.db.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(conn) = conn else {
            return;
        };
        match conn.close() {
            Ok(()) => info!("Database connection closed"),
            Err((_, e)) => warn!("Failed to close database cleanly: {}", e),
        }
    }
}

/// Builds the application router with all `/api` routes.
pub fn app(state: Arc<ServerState>) -> Router {
    app_with_timeout(state, REQUEST_TIMEOUT)
}

/// Like [`app`], with an explicit per-request deadline.
pub fn app_with_timeout(state: Arc<ServerState>, timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/agents", get(handlers::agents::list))
        .route("/agents/{id}", get(handlers::agents::get))
        .route("/agents/{id}/xp", post(handlers::agents::award_xp))
        .route(
            "/projects",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route("/memory", post(handlers::memory::store))
        .route("/memory/{project_id}", get(handlers::memory::list))
        .layer(trace_layer);

    let api = Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let conn = init_database(&config).map_err(|e| {
        error!("Startup aborted: {:#}", e);
        e
    })?;
    let state = Arc::new(ServerState::new(conn));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Kracked_Skills Agent Backend running on {}", addr);
    info!("  Health: http://localhost:{}/api/health", config.port);
    info!("  Agents: http://localhost:{}/api/agents", config.port);

    axum::serve(listener, app(Arc::clone(&state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.close_db();
    Ok(())
}

/// Opens the database, bootstraps the schema and syncs the seed roster.
fn init_database(config: &ServerConfig) -> Result<Connection> {
    let conn = schema::init_db(&config.database_url).context("failed to initialize database")?;

    if config.seed_agents {
        let seed = roster::load_roster(&config.kracked_root);
        roster::sync_roster(&conn, &seed).context("failed to seed agents")?;
    } else {
        info!("Agent seeding disabled");
    }

    Ok(conn)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
