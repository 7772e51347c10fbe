//! Router, shared state and server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Router, middleware};
use pwhash_core::{Config, TaskManager};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use super::error::ServerError;
use super::{handlers, request_id};

pub const API_PREFIX: &str = "/api/v1";

/// Shared application state.
pub struct AppState {
    pub manager: TaskManager,
    /// Hint sent as `Retry-After` while a task is pending.
    pub retry_after: Duration,
    /// Flipped to `true` once pending tasks are drained after a shutdown.
    pub stop_tx: watch::Sender<bool>,
    pub(crate) next_request_id: AtomicU64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let (stop_tx, _rx) = watch::channel(false);
        Self {
            manager: TaskManager::new(config.manager_config()),
            retry_after: config.task_delay(),
            stop_tx,
            next_request_id: AtomicU64::new(0),
        }
    }

    /// Latch the manager (if nobody did yet), wait for every in-flight task,
    /// then tell the server to stop.
    pub(crate) async fn drain_and_stop(&self) {
        // AlreadyShuttingDown just means someone else latched first
        let _ = self.manager.shutdown().await;

        tracing::info!("shutdown: waiting for pending tasks...");
        self.manager.await_idle().await;
        let counts = self.manager.counts().await;
        tracing::info!(
            done = counts.done,
            failed = counts.failed,
            "shutdown: all tasks finished, stopping server"
        );

        self.stop_tx.send_replace(true);
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/hash", post(handlers::new_hash))
        .route("/hash/:id", get(handlers::check_hash))
        .route("/stats", get(handlers::stats))
        .route("/shutdown", post(handlers::shutdown));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            request_id::track,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound, not yet running HTTP server.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    pub async fn bind(config: &Config) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.server_address)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.server_address.clone(),
                source,
            })?;
        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until a shutdown request (HTTP or signal) has drained every task.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        tracing::info!(%addr, "server listening");

        let app = router(Arc::clone(&self.state));
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal(self.state))
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Resolves when the server should stop: either a shutdown request finished
/// draining, or SIGINT/SIGTERM arrived and draining finished.
async fn shutdown_signal(state: Arc<AppState>) {
    let mut stop_rx = state.stop_tx.subscribe();
    let stopped = async {
        let _ = stop_rx.wait_for(|stop| *stop).await;
    };

    tokio::select! {
        _ = stopped => {},
        _ = os_signal() => {
            tracing::info!("shutdown signal received");
            state.drain_and_stop().await;
        },
    }
}

async fn os_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
