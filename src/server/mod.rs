//! HTTP surface: the listing query endpoint plus entry mutations.
//!
//! One SQLite connection is shared behind a mutex. Every handler holds it
//! for a single query or mutation, never across an await point.

pub mod error;
pub mod handlers;

use crate::config::Config;
use crate::db::DbPool;
use crate::errors::{AppError, AppResult};
use axum::Router;
use axum::routing::{get, patch, post};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<Mutex<DbPool>>,
    pub list_path: String,
    pub default_per_page: u32,
}

impl AppState {
    pub fn new(pool: DbPool, cfg: &Config) -> Self {
        Self {
            pool: Arc::new(Mutex::new(pool)),
            list_path: cfg.list_path.clone(),
            default_per_page: cfg.default_per_page,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let list_path = state.list_path.clone();

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(&list_path, get(handlers::list))
        .route("/entries", post(handlers::create))
        .route(
            "/entries/{id}",
            get(handlers::show).put(handlers::replace).delete(handlers::delete),
        )
        .route("/entries/{id}/status", patch(handlers::patch_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn check_list_path(path: &str) -> AppResult<()> {
    let reserved = ["/healthz", "/entries"];
    if !path.starts_with('/') || path.contains('{') || reserved.iter().any(|r| path.starts_with(r)) {
        return Err(AppError::Config(format!("list_path {path:?} cannot be routed")));
    }
    Ok(())
}

pub async fn serve(cfg: &Config, addr: &str) -> AppResult<()> {
    check_list_path(&cfg.list_path)?;

    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| AppError::Config(format!("invalid listen address {addr:?}: {e}")))?;

    let pool = DbPool::new(&cfg.database)?;
    let app = router(AppState::new(pool, cfg));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, database = %cfg.database, list_path = %cfg.list_path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_must_be_routable() {
        assert!(check_list_path("/list").is_ok());
        assert!(check_list_path("/overtime/list").is_ok());
        assert!(check_list_path("list").is_err());
        assert!(check_list_path("/entries").is_err());
        assert!(check_list_path("/{x}").is_err());
    }
}
