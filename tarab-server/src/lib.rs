//! tarab-server library interface
//!
//! Exposes the application state and router so integration tests can drive
//! the HTTP surface without binding a socket.

pub mod api;
pub mod db;
pub mod error;
pub mod sim;
pub mod upload;

pub use crate::error::{ApiError, ApiResult};
pub use crate::sim::Sampler;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Maximum request body size: audio uploads are buffered fully in memory
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Randomness source for simulated training/generation (seedable in tests)
    pub sampler: Sampler,
    /// Serializes the poll-driven progress advance, which is a
    /// read-modify-write against shared durable state
    pub training_advance: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, sampler: Sampler) -> Self {
        Self {
            db,
            sampler,
            training_advance: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::song_routes())
        .merge(api::training_routes())
        .merge(api::generation_routes())
        .merge(api::dashboard_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
