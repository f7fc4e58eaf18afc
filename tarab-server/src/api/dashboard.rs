//! Dashboard API: read-only aggregate statistics over the three stores

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::training::{self, TrainingStatus};
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/dashboard/stats response
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub success: bool,
    pub total_songs: i64,
    pub total_size: i64,
    pub maqams: Vec<String>,
    pub regions: Vec<String>,
    pub total_training_sessions: i64,
    pub total_generated: i64,
    pub is_training: bool,
    pub model_accuracy: f64,
}

/// GET /api/dashboard/stats
///
/// Pure fan-out read; nothing is mutated, not even training progress.
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let total_songs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(&state.db)
        .await
        .map_err(tarab_common::Error::Database)?;

    let total_size: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(file_size), 0) FROM songs")
        .fetch_one(&state.db)
        .await
        .map_err(tarab_common::Error::Database)?;

    let maqams: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT maqam FROM songs ORDER BY maqam")
            .fetch_all(&state.db)
            .await
            .map_err(tarab_common::Error::Database)?;

    let regions: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT region FROM songs ORDER BY region")
            .fetch_all(&state.db)
            .await
            .map_err(tarab_common::Error::Database)?;

    let total_training_sessions = training::count_sessions(&state.db).await?;

    let total_generated: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM generated_songs")
        .fetch_one(&state.db)
        .await
        .map_err(tarab_common::Error::Database)?;

    let latest = training::latest_session(&state.db).await?;
    let is_training = latest
        .as_ref()
        .map(|s| s.status == TrainingStatus::Training)
        .unwrap_or(false);
    let model_accuracy = latest
        .as_ref()
        .and_then(|s| s.final_accuracy)
        .unwrap_or(0.0);

    Ok(Json(DashboardStats {
        success: true,
        total_songs,
        total_size,
        maqams,
        regions,
        total_training_sessions,
        total_generated,
        is_training,
        model_accuracy,
    }))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard/stats", get(dashboard_stats))
}
