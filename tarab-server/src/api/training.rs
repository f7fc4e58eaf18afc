//! Training API: start, status polling, stop
//!
//! Progress is advanced as a side effect of every status poll while the
//! latest session is still training. The advance is a read-modify-write
//! against durable state, so it runs under the state's training mutex.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tarab_common::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::songs;
use crate::db::training::{self, TrainingConfig, TrainingStatus};
use crate::error::ApiResult;
use crate::AppState;

/// POST /api/training/start request (all fields optional)
#[derive(Debug, Deserialize, Default)]
pub struct StartTrainingRequest {
    pub epochs: Option<i64>,
    pub learning_rate: Option<f64>,
    pub batch_size: Option<i64>,
}

/// POST /api/training/start response
#[derive(Debug, Serialize)]
pub struct StartTrainingResponse {
    pub success: bool,
    pub session_id: String,
}

/// GET /api/training/status response
///
/// `current_epoch` and `current_loss` are recomputed on every poll and are
/// not persisted.
#[derive(Debug, Serialize)]
pub struct TrainingStatusResponse {
    pub success: bool,
    pub is_training: bool,
    pub status: String,
    pub progress: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_epoch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_epochs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub songs_used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl TrainingStatusResponse {
    /// Snapshot returned before any session has ever been started
    fn not_started() -> Self {
        Self {
            success: true,
            is_training: false,
            status: "not_started".to_string(),
            progress: 0,
            session_id: None,
            current_epoch: None,
            total_epochs: None,
            current_loss: None,
            final_accuracy: None,
            songs_used: None,
            started_at: None,
            completed_at: None,
        }
    }
}

/// POST /api/training/stop response
#[derive(Debug, Serialize)]
pub struct StopTrainingResponse {
    pub success: bool,
    pub status: String,
}

/// POST /api/training/start
///
/// Requires at least one catalog song. Returns the session token.
pub async fn start_training(
    State(state): State<AppState>,
    request: Result<Json<StartTrainingRequest>, JsonRejection>,
) -> ApiResult<Json<StartTrainingResponse>> {
    // A bodyless POST takes the default config; a malformed JSON body is an
    // error in the standard failure shape
    let request = match request {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => StartTrainingRequest::default(),
        Err(rejection) => return Err(crate::error::ApiError::BadRequest(rejection.body_text())),
    };

    let songs_used = songs::count_songs(&state.db).await?;
    if songs_used == 0 {
        return Err(Error::Precondition(
            "Need at least one song to start training".to_string(),
        )
        .into());
    }

    let defaults = TrainingConfig::default();
    let config = TrainingConfig {
        epochs: request.epochs.unwrap_or(defaults.epochs),
        learning_rate: request.learning_rate.unwrap_or(defaults.learning_rate),
        batch_size: request.batch_size.unwrap_or(defaults.batch_size),
    };

    let session_token = Uuid::new_v4().to_string();
    training::insert_session(&state.db, &session_token, &config, songs_used).await?;
    info!(
        session_token = %session_token,
        epochs = config.epochs,
        songs_used,
        "Started training session"
    );

    Ok(Json(StartTrainingResponse {
        success: true,
        session_id: session_token,
    }))
}

/// GET /api/training/status
///
/// Polling a training session advances its progress by a random increment,
/// clamped to 100; the poll that saturates progress marks the session
/// completed and records its final accuracy.
pub async fn training_status(
    State(state): State<AppState>,
) -> ApiResult<Json<TrainingStatusResponse>> {
    // Serialize the advance so concurrent pollers cannot race the
    // read-modify-write
    let _guard = state.training_advance.lock().await;

    let mut session = match training::latest_session(&state.db).await? {
        Some(session) => session,
        None => return Ok(Json(TrainingStatusResponse::not_started())),
    };

    if session.status == TrainingStatus::Training && session.progress < 100 {
        let advanced = (session.progress + state.sampler.progress_increment()).min(100);
        if advanced >= 100 {
            let accuracy = state.sampler.final_accuracy();
            training::complete_session(&state.db, session.id, accuracy).await?;
            info!(
                session_token = %session.session_token,
                final_accuracy = accuracy,
                "Training session completed"
            );
        } else {
            training::advance_progress(&state.db, session.id, advanced).await?;
        }
        // Re-read so the response reflects exactly what was persisted
        session = training::latest_session(&state.db)
            .await?
            .ok_or_else(|| Error::Internal("Training session vanished".to_string()))?;
    }

    let is_training = session.status == TrainingStatus::Training;
    let current_loss = is_training.then(|| state.sampler.current_loss());
    // Epochs is an unvalidated caller knob; widen so progress * epochs
    // cannot overflow (progress is at most 100, so the result fits i64)
    let current_epoch = (session.progress as i128 * session.epochs as i128 / 100) as i64;

    Ok(Json(TrainingStatusResponse {
        success: true,
        is_training,
        status: session.status.as_str().to_string(),
        progress: session.progress,
        session_id: Some(session.session_token),
        current_epoch: Some(current_epoch),
        total_epochs: Some(session.epochs),
        current_loss,
        final_accuracy: session.final_accuracy,
        songs_used: Some(session.songs_used),
        started_at: Some(session.created_at),
        completed_at: session.completed_at,
    }))
}

/// POST /api/training/stop
pub async fn stop_training(State(state): State<AppState>) -> ApiResult<Json<StopTrainingResponse>> {
    let _guard = state.training_advance.lock().await;

    if !training::stop_latest_training(&state.db).await? {
        return Err(Error::Precondition("No training session in progress".to_string()).into());
    }
    info!("Stopped training session");

    Ok(Json(StopTrainingResponse {
        success: true,
        status: TrainingStatus::Stopped.as_str().to_string(),
    }))
}

/// Build training routes
pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/api/training/status", get(training_status))
        .route("/api/training/start", post(start_training))
        .route("/api/training/stop", post(stop_training))
}
