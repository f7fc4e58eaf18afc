//! Training tracker: simulated training session persistence
//!
//! State machine per session: `training -> completed` (progress saturates at
//! 100) or `training -> stopped` (explicit stop). Both end states are
//! terminal. Only the most recently created session is ever advanced.

use sqlx::{Row, SqlitePool};
use tarab_common::{Error, Result};

/// Session status stored as TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Training,
    Completed,
    Stopped,
}

impl TrainingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrainingStatus::Training => "training",
            TrainingStatus::Completed => "completed",
            TrainingStatus::Stopped => "stopped",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "training" => Ok(TrainingStatus::Training),
            "completed" => Ok(TrainingStatus::Completed),
            "stopped" => Ok(TrainingStatus::Stopped),
            other => Err(Error::Internal(format!(
                "Unknown training status '{}'",
                other
            ))),
        }
    }
}

/// One simulated training run
#[derive(Debug, Clone)]
pub struct TrainingSession {
    pub id: i64,
    pub session_token: String,
    pub status: TrainingStatus,
    pub progress: i64,
    pub epochs: i64,
    pub learning_rate: f64,
    pub batch_size: i64,
    pub songs_used: i64,
    pub final_accuracy: Option<f64>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

/// Configuration captured at start time, immutable thereafter
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub epochs: i64,
    pub learning_rate: f64,
    pub batch_size: i64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 25,
            learning_rate: 0.001,
            batch_size: 32,
        }
    }
}

/// Insert a fresh session (status `training`, progress 0), returns its id
pub async fn insert_session(
    pool: &SqlitePool,
    session_token: &str,
    config: &TrainingConfig,
    songs_used: i64,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO training_sessions (
            session_token, status, progress, epochs, learning_rate,
            batch_size, songs_used, created_at
        ) VALUES (?, 'training', 0, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session_token)
    .bind(config.epochs)
    .bind(config.learning_rate)
    .bind(config.batch_size)
    .bind(songs_used)
    .bind(crate::db::now_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TrainingSession> {
    Ok(TrainingSession {
        id: row.get("id"),
        session_token: row.get("session_token"),
        status: TrainingStatus::parse(row.get("status"))?,
        progress: row.get("progress"),
        epochs: row.get("epochs"),
        learning_rate: row.get("learning_rate"),
        batch_size: row.get("batch_size"),
        songs_used: row.get("songs_used"),
        final_accuracy: row.get("final_accuracy"),
        created_at: row.get("created_at"),
        completed_at: row.get("completed_at"),
    })
}

/// Most recently created session, if any (autoincrement ids are
/// creation-ordered and tie-free)
pub async fn latest_session(pool: &SqlitePool) -> Result<Option<TrainingSession>> {
    let row = sqlx::query(
        r#"
        SELECT id, session_token, status, progress, epochs, learning_rate,
               batch_size, songs_used, final_accuracy, created_at, completed_at
        FROM training_sessions
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    row.map(|row| session_from_row(&row)).transpose()
}

/// Persist an advanced progress value for a still-training session
pub async fn advance_progress(pool: &SqlitePool, id: i64, progress: i64) -> Result<()> {
    sqlx::query("UPDATE training_sessions SET progress = ? WHERE id = ? AND status = 'training'")
        .bind(progress)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark a session naturally completed: progress 100, accuracy recorded
pub async fn complete_session(pool: &SqlitePool, id: i64, final_accuracy: f64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE training_sessions
        SET status = 'completed', progress = 100, final_accuracy = ?, completed_at = ?
        WHERE id = ? AND status = 'training'
        "#,
    )
    .bind(final_accuracy)
    .bind(crate::db::now_rfc3339())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Stop the most recently created session still in `training` status.
/// Returns false when no such session exists.
pub async fn stop_latest_training(pool: &SqlitePool) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE training_sessions
        SET status = 'stopped', completed_at = ?
        WHERE id = (
            SELECT id FROM training_sessions
            WHERE status = 'training'
            ORDER BY id DESC
            LIMIT 1
        )
        "#,
    )
    .bind(crate::db::now_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Total session count (dashboard)
pub async fn count_sessions(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM training_sessions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
