//! Database initialization
//!
//! Creates the database file on first run and brings up the catalog,
//! training and generation tables. Schema creation is idempotent so it is
//! safe to run on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Wait for locks instead of failing immediately
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
///
/// Also called directly by tests against in-memory pools.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_songs_table(pool).await?;
    create_training_sessions_table(pool).await?;
    create_generated_songs_table(pool).await?;
    Ok(())
}

/// Uploaded songs with metadata and the raw audio payload
async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL DEFAULT 'unknown',
            lyrics TEXT NOT NULL,
            maqam TEXT NOT NULL DEFAULT 'unknown',
            style TEXT NOT NULL DEFAULT 'modern',
            tempo INTEGER NOT NULL DEFAULT 120,
            emotion TEXT NOT NULL DEFAULT 'neutral',
            region TEXT NOT NULL DEFAULT 'mixed',
            composer TEXT,
            poem_bahr TEXT,
            filename TEXT,
            file_size INTEGER,
            file_type TEXT,
            audio_data BLOB,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Simulated training runs, one row per started session
async fn create_training_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS training_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_token TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'training',
            progress INTEGER NOT NULL DEFAULT 0,
            epochs INTEGER NOT NULL DEFAULT 25,
            learning_rate REAL NOT NULL DEFAULT 0.001,
            batch_size INTEGER NOT NULL DEFAULT 32,
            songs_used INTEGER NOT NULL DEFAULT 0,
            final_accuracy REAL,
            created_at TEXT NOT NULL,
            completed_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Simulated generation outputs; training_session_id is a free-text label,
/// not a foreign key (mirrors the source data model)
async fn create_generated_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS generated_songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            lyrics TEXT NOT NULL,
            maqam TEXT NOT NULL DEFAULT 'hijaz',
            style TEXT NOT NULL DEFAULT 'modern',
            tempo INTEGER NOT NULL DEFAULT 120,
            emotion TEXT NOT NULL DEFAULT 'neutral',
            region TEXT NOT NULL DEFAULT 'mixed',
            composer TEXT,
            poem_bahr TEXT,
            duration TEXT NOT NULL,
            instruments TEXT NOT NULL,
            creativity INTEGER NOT NULL DEFAULT 50,
            generation_time REAL NOT NULL,
            model_version TEXT NOT NULL,
            training_session_id TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
