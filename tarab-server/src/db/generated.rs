//! Generation log: simulated generation output persistence
//!
//! Rows are always created in a terminal "done" state and never updated.
//! `training_session_id` is a free-text label carried over from the request,
//! not an enforced reference.

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tarab_common::{Error, Result};

/// Model version tag stamped on every generated row
pub const MODEL_VERSION: &str = "tarab-sim-1";

/// One simulated generation result
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSong {
    pub id: i64,
    pub title: String,
    pub lyrics: String,
    pub maqam: String,
    pub style: String,
    pub tempo: i64,
    pub emotion: String,
    pub region: String,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
    pub duration: String,
    pub instruments: String,
    pub creativity: i64,
    pub generation_time: f64,
    pub model_version: String,
    pub training_session_id: Option<String>,
    pub created_at: String,
}

/// Fields captured from a generation request
#[derive(Debug, Clone)]
pub struct NewGeneratedSong {
    pub title: String,
    pub lyrics: String,
    pub maqam: String,
    pub style: String,
    pub tempo: i64,
    pub emotion: String,
    pub region: String,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
    pub duration: String,
    pub instruments: String,
    pub creativity: i64,
    pub generation_time: f64,
    pub training_session_id: Option<String>,
}

/// Insert a generated song, returns the assigned id
pub async fn insert_generated(pool: &SqlitePool, song: &NewGeneratedSong) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO generated_songs (
            title, lyrics, maqam, style, tempo, emotion, region,
            composer, poem_bahr, duration, instruments, creativity,
            generation_time, model_version, training_session_id, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.lyrics)
    .bind(&song.maqam)
    .bind(&song.style)
    .bind(song.tempo)
    .bind(&song.emotion)
    .bind(&song.region)
    .bind(&song.composer)
    .bind(&song.poem_bahr)
    .bind(&song.duration)
    .bind(&song.instruments)
    .bind(song.creativity)
    .bind(song.generation_time)
    .bind(MODEL_VERSION)
    .bind(&song.training_session_id)
    .bind(crate::db::now_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

fn generated_from_row(row: &sqlx::sqlite::SqliteRow) -> GeneratedSong {
    GeneratedSong {
        id: row.get("id"),
        title: row.get("title"),
        lyrics: row.get("lyrics"),
        maqam: row.get("maqam"),
        style: row.get("style"),
        tempo: row.get("tempo"),
        emotion: row.get("emotion"),
        region: row.get("region"),
        composer: row.get("composer"),
        poem_bahr: row.get("poem_bahr"),
        duration: row.get("duration"),
        instruments: row.get("instruments"),
        creativity: row.get("creativity"),
        generation_time: row.get("generation_time"),
        model_version: row.get("model_version"),
        training_session_id: row.get("training_session_id"),
        created_at: row.get("created_at"),
    }
}

/// All generated songs, newest first
pub async fn list_generated(pool: &SqlitePool) -> Result<Vec<GeneratedSong>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, lyrics, maqam, style, tempo, emotion, region,
               composer, poem_bahr, duration, instruments, creativity,
               generation_time, model_version, training_session_id, created_at
        FROM generated_songs
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(generated_from_row).collect())
}

/// Load one generated song
pub async fn get_generated(pool: &SqlitePool, id: i64) -> Result<Option<GeneratedSong>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, lyrics, maqam, style, tempo, emotion, region,
               composer, poem_bahr, duration, instruments, creativity,
               generation_time, model_version, training_session_id, created_at
        FROM generated_songs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(generated_from_row))
}

/// Delete a generated song
pub async fn delete_generated(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM generated_songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Generated song {} not found", id)));
    }
    Ok(())
}

/// Number of generated rows (title synthesis, dashboard)
pub async fn count_generated(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM generated_songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        tarab_common::db::create_tables(&pool)
            .await
            .expect("Failed to create tables");
        pool
    }

    fn sample_generated(title: &str) -> NewGeneratedSong {
        NewGeneratedSong {
            title: title.to_string(),
            lyrics: "qamaron sidra".to_string(),
            maqam: "hijaz".to_string(),
            style: "modern".to_string(),
            tempo: 120,
            emotion: "neutral".to_string(),
            region: "mixed".to_string(),
            composer: None,
            poem_bahr: None,
            duration: "3-4 min".to_string(),
            instruments: "oud, qanun, ney, riq".to_string(),
            creativity: 50,
            generation_time: 3.3,
            training_session_id: Some("some-token".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_list_and_get() {
        let pool = setup_pool().await;

        let a = insert_generated(&pool, &sample_generated("A")).await.unwrap();
        let b = insert_generated(&pool, &sample_generated("B")).await.unwrap();

        let songs = list_generated(&pool).await.unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].id, b);
        assert_eq!(songs[1].id, a);
        assert_eq!(songs[0].model_version, MODEL_VERSION);

        let song = get_generated(&pool, a).await.unwrap().expect("Missing row");
        assert_eq!(song.title, "A");
        assert_eq!(song.generation_time, 3.3);
        assert_eq!(song.training_session_id, Some("some-token".to_string()));
    }

    #[tokio::test]
    async fn test_delete_generated() {
        let pool = setup_pool().await;
        let id = insert_generated(&pool, &sample_generated("Gone")).await.unwrap();

        delete_generated(&pool, id).await.unwrap();
        assert_eq!(count_generated(&pool).await.unwrap(), 0);

        let err = delete_generated(&pool, id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
