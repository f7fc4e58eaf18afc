//! Catalog store: song persistence
//!
//! Owns the `songs` table. Rows carry the uploaded audio payload as a BLOB;
//! list queries deliberately skip the payload and expose only a `has_audio`
//! flag plus size metadata.

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tarab_common::{Error, Result};

/// Full song record including the audio payload
#[derive(Debug, Clone)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    pub maqam: String,
    pub style: String,
    pub tempo: i64,
    pub emotion: String,
    pub region: String,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
    pub filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub audio_data: Option<Vec<u8>>,
    pub created_at: String,
}

/// Song row without the audio payload, for listings
#[derive(Debug, Clone, Serialize)]
pub struct SongOverview {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    pub maqam: String,
    pub style: String,
    pub tempo: i64,
    pub emotion: String,
    pub region: String,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
    pub filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub has_audio: bool,
    pub created_at: String,
}

/// Fields captured at upload time
#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub lyrics: String,
    pub maqam: String,
    pub style: String,
    pub emotion: String,
    pub region: String,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
    pub filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub audio_data: Option<Vec<u8>>,
}

/// Partial update: only present fields change. Audio payload, filename and
/// the legacy artist/tempo columns are never altered by update.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub lyrics: Option<String>,
    pub maqam: Option<String>,
    pub style: Option<String>,
    pub emotion: Option<String>,
    pub region: Option<String>,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
}

/// Audio payload plus the metadata needed to serve a download
#[derive(Debug)]
pub struct AudioDownload {
    pub bytes: Vec<u8>,
    pub file_type: String,
    pub filename: Option<String>,
}

/// Insert a new song, returns the assigned id
pub async fn insert_song(pool: &SqlitePool, song: &NewSong) -> Result<i64> {
    if song.title.trim().is_empty() {
        return Err(Error::Validation("Song title is required".to_string()));
    }
    if song.lyrics.trim().is_empty() {
        return Err(Error::Validation("Song lyrics are required".to_string()));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO songs (
            title, lyrics, maqam, style, emotion, region,
            composer, poem_bahr, filename, file_size, file_type, audio_data,
            created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.lyrics)
    .bind(&song.maqam)
    .bind(&song.style)
    .bind(&song.emotion)
    .bind(&song.region)
    .bind(&song.composer)
    .bind(&song.poem_bahr)
    .bind(&song.filename)
    .bind(song.file_size)
    .bind(&song.file_type)
    .bind(&song.audio_data)
    .bind(crate::db::now_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All songs, newest first, without audio payloads
pub async fn list_songs(pool: &SqlitePool) -> Result<Vec<SongOverview>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, artist, lyrics, maqam, style, tempo, emotion, region,
               composer, poem_bahr, filename, file_size, file_type,
               audio_data IS NOT NULL AND length(audio_data) > 0 AS has_audio,
               created_at
        FROM songs
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| SongOverview {
            id: row.get("id"),
            title: row.get("title"),
            artist: row.get("artist"),
            lyrics: row.get("lyrics"),
            maqam: row.get("maqam"),
            style: row.get("style"),
            tempo: row.get("tempo"),
            emotion: row.get("emotion"),
            region: row.get("region"),
            composer: row.get("composer"),
            poem_bahr: row.get("poem_bahr"),
            filename: row.get("filename"),
            file_size: row.get("file_size"),
            file_type: row.get("file_type"),
            has_audio: row.get::<i64, _>("has_audio") != 0,
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Load one song including its audio payload
pub async fn get_song(pool: &SqlitePool, id: i64) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, artist, lyrics, maqam, style, tempo, emotion, region,
               composer, poem_bahr, filename, file_size, file_type, audio_data,
               created_at
        FROM songs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Song {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        lyrics: row.get("lyrics"),
        maqam: row.get("maqam"),
        style: row.get("style"),
        tempo: row.get("tempo"),
        emotion: row.get("emotion"),
        region: row.get("region"),
        composer: row.get("composer"),
        poem_bahr: row.get("poem_bahr"),
        filename: row.get("filename"),
        file_size: row.get("file_size"),
        file_type: row.get("file_type"),
        audio_data: row.get("audio_data"),
        created_at: row.get("created_at"),
    }))
}

/// Apply a partial update; fields absent from `update` keep their values.
/// Returns the updated row.
pub async fn update_song(pool: &SqlitePool, id: i64, update: &SongUpdate) -> Result<Song> {
    let mut song = get_song(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Song {} not found", id)))?;

    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(Error::Validation("Song title cannot be empty".to_string()));
        }
        song.title = title.clone();
    }
    if let Some(lyrics) = &update.lyrics {
        song.lyrics = lyrics.clone();
    }
    if let Some(maqam) = &update.maqam {
        song.maqam = maqam.clone();
    }
    if let Some(style) = &update.style {
        song.style = style.clone();
    }
    if let Some(emotion) = &update.emotion {
        song.emotion = emotion.clone();
    }
    if let Some(region) = &update.region {
        song.region = region.clone();
    }
    if let Some(composer) = &update.composer {
        song.composer = Some(composer.clone());
    }
    if let Some(poem_bahr) = &update.poem_bahr {
        song.poem_bahr = Some(poem_bahr.clone());
    }

    sqlx::query(
        r#"
        UPDATE songs
        SET title = ?, lyrics = ?, maqam = ?, style = ?, emotion = ?,
            region = ?, composer = ?, poem_bahr = ?
        WHERE id = ?
        "#,
    )
    .bind(&song.title)
    .bind(&song.lyrics)
    .bind(&song.maqam)
    .bind(&song.style)
    .bind(&song.emotion)
    .bind(&song.region)
    .bind(&song.composer)
    .bind(&song.poem_bahr)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(song)
}

/// Delete a song; repeated deletes of the same id fail the same way
pub async fn delete_song(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Song {} not found", id)));
    }
    Ok(())
}

/// Number of catalog rows (training precondition, dashboard)
pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Audio payload for download; NotFound if the row is absent, NoContent if
/// no audio was ever stored
pub async fn fetch_audio(pool: &SqlitePool, id: i64) -> Result<AudioDownload> {
    let song = get_song(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Song {} not found", id)))?;

    match song.audio_data {
        Some(bytes) if !bytes.is_empty() => Ok(AudioDownload {
            bytes,
            file_type: song
                .file_type
                .unwrap_or_else(|| crate::upload::DEFAULT_FILE_TYPE.to_string()),
            filename: song.filename,
        }),
        _ => Err(Error::NoContent(format!(
            "No audio stored for song {}",
            id
        ))),
    }
}

/// Lyrics text for export, paired with the title the filename derives from
pub async fn fetch_lyrics(pool: &SqlitePool, id: i64) -> Result<(String, String)> {
    let song = get_song(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Song {} not found", id)))?;

    if song.lyrics.trim().is_empty() {
        return Err(Error::NotFound(format!("No lyrics stored for song {}", id)));
    }
    Ok((song.title, song.lyrics))
}
