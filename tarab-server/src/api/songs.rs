//! Catalog API: upload, list, update, delete, audio/lyrics download

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::header,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tarab_common::Error;
use tracing::info;

use crate::db::songs::{self, NewSong, SongOverview, SongUpdate};
use crate::error::{ApiError, ApiResult};
use crate::upload::{check_allowed_extension, file_type_of, sanitize_filename};
use crate::AppState;

/// POST /api/songs/upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub song_id: i64,
    pub file_size: Option<i64>,
}

/// GET /api/songs/list response
#[derive(Debug, Serialize)]
pub struct ListSongsResponse {
    pub success: bool,
    pub songs: Vec<SongOverview>,
}

/// PUT /api/songs/:id response
#[derive(Debug, Serialize)]
pub struct UpdateSongResponse {
    pub success: bool,
    pub song_id: i64,
}

/// DELETE /api/songs/:id response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Blank form fields fall back to the column default
fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Optional form fields stay absent when blank
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/songs/upload (multipart)
///
/// Fields: `audio_file`, `lyrics_file`, `title`, `lyrics`, `composer`,
/// `maqam`, `style`, `emotion`, `region`, `poem_bahr`. Lyrics come from the
/// file when both the file and the inline field are present.
pub async fn upload_song(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut title: Option<String> = None;
    let mut inline_lyrics: Option<String> = None;
    let mut lyrics_file: Option<String> = None;
    let mut composer: Option<String> = None;
    let mut maqam: Option<String> = None;
    let mut style: Option<String> = None;
    let mut emotion: Option<String> = None;
    let mut region: Option<String> = None;
    let mut poem_bahr: Option<String> = None;
    let mut audio_bytes: Option<Vec<u8>> = None;
    let mut audio_filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio_file") => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if !bytes.is_empty() {
                    audio_filename = filename;
                    audio_bytes = Some(bytes.to_vec());
                }
            }
            Some("lyrics_file") => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    lyrics_file = Some(text);
                }
            }
            Some("title") => title = Some(field.text().await?),
            Some("lyrics") => inline_lyrics = Some(field.text().await?),
            Some("composer") => composer = Some(field.text().await?),
            Some("maqam") => maqam = Some(field.text().await?),
            Some("style") => style = Some(field.text().await?),
            Some("emotion") => emotion = Some(field.text().await?),
            Some("region") => region = Some(field.text().await?),
            Some("poem_bahr") => poem_bahr = Some(field.text().await?),
            _ => {}
        }
    }

    let title = match non_blank(title) {
        Some(t) => t,
        None => return Err(Error::Validation("Song title is required".to_string()).into()),
    };

    // Lyrics file takes precedence over the inline field
    let lyrics = match lyrics_file.or_else(|| non_blank(inline_lyrics)) {
        Some(l) => l,
        None => return Err(Error::Validation("Song lyrics are required".to_string()).into()),
    };

    let (filename, file_size, file_type, audio_data) = match audio_bytes {
        Some(bytes) => {
            let raw_name = audio_filename.as_deref().unwrap_or("upload.mp3");
            check_allowed_extension(raw_name)?;
            let safe_name = sanitize_filename(raw_name);
            let file_type = file_type_of(&safe_name);
            let size = bytes.len() as i64;
            (Some(safe_name), Some(size), Some(file_type), Some(bytes))
        }
        None => (None, None, None, None),
    };

    let new_song = NewSong {
        title,
        lyrics,
        maqam: or_default(maqam, "unknown"),
        style: or_default(style, "modern"),
        emotion: or_default(emotion, "neutral"),
        region: or_default(region, "mixed"),
        composer: non_blank(composer),
        poem_bahr: non_blank(poem_bahr),
        filename,
        file_size,
        file_type,
        audio_data,
    };

    let song_id = songs::insert_song(&state.db, &new_song).await?;
    info!(song_id, file_size = ?new_song.file_size, "Uploaded song '{}'", new_song.title);

    Ok(Json(UploadResponse {
        success: true,
        song_id,
        file_size: new_song.file_size,
    }))
}

/// GET /api/songs/list
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<ListSongsResponse>> {
    let songs = songs::list_songs(&state.db).await?;
    Ok(Json(ListSongsResponse {
        success: true,
        songs,
    }))
}

/// PUT /api/songs/:id (JSON partial fields)
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    update: Result<Json<SongUpdate>, JsonRejection>,
) -> ApiResult<Json<UpdateSongResponse>> {
    // Malformed bodies surface in the standard failure shape, not axum's
    // plain-text rejection
    let Json(update) = update.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let song = songs::update_song(&state.db, id, &update).await?;
    info!(song_id = song.id, "Updated song metadata");
    Ok(Json(UpdateSongResponse {
        success: true,
        song_id: song.id,
    }))
}

/// DELETE /api/songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    songs::delete_song(&state.db, id).await?;
    info!(song_id = id, "Deleted song");
    Ok(Json(DeleteResponse { success: true }))
}

/// GET /api/songs/:id/download_audio
///
/// Returns the stored bytes unchanged with an attachment disposition.
pub async fn download_audio(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let download = songs::fetch_audio(&state.db, id).await?;
    let filename = download
        .filename
        .unwrap_or_else(|| format!("song_{}.{}", id, download.file_type));

    let response = Response::builder()
        .header(header::CONTENT_TYPE, format!("audio/{}", download.file_type))
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(download.bytes))
        .map_err(|e| ApiError::Other(anyhow::anyhow!(e)))?;

    Ok(response)
}

/// GET /api/songs/:id/download_lyrics
///
/// Plain-text export named after the song title.
pub async fn download_lyrics(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let (title, lyrics) = songs::fetch_lyrics(&state.db, id).await?;
    let filename = format!("{}_lyrics.txt", sanitize_filename(&title));

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(lyrics))
        .map_err(|e| ApiError::Other(anyhow::anyhow!(e)))?;

    Ok(response)
}

/// Build catalog routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs/upload", post(upload_song))
        .route("/api/songs/list", get(list_songs))
        .route("/api/songs/:id", put(update_song).delete(delete_song))
        .route("/api/songs/:id/download_audio", get(download_audio))
        .route("/api/songs/:id/download_lyrics", get(download_lyrics))
}
