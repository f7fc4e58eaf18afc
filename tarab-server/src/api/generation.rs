//! Generation API: synchronous simulated song generation
//!
//! Accepts either JSON or multipart (a UI may upload a lyrics file). There
//! is no asynchronous job: the "generated" row is created and returned
//! within the request.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tarab_common::Error;
use tracing::info;

use crate::db::generated::{self, GeneratedSong, NewGeneratedSong};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Placeholder duration bucket stamped on every generated row
const PLACEHOLDER_DURATION: &str = "3-4 min";

/// Placeholder instrumentation label
const PLACEHOLDER_INSTRUMENTS: &str = "oud, qanun, ney, riq";

/// Default creativity knob (unvalidated)
const DEFAULT_CREATIVITY: i64 = 50;

/// Generation request fields; identical whether they arrive as JSON keys or
/// multipart form fields
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub title: Option<String>,
    pub lyrics: Option<String>,
    pub maqam: Option<String>,
    pub style: Option<String>,
    pub emotion: Option<String>,
    pub region: Option<String>,
    pub composer: Option<String>,
    pub poem_bahr: Option<String>,
    pub creativity: Option<i64>,
    pub training_session_id: Option<String>,
}

/// POST /api/generation/generate response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub song_id: i64,
    pub generation_time: f64,
}

/// GET /api/generation/list response
#[derive(Debug, Serialize)]
pub struct ListGeneratedResponse {
    pub success: bool,
    pub songs: Vec<GeneratedSong>,
}

/// DELETE /api/generation/:id response
#[derive(Debug, Serialize)]
pub struct DeleteGeneratedResponse {
    pub success: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a multipart generation request; `lyrics_file` beats the inline
/// `lyrics` field when both are present
async fn parse_multipart(mut multipart: Multipart) -> ApiResult<GenerateRequest> {
    let mut request = GenerateRequest::default();
    let mut lyrics_file: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("lyrics_file") => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    lyrics_file = Some(text);
                }
            }
            Some("title") => request.title = Some(field.text().await?),
            Some("lyrics") => request.lyrics = Some(field.text().await?),
            Some("maqam") => request.maqam = Some(field.text().await?),
            Some("style") => request.style = Some(field.text().await?),
            Some("emotion") => request.emotion = Some(field.text().await?),
            Some("region") => request.region = Some(field.text().await?),
            Some("composer") => request.composer = Some(field.text().await?),
            Some("poem_bahr") => request.poem_bahr = Some(field.text().await?),
            Some("creativity") => {
                let text = field.text().await?;
                request.creativity = text.trim().parse().ok();
            }
            Some("training_session_id") => {
                request.training_session_id = Some(field.text().await?)
            }
            _ => {}
        }
    }

    if let Some(lyrics) = lyrics_file {
        request.lyrics = Some(lyrics);
    }
    Ok(request)
}

/// POST /api/generation/generate (multipart or JSON)
pub async fn generate_song(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<GenerateResponse>> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let params = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        parse_multipart(multipart).await?
    } else {
        let Json(params) = Json::<GenerateRequest>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        params
    };

    let lyrics = match non_blank(params.lyrics) {
        Some(l) => l,
        None => {
            return Err(Error::Validation(
                "Lyrics are required (inline field or lyrics_file)".to_string(),
            )
            .into())
        }
    };

    // Distinct synthetic title when the caller does not supply one
    let title = match non_blank(params.title) {
        Some(t) => t,
        None => {
            let count = generated::count_generated(&state.db).await?;
            format!("Generated Song {}", count + 1)
        }
    };

    let generation_time = state.sampler.generation_time();
    let new_song = NewGeneratedSong {
        title,
        lyrics,
        maqam: params.maqam.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "hijaz".to_string()),
        style: params.style.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "modern".to_string()),
        tempo: 120,
        emotion: params.emotion.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "neutral".to_string()),
        region: params.region.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "mixed".to_string()),
        composer: non_blank(params.composer),
        poem_bahr: non_blank(params.poem_bahr),
        duration: PLACEHOLDER_DURATION.to_string(),
        instruments: PLACEHOLDER_INSTRUMENTS.to_string(),
        creativity: params.creativity.unwrap_or(DEFAULT_CREATIVITY),
        generation_time,
        training_session_id: non_blank(params.training_session_id),
    };

    let song_id = generated::insert_generated(&state.db, &new_song).await?;
    info!(song_id, generation_time, "Generated song '{}'", new_song.title);

    Ok(Json(GenerateResponse {
        success: true,
        song_id,
        generation_time,
    }))
}

/// GET /api/generation/list
pub async fn list_generated(
    State(state): State<AppState>,
) -> ApiResult<Json<ListGeneratedResponse>> {
    let songs = generated::list_generated(&state.db).await?;
    Ok(Json(ListGeneratedResponse {
        success: true,
        songs,
    }))
}

/// DELETE /api/generation/:id
pub async fn delete_generated(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteGeneratedResponse>> {
    generated::delete_generated(&state.db, id).await?;
    info!(song_id = id, "Deleted generated song");
    Ok(Json(DeleteGeneratedResponse { success: true }))
}

/// Build generation routes
pub fn generation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/generation/generate", post(generate_song))
        .route("/api/generation/list", get(list_generated))
        .route("/api/generation/:id", axum::routing::delete(delete_generated))
}
