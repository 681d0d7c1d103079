//! Lyric endpoints
//!
//! Read-only views of the loaded track: metadata, parsed lines, LRC text,
//! and active-line lookups for an arbitrary clock value.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use synced_lyrics_lib::lrc::format_timestamp;
use synced_lyrics_lib::to_sentinel;

use crate::state::AppState;

/// One parsed lyric line
#[derive(Debug, Serialize)]
pub struct LyricLine {
    pub index: usize,
    /// Seconds from the start of the loop
    pub timestamp: f64,
    /// The `MM:SS.CC` tag
    pub tag: String,
    pub text: String,
}

/// Track metadata and parsed lines
#[derive(Debug, Serialize)]
pub struct LyricsResponse {
    pub title: String,
    pub album: Option<String>,
    pub artwork: Option<String>,
    pub loop_duration_secs: f64,
    pub line_count: usize,
    pub lines: Vec<LyricLine>,
}

/// Query parameters for an active-line lookup
#[derive(Debug, Deserialize)]
pub struct ActiveLineQuery {
    /// Clock value in seconds
    pub t: f64,
}

/// Active-line lookup result
#[derive(Debug, Serialize)]
pub struct ActiveLineResponse {
    pub elapsed_secs: f64,
    pub active_index: Option<usize>,
    /// `active_index` with -1 for "no line"
    pub active_sentinel: i64,
    pub text: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Version information endpoint
pub async fn version_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "online",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Track metadata and parsed lines
/// GET /lyrics
pub async fn get_lyrics(State(state): State<Arc<AppState>>) -> Json<LyricsResponse> {
    let track = &state.track;
    let lines = track
        .lyrics
        .iter()
        .enumerate()
        .map(|(index, entry)| LyricLine {
            index,
            timestamp: entry.timestamp(),
            tag: format_timestamp(entry.centis()),
            text: entry.text().to_string(),
        })
        .collect::<Vec<_>>();

    Json(LyricsResponse {
        title: track.title.clone(),
        album: track.album.clone(),
        artwork: track.artwork.clone(),
        loop_duration_secs: state.config.clock.loop_duration_secs(),
        line_count: lines.len(),
        lines,
    })
}

/// Lyrics rendered back to LRC text
/// GET /lyrics.lrc
pub async fn get_lyrics_lrc(State(state): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("max-age=3600"),
    );

    (headers, state.track.lyrics.to_lrc()).into_response()
}

/// Active line for an arbitrary clock value
/// GET /lyrics/active?t=<secs>
pub async fn active_line(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActiveLineQuery>,
) -> Json<ActiveLineResponse> {
    let lyrics = &state.track.lyrics;
    let active_index = lyrics.active_index(query.t);

    Json(ActiveLineResponse {
        elapsed_secs: query.t,
        active_index,
        active_sentinel: to_sentinel(active_index),
        text: active_index
            .and_then(|i| lyrics.get(i))
            .map(|e| e.text().to_string()),
    })
}
