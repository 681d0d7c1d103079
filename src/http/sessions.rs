//! Display session handlers
//!
//! Handles session creation, listing, visibility reports and deletion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use synced_lyrics_lib::{DisplaySession, SessionSnapshot};

use crate::error::ServerError;
use crate::state::AppState;

/// Visibility report from the display surface
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

/// Response after creating a session
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// Unique session identifier
    pub session_id: String,
    /// Path to poll for snapshots
    pub snapshot_url: String,
    /// Path to post visibility reports to
    pub visibility_url: String,
    /// Initial state
    pub snapshot: SessionSnapshot,
}

/// List of live sessions
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub count: usize,
    pub sessions: Vec<SessionInfo>,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    /// RFC 3339 creation time
    pub created_at: String,
    pub idle_secs: u64,
    pub snapshot: SessionSnapshot,
}

impl SessionInfo {
    fn from_session(session: &DisplaySession) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at().to_rfc3339(),
            idle_secs: session.idle_secs(),
            snapshot: session.peek_snapshot(),
        }
    }
}

/// Query parameters for session listing
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn record_error(state: &AppState, err: ServerError) -> ServerError {
    state.metrics.record_error(err.kind());
    err
}

/// Create a new display session
/// POST /sessions
pub async fn create_session(State(state): State<Arc<AppState>>) -> Response {
    match state.create_session() {
        Ok(session) => {
            let id = session.id().to_string();
            let response = CreateSessionResponse {
                snapshot_url: format!("/sessions/{}", id),
                visibility_url: format!("/sessions/{}/visibility", id),
                snapshot: session.snapshot(),
                session_id: id,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => record_error(&state, e).into_response(),
    }
}

/// List all live sessions
/// GET /sessions
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionListQuery>,
) -> Json<SessionListResponse> {
    let mut sessions: Vec<_> = state
        .sessions
        .iter()
        .map(|r| SessionInfo::from_session(r.value()))
        .collect();
    sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let total = sessions.len();

    // Apply pagination
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(total);
    let sessions: Vec<_> = sessions.into_iter().skip(offset).take(limit).collect();

    Json(SessionListResponse {
        count: sessions.len(),
        sessions,
    })
}

/// Get session details
/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfo>, ServerError> {
    let session = state
        .get_session_or_error(&session_id)
        .map_err(|e| record_error(&state, e))?;
    session.touch();
    Ok(Json(SessionInfo::from_session(&session)))
}

/// Report display surface visibility
/// POST /sessions/{id}/visibility
pub async fn set_visibility(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<VisibilityRequest>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    let snapshot = state
        .set_visibility(&session_id, request.visible)
        .map_err(|e| record_error(&state, e))?;
    Ok(Json(snapshot))
}

/// Delete a session
/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .remove_session(&session_id)
        .ok_or_else(|| record_error(&state, ServerError::SessionNotFound(session_id)))?;
    Ok(StatusCode::NO_CONTENT)
}
