//! Axum router configuration

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::metrics::metrics_handler;
use crate::state::AppState;

use super::handlers::{active_line, get_lyrics, get_lyrics_lrc, health_check, version_check};
use super::middleware::{record_metrics, request_logger};
use super::sessions::{create_session, delete_session, get_session, list_sessions, set_visibility};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        .route("/metrics", get(metrics_handler))
        // Lyrics
        .route("/lyrics", get(get_lyrics))
        .route("/lyrics.lrc", get(get_lyrics_lrc))
        .route("/lyrics/active", get(active_line))
        // Display sessions
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/visibility", post(set_visibility))
        // Middleware
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            record_metrics,
        ))
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http());

    let router = if state.config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
            .max_age(Duration::from_secs(3600));
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
