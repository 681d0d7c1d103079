//! HTTP middleware
//!
//! Request logging and per-route request counting.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::state::AppState;

/// Request logging middleware
pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        info!("{} {} {} in {:?}", method, uri, status, duration);
    } else {
        warn!("{} {} {} in {:?}", method, uri, status, duration);
    }

    response
}

/// Count requests per matched route
pub async fn record_metrics(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    state.metrics.record_request(&endpoint);

    next.run(request).await
}
