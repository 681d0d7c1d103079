//! Prometheus-compatible metrics endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::state::AppState;

/// Metrics collector
#[derive(Debug)]
pub struct Metrics {
    /// Server start time
    start_time: Instant,
    /// Total requests processed
    request_count: RwLock<u64>,
    /// Requests by matched route
    requests_by_endpoint: RwLock<HashMap<String, u64>>,
    /// Sessions created
    sessions_created: RwLock<u64>,
    /// Sessions closed (deleted, evicted or shut down)
    sessions_closed: RwLock<u64>,
    /// Visibility edge events by direction
    visibility_events: RwLock<HashMap<&'static str, u64>>,
    /// Errors by type
    errors_by_type: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            request_count: RwLock::new(0),
            requests_by_endpoint: RwLock::new(HashMap::new()),
            sessions_created: RwLock::new(0),
            sessions_closed: RwLock::new(0),
            visibility_events: RwLock::new(HashMap::new()),
            errors_by_type: RwLock::new(HashMap::new()),
        }
    }

    /// Record a request
    pub fn record_request(&self, endpoint: &str) {
        *self.request_count.write() += 1;
        *self
            .requests_by_endpoint
            .write()
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_session_created(&self) {
        *self.sessions_created.write() += 1;
    }

    pub fn record_sessions_closed(&self, count: u64) {
        *self.sessions_closed.write() += count;
    }

    /// Record a visibility report
    pub fn record_visibility(&self, visible: bool) {
        let direction = if visible { "enter" } else { "leave" };
        *self.visibility_events.write().entry(direction).or_insert(0) += 1;
    }

    /// Record error
    pub fn record_error(&self, error_type: &str) {
        *self
            .errors_by_type
            .write()
            .entry(error_type.to_string())
            .or_insert(0) += 1;
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self, active_sessions: usize) -> String {
        let mut output = String::new();

        output.push_str("# HELP lyrics_server_uptime_seconds Server uptime in seconds\n");
        output.push_str("# TYPE lyrics_server_uptime_seconds counter\n");
        output.push_str(&format!(
            "lyrics_server_uptime_seconds {}\n",
            self.uptime_secs()
        ));

        output.push_str("\n# HELP lyrics_requests_total Total number of HTTP requests\n");
        output.push_str("# TYPE lyrics_requests_total counter\n");
        output.push_str(&format!(
            "lyrics_requests_total {}\n",
            *self.request_count.read()
        ));

        output.push_str("\n# HELP lyrics_requests_by_endpoint Requests by endpoint\n");
        output.push_str("# TYPE lyrics_requests_by_endpoint counter\n");
        for (endpoint, count) in self.requests_by_endpoint.read().iter() {
            output.push_str(&format!(
                "lyrics_requests_by_endpoint{{endpoint=\"{}\"}} {}\n",
                endpoint, count
            ));
        }

        output.push_str("\n# HELP lyrics_active_sessions Number of live display sessions\n");
        output.push_str("# TYPE lyrics_active_sessions gauge\n");
        output.push_str(&format!("lyrics_active_sessions {}\n", active_sessions));

        output.push_str("\n# HELP lyrics_sessions_created_total Display sessions created\n");
        output.push_str("# TYPE lyrics_sessions_created_total counter\n");
        output.push_str(&format!(
            "lyrics_sessions_created_total {}\n",
            *self.sessions_created.read()
        ));

        output.push_str("\n# HELP lyrics_sessions_closed_total Display sessions closed\n");
        output.push_str("# TYPE lyrics_sessions_closed_total counter\n");
        output.push_str(&format!(
            "lyrics_sessions_closed_total {}\n",
            *self.sessions_closed.read()
        ));

        output.push_str("\n# HELP lyrics_visibility_events_total Visibility reports by direction\n");
        output.push_str("# TYPE lyrics_visibility_events_total counter\n");
        for (direction, count) in self.visibility_events.read().iter() {
            output.push_str(&format!(
                "lyrics_visibility_events_total{{direction=\"{}\"}} {}\n",
                direction, count
            ));
        }

        output.push_str("\n# HELP lyrics_errors_total Total errors by type\n");
        output.push_str("# TYPE lyrics_errors_total counter\n");
        for (error_type, count) in self.errors_by_type.read().iter() {
            output.push_str(&format!(
                "lyrics_errors_total{{type=\"{}\"}} {}\n",
                error_type, count
            ));
        }

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics endpoint handler
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let prometheus_output = state.metrics.export_prometheus(state.session_count());

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        prometheus_output,
    )
        .into_response()
}
