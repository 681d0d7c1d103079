//! HTTP server module
//!
//! This module exposes lyric playback to renderers over HTTP:
//! - Axum router with all endpoints
//! - Lyric and active-line handlers
//! - Display session management (create, list, visibility, delete)
//! - Request logging and metrics middleware
//! - CORS middleware

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod sessions;

pub use routes::create_router;
