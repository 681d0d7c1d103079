//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - The track whose lyrics every session plays
//! - Live display sessions
//! - Metrics
//! - Server configuration

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use synced_lyrics_lib::{demo_track, DisplaySession, SessionSnapshot, Track};

use crate::config::{LyricsConfig, ServerConfig};
use crate::error::{Result, ServerError};
use crate::metrics::Metrics;

/// Application state shared across all handlers
pub struct AppState {
    /// Live sessions (session_id -> DisplaySession)
    pub sessions: DashMap<String, Arc<DisplaySession>>,

    /// Track served to every session
    pub track: Arc<Track>,

    /// Request and session counters
    pub metrics: Metrics,

    /// Server shutdown flag
    pub shutdown: AtomicBool,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState, loading the configured lyric source
    pub fn new(config: ServerConfig) -> Self {
        let track = load_track(&config.lyrics);
        Self::with_track(config, track)
    }

    /// Create an AppState around an already loaded track
    pub fn with_track(config: ServerConfig, track: Track) -> Self {
        Self {
            sessions: DashMap::new(),
            track: Arc::new(track),
            metrics: Metrics::new(),
            shutdown: AtomicBool::new(false),
            config,
        }
    }

    /// Create AppState with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// Create an idle display session for the current track
    pub fn create_session(&self) -> Result<Arc<DisplaySession>> {
        if self.is_shutdown() {
            return Err(ServerError::Internal("server is shutting down".to_string()));
        }
        let limit = self.config.sessions.max_sessions;
        if self.sessions.len() >= limit {
            return Err(ServerError::SessionLimit(limit));
        }

        let session = Arc::new(DisplaySession::new(
            Arc::clone(&self.track.lyrics),
            self.config.clock.clone(),
        )?);
        self.sessions
            .insert(session.id().to_string(), Arc::clone(&session));
        self.metrics.record_session_created();

        tracing::info!("Created display session {}", session.id());
        Ok(session)
    }

    /// Get a session by ID
    pub fn get_session(&self, session_id: &str) -> Option<Arc<DisplaySession>> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Get a session by ID or a not-found error
    pub fn get_session_or_error(&self, session_id: &str) -> Result<Arc<DisplaySession>> {
        self.get_session(session_id)
            .ok_or_else(|| ServerError::SessionNotFound(session_id.to_string()))
    }

    /// Remove and close a session
    pub fn remove_session(&self, session_id: &str) -> Option<Arc<DisplaySession>> {
        let (_, session) = self.sessions.remove(session_id)?;
        session.close();
        self.metrics.record_sessions_closed(1);
        tracing::info!("Removed display session {}", session_id);
        Some(session)
    }

    /// Forward a visibility report to a session
    pub fn set_visibility(&self, session_id: &str, visible: bool) -> Result<SessionSnapshot> {
        let session = self.get_session_or_error(session_id)?;
        let snapshot = session.set_visible(visible)?;
        self.metrics.record_visibility(visible);
        Ok(snapshot)
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Signal shutdown and close every session
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);

        let ids: Vec<String> = self.sessions.iter().map(|r| r.key().clone()).collect();
        for id in &ids {
            self.remove_session(id);
        }
        tracing::info!("Closed {} session(s) on shutdown", ids.len());
    }

    /// Check if shutdown is requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Remove sessions idle past the configured timeout.
    /// Returns number of removed sessions
    pub fn cleanup_expired_sessions(&self) -> usize {
        let timeout = self.config.sessions.idle_timeout_secs;

        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().idle_secs() > timeout)
            .map(|entry| entry.key().clone())
            .collect();

        expired
            .iter()
            .filter(|id| self.remove_session(id).is_some())
            .count()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Load the configured lyric source, falling back to the demo track
pub fn load_track(config: &LyricsConfig) -> Track {
    let Some(path) = &config.source_path else {
        let mut track = demo_track();
        track.title = config.title.clone();
        track.album = config.album.clone();
        track.artwork = config.artwork.clone();
        return track;
    };

    match Track::from_file(config.title.clone(), path) {
        Ok(mut track) => {
            track.album = config.album.clone();
            track.artwork = config.artwork.clone();
            if track.lyrics.is_empty() {
                tracing::warn!("No timestamped lines found in {}", path);
            }
            tracing::info!(
                "Loaded {} lyric lines for '{}' from {}",
                track.lyrics.len(),
                track.title,
                path
            );
            track
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load lyrics from {}: {}. Using demo track.",
                path,
                e
            );
            demo_track()
        }
    }
}
