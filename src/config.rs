//! Server configuration

use serde::{Deserialize, Serialize};
use synced_lyrics_lib::demo::{DEMO_ALBUM, DEMO_ARTWORK, DEMO_TITLE};
use synced_lyrics_lib::ClockConfig;

/// Lyric source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Path to an LRC file. The built-in demo track is used when unset.
    pub source_path: Option<String>,

    /// Track title
    pub title: String,

    /// Album name
    pub album: Option<String>,

    /// Cover art path shown next to the lyrics
    pub artwork: Option<String>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            title: DEMO_TITLE.to_string(),
            album: Some(DEMO_ALBUM.to_string()),
            artwork: Some(DEMO_ARTWORK.to_string()),
        }
    }
}

/// Display session limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of live sessions
    pub max_sessions: usize,

    /// Sessions not accessed for this long are closed and removed
    pub idle_timeout_secs: u64,

    /// How often the eviction task runs
    pub cleanup_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            idle_timeout_secs: 600, // 10 minutes
            cleanup_interval_secs: 60,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,

    /// Lyric source
    pub lyrics: LyricsConfig,

    /// Playback clock cadence and loop length
    pub clock: ClockConfig,

    /// Session limits
    pub sessions: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            lyrics: LyricsConfig::default(),
            clock: ClockConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether logs should be emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.clock.tick_interval_ms, 100);
        assert_eq!(config.clock.loop_duration_ms, 12_000);
        assert_eq!(config.sessions.max_sessions, 100);
        assert!(config.lyrics.source_path.is_none());
        assert_eq!(config.lyrics.title, "In Da Club");
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_json_logs() {
        let mut config = ServerConfig::default();
        assert!(!config.json_logs());
        config.log_format = "JSON".to_string();
        assert!(config.json_logs());
    }
}
