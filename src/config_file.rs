//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section except
//! `[server]` is optional and falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use synced_lyrics_lib::ClockConfig;

use crate::config::{LyricsConfig, ServerConfig, SessionConfig};
use crate::error::{Result, ServerError};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Lyric source settings
    pub lyrics: Option<LyricsSettings>,
    /// Playback clock settings
    pub clock: Option<ClockSettings>,
    /// Session settings
    pub sessions: Option<SessionSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsSettings {
    /// Path to an LRC file
    pub source_path: Option<String>,
    /// Track title
    pub title: Option<String>,
    /// Album name
    pub album: Option<String>,
    /// Cover art path
    pub artwork: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockSettings {
    /// Milliseconds between ticks
    pub tick_interval_ms: Option<u64>,
    /// Milliseconds added per tick
    pub step_ms: Option<u64>,
    /// Loop ceiling in milliseconds
    pub loop_duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Maximum number of live sessions
    pub max_sessions: Option<usize>,
    /// Idle timeout in seconds
    pub idle_timeout_secs: Option<u64>,
    /// Eviction interval in seconds
    pub cleanup_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let lyrics = LyricsConfig::default();
        let clock = ClockConfig::default();
        let sessions = SessionConfig::default();

        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_enabled: Some(true),
            },
            lyrics: Some(LyricsSettings {
                source_path: None,
                title: Some(lyrics.title),
                album: lyrics.album,
                artwork: lyrics.artwork,
            }),
            clock: Some(ClockSettings {
                tick_interval_ms: Some(clock.tick_interval_ms),
                step_ms: Some(clock.step_ms),
                loop_duration_ms: Some(clock.loop_duration_ms),
            }),
            sessions: Some(SessionSettings {
                max_sessions: Some(sessions.max_sessions),
                idle_timeout_secs: Some(sessions.idle_timeout_secs),
                cleanup_interval_secs: Some(sessions.cleanup_interval_secs),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();

        let lyrics = match self.lyrics {
            Some(l) => LyricsConfig {
                source_path: l.source_path,
                title: l.title.unwrap_or(defaults.lyrics.title),
                album: l.album,
                artwork: l.artwork,
            },
            None => defaults.lyrics,
        };

        let clock = match self.clock {
            Some(c) => ClockConfig {
                tick_interval_ms: c.tick_interval_ms.unwrap_or(defaults.clock.tick_interval_ms),
                step_ms: c.step_ms.unwrap_or(defaults.clock.step_ms),
                loop_duration_ms: c.loop_duration_ms.unwrap_or(defaults.clock.loop_duration_ms),
            },
            None => defaults.clock,
        };

        let sessions = match self.sessions {
            Some(s) => SessionConfig {
                max_sessions: s.max_sessions.unwrap_or(defaults.sessions.max_sessions),
                idle_timeout_secs: s
                    .idle_timeout_secs
                    .unwrap_or(defaults.sessions.idle_timeout_secs),
                cleanup_interval_secs: s
                    .cleanup_interval_secs
                    .unwrap_or(defaults.sessions.cleanup_interval_secs),
            },
            None => defaults.sessions,
        };

        let (log_level, log_format) = match self.logging {
            Some(l) => (
                l.level,
                l.format.unwrap_or_else(|| defaults.log_format.clone()),
            ),
            None => (defaults.log_level, defaults.log_format),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level,
            log_format,
            lyrics,
            clock,
            sessions,
        }
    }
}

/// Load the server configuration from `path`.
///
/// A missing file yields the defaults. A file that fails to parse, or whose
/// `[clock]` section is invalid, also yields the defaults, and the error is
/// returned alongside so it can be logged once logging is up.
pub fn load_config<P: AsRef<Path>>(path: P) -> (ServerConfig, Option<ServerError>) {
    if !path.as_ref().exists() {
        return (ServerConfig::default(), None);
    }
    let config = match ConfigFile::from_file(path) {
        Ok(cf) => cf.into_server_config(),
        Err(e) => return (ServerConfig::default(), Some(e)),
    };
    match config.clock.validate() {
        Ok(()) => (config, None),
        Err(e) => (
            ServerConfig::default(),
            Some(ServerError::Config(format!("[clock] {}", e))),
        ),
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
