use thiserror::Error;

/// Main error type for the synced-lyrics library
#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid clock configuration: {0}")]
    InvalidClock(String),

    #[error("Session closed: {0}")]
    SessionClosed(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LyricsError>;
