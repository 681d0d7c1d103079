//! Server-specific error types

use synced_lyrics_lib::LyricsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Library error: {0}")]
    Library(#[from] LyricsError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session limit reached ({0} active)")]
    SessionLimit(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Short label used for error metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Library(LyricsError::SessionClosed(_)) => "session_closed",
            ServerError::Library(_) => "library",
            ServerError::SessionNotFound(_) => "session_not_found",
            ServerError::SessionLimit(_) => "session_limit",
            ServerError::Config(_) => "config",
            ServerError::Internal(_) => "internal",
            ServerError::Io(_) => "io",
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Library(LyricsError::SessionClosed(_)) => StatusCode::GONE,
            ServerError::SessionLimit(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::warn!("{}", self);
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::SessionNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ServerError::Library(LyricsError::SessionClosed("x".into())),
                StatusCode::GONE,
            ),
            (ServerError::SessionLimit(5), StatusCode::SERVICE_UNAVAILABLE),
            (
                ServerError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_kind() {
        assert_eq!(ServerError::SessionLimit(1).kind(), "session_limit");
        assert_eq!(
            ServerError::Library(LyricsError::InvalidClock("x".into())).kind(),
            "library"
        );
    }
}
