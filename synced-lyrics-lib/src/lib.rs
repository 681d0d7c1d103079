//! Synced lyrics core
//!
//! Parses `[MM:SS.CC]` tagged lyric text, selects the active line for a
//! clock value, and drives a looping playback clock that only runs while
//! its display surface is in view.

pub mod clock;
pub mod demo;
pub(crate) mod error;
pub mod lrc;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use clock::{ClockConfig, ClockState, PlaybackClock, TickOutcome};
pub use demo::demo_track;
pub use error::{LyricsError, Result};
pub use lrc::{active_index, parse_lyrics, to_sentinel, ParseStats};
pub use session::{DisplaySession, SessionSnapshot};
pub use types::{LyricEntry, LyricSequence, Track};
