//! LRC lyric handling
//!
//! - `[MM:SS.CC] text` line parsing into a `LyricSequence`
//! - Active-line selection for a clock value
//! - Timestamp formatting back to LRC

pub mod parser;
pub mod selector;

pub use parser::{format_timestamp, parse_line, parse_lyrics, parse_with_stats, ParseStats};
pub use selector::{active_index, to_sentinel};
