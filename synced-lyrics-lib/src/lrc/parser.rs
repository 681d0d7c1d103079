//! Timestamp parser for `[MM:SS.CC] text` lyric lines.
//!
//! Parsing is permissive: a line without a well-formed tag is dropped and
//! never reported as an error.

use crate::types::{LyricEntry, LyricSequence};

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Counts collected while parsing a lyric block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines that produced an entry
    pub parsed: usize,
    /// Non-blank lines without a valid tag
    pub dropped: usize,
}

/// Parse a single line. Returns `None` if the line has no valid tag.
///
/// MM, SS and CC must each be exactly two ASCII digits. The text is
/// everything after the tag and any whitespace following it, verbatim.
/// SS is not range checked, so `[00:75.00]` means 75 seconds.
pub fn parse_line(line: &str) -> Option<LyricEntry> {
    let caps = regex!(r"^\s*\[([0-9]{2}):([0-9]{2})\.([0-9]{2})\]\s*(.*)$").captures(line)?;

    // Two ASCII digits always fit in a u32.
    let minutes: u32 = caps[1].parse().ok()?;
    let seconds: u32 = caps[2].parse().ok()?;
    let hundredths: u32 = caps[3].parse().ok()?;

    Some(LyricEntry::from_parts(minutes, seconds, hundredths, &caps[4]))
}

/// Parse a lyric block into a sequence, preserving line order.
pub fn parse_lyrics(input: &str) -> LyricSequence {
    input.trim().lines().filter_map(parse_line).collect()
}

/// Parse a lyric block and report how many lines were kept and dropped.
pub fn parse_with_stats(input: &str) -> (LyricSequence, ParseStats) {
    let mut stats = ParseStats::default();
    let mut entries = Vec::new();

    for line in input.trim().lines() {
        match parse_line(line) {
            Some(entry) => {
                stats.parsed += 1;
                entries.push(entry);
            }
            None if line.trim().is_empty() => {}
            None => {
                tracing::trace!("Dropping untagged lyric line: {:?}", line);
                stats.dropped += 1;
            }
        }
    }

    (LyricSequence::new(entries), stats)
}

/// Format centiseconds as `MM:SS.CC`.
pub fn format_timestamp(centis: u32) -> String {
    let cs = centis % 100;
    let total_s = centis / 100;
    let s = total_s % 60;
    let m = total_s / 60;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}
