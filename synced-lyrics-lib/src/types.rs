//! Core data types: lyric entries, sequences and tracks.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::lrc::{self, ParseStats};

/// One timestamp/text pair derived from a tagged source line.
///
/// The timestamp is held as whole centiseconds so that a parsed
/// `[00:01.47]` compares exactly equal to the literal `1.47`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricEntry {
    centis: u32,
    text: String,
}

impl LyricEntry {
    /// Create an entry from a timestamp in centiseconds.
    pub fn new(centis: u32, text: impl Into<String>) -> Self {
        Self {
            centis,
            text: text.into(),
        }
    }

    /// Create an entry from the `MM`, `SS` and `CC` fields of a tag.
    pub fn from_parts(minutes: u32, seconds: u32, hundredths: u32, text: impl Into<String>) -> Self {
        Self::new(minutes * 6000 + seconds * 100 + hundredths, text)
    }

    /// Timestamp in centiseconds.
    pub fn centis(&self) -> u32 {
        self.centis
    }

    /// Timestamp in seconds.
    pub fn timestamp(&self) -> f64 {
        self.centis as f64 / 100.0
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for LyricEntry {
    /// Render as an LRC line, `[MM:SS.CC] text`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", lrc::format_timestamp(self.centis), self.text)
    }
}

/// Ordered, immutable collection of lyric entries.
///
/// Entries are kept in source order. Nothing checks that timestamps are
/// non-decreasing; selection on out-of-order input follows the first
/// position that satisfies the lookahead rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricSequence {
    entries: Vec<LyricEntry>,
}

impl LyricSequence {
    pub fn new(entries: Vec<LyricEntry>) -> Self {
        Self { entries }
    }

    /// Parse a block of `[MM:SS.CC] text` lines, dropping untagged ones.
    pub fn parse(input: &str) -> Self {
        lrc::parse_lyrics(input)
    }

    /// Like [`LyricSequence::parse`], also reporting how many lines were dropped.
    pub fn parse_with_stats(input: &str) -> (Self, ParseStats) {
        lrc::parse_with_stats(input)
    }

    pub fn entries(&self) -> &[LyricEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&LyricEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LyricEntry> {
        self.entries.iter()
    }

    /// Index of the line that is current at `elapsed` seconds.
    pub fn active_index(&self, elapsed: f64) -> Option<usize> {
        lrc::active_index(&self.entries, elapsed)
    }

    /// The line that is current at `elapsed` seconds.
    pub fn active_entry(&self, elapsed: f64) -> Option<&LyricEntry> {
        self.active_index(elapsed).and_then(|i| self.entries.get(i))
    }

    /// Render the sequence back to LRC text, one line per entry.
    pub fn to_lrc(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<LyricEntry> for LyricSequence {
    fn from_iter<I: IntoIterator<Item = LyricEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LyricSequence {
    type Item = &'a LyricEntry;
    type IntoIter = std::slice::Iter<'a, LyricEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A song with its parsed lyrics and display metadata.
#[derive(Debug, Clone)]
pub struct Track {
    pub title: String,
    pub album: Option<String>,
    /// Path of the cover art shown next to the lyrics
    pub artwork: Option<String>,
    pub lyrics: Arc<LyricSequence>,
}

impl Track {
    /// Build a track by parsing raw LRC text.
    pub fn from_lrc(title: impl Into<String>, input: &str) -> Self {
        let title = title.into();
        let (lyrics, stats) = LyricSequence::parse_with_stats(input);
        tracing::debug!(
            "Parsed lyrics for '{}': {} lines kept, {} dropped",
            title,
            stats.parsed,
            stats.dropped
        );
        Self {
            title,
            album: None,
            artwork: None,
            lyrics: Arc::new(lyrics),
        }
    }

    /// Load and parse an LRC file.
    pub fn from_file<P: AsRef<Path>>(title: impl Into<String>, path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_lrc(title, &content))
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }
}
