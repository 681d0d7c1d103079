//! Built-in demo track shown on the landing page lyrics section.

use crate::types::Track;

pub const DEMO_TITLE: &str = "In Da Club";
pub const DEMO_ALBUM: &str = "Get Rich or Die Tryin'";
pub const DEMO_ARTWORK: &str = "/Albums/get_rich_or_die_tryin.jpg";

/// Hand-authored LRC text for the demo loop.
pub const DEMO_LYRICS: &str = "
[00:01.47] Go
[00:02.00] Go
[00:02.50] Go
[00:03.00] Go
[00:03.50] Go
[00:04.00] Go
[00:04.50] Go, shorty, 
[00:05.50] it's your birthday
[00:06.50] We gon' party
[00:07.00] Like
[00:07.50] it's your birthday
[00:08.50] We gon' sip Bacardi 
[00:09.00] like 
[00:09.50] it's your birthday
";

/// The demo track with its metadata.
pub fn demo_track() -> Track {
    Track::from_lrc(DEMO_TITLE, DEMO_LYRICS)
        .with_album(DEMO_ALBUM)
        .with_artwork(DEMO_ARTWORK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_track() {
        let track = demo_track();
        assert_eq!(track.title, "In Da Club");
        assert_eq!(track.artwork.as_deref(), Some(DEMO_ARTWORK));
        assert_eq!(track.lyrics.len(), 14);
        assert_eq!(track.lyrics.get(0).unwrap().timestamp(), 1.47);
        assert_eq!(track.lyrics.get(6).unwrap().text(), "Go, shorty, ");
        assert_eq!(track.lyrics.get(11).unwrap().text(), "We gon' sip Bacardi ");
        assert_eq!(track.lyrics.get(12).unwrap().text(), "like ");
        assert_eq!(track.lyrics.get(13).unwrap().timestamp(), 9.5);
    }

    #[test]
    fn test_demo_fits_in_default_loop() {
        let track = demo_track();
        let loop_secs = crate::ClockConfig::default().loop_duration_secs();
        assert!(track.lyrics.iter().all(|e| e.timestamp() <= loop_secs));
    }
}
