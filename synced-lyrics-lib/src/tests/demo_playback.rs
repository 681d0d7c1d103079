//! Drives the demo track through a full clock loop without a runtime.

use crate::clock::{ClockConfig, PlaybackClock, TickOutcome};
use crate::demo::demo_track;
use crate::types::LyricSequence;

/// Reference rule: greatest timestamp not exceeding `elapsed`.
fn expected_index(lyrics: &LyricSequence, elapsed: f64) -> Option<usize> {
    lyrics
        .iter()
        .enumerate()
        .filter(|(_, e)| e.timestamp() <= elapsed)
        .map(|(i, _)| i)
        .last()
}

#[test]
fn test_full_loop_matches_reference() {
    let track = demo_track();
    let mut clock = PlaybackClock::new(ClockConfig::default()).unwrap();
    clock.enter_view();

    let mut seen = Vec::new();
    loop {
        let outcome = clock.tick();
        let elapsed = clock.elapsed_secs();
        let active = track.lyrics.active_index(elapsed);
        assert_eq!(active, expected_index(&track.lyrics, elapsed), "at {}", elapsed);
        if let Some(i) = active {
            if seen.last() != Some(&i) {
                seen.push(i);
            }
        }
        if outcome == TickOutcome::Wrapped {
            break;
        }
    }

    // Every line is shown once per loop, in order
    assert_eq!(seen, (0..track.lyrics.len()).collect::<Vec<_>>());
    assert_eq!(clock.ticks(), 121);
}

#[test]
fn test_first_line_timing() {
    let track = demo_track();
    let mut clock = PlaybackClock::new(ClockConfig::default()).unwrap();
    clock.enter_view();

    // 1.4s: nothing yet; 1.5s: first "Go" (tagged 1.47)
    for _ in 0..14 {
        clock.tick();
    }
    assert_eq!(track.lyrics.active_index(clock.elapsed_secs()), None);
    clock.tick();
    assert_eq!(track.lyrics.active_index(clock.elapsed_secs()), Some(0));
}

#[test]
fn test_leaving_view_mid_loop() {
    let track = demo_track();
    let mut clock = PlaybackClock::new(ClockConfig::default()).unwrap();
    clock.enter_view();
    for _ in 0..65 {
        clock.tick();
    }
    assert_eq!(
        track.lyrics.active_entry(clock.elapsed_secs()).map(|e| e.text()),
        Some("We gon' party")
    );

    clock.set_visible(false);
    assert_eq!(clock.elapsed_secs(), 0.0);
    assert_eq!(track.lyrics.active_index(clock.elapsed_secs()), None);
}
