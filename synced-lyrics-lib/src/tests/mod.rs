//! Cross-module tests
//!
//! - Demo track playback through the clock and selector
//! - Visibility gating over a full loop

pub mod demo_playback;
