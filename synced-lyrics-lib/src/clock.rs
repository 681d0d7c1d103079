//! Playback clock
//!
//! A looping clock that only advances while its display surface is in
//! view. Leaving view resets progress instead of pausing it. Time is kept
//! in whole milliseconds so the loop ceiling is hit exactly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{LyricsError, Result};

/// Clock cadence and loop length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Wall-clock time between ticks in milliseconds
    pub tick_interval_ms: u64,

    /// Amount added to elapsed time on every tick, in milliseconds
    pub step_ms: u64,

    /// Loop ceiling in milliseconds; elapsed wraps to 0 past this point
    pub loop_duration_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            step_ms: 100,
            loop_duration_ms: 12_000,
        }
    }
}

impl ClockConfig {
    /// Check that the clock can make progress and can wrap.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(LyricsError::InvalidClock(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.step_ms == 0 {
            return Err(LyricsError::InvalidClock(
                "step_ms must be positive".to_string(),
            ));
        }
        if self.loop_duration_ms < self.step_ms {
            return Err(LyricsError::InvalidClock(format!(
                "loop_duration_ms ({}) must be at least step_ms ({})",
                self.loop_duration_ms, self.step_ms
            )));
        }
        Ok(())
    }

    /// Tick interval as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Loop ceiling in seconds
    pub fn loop_duration_secs(&self) -> f64 {
        self.loop_duration_ms as f64 / 1000.0
    }
}

/// Whether the display surface is in view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock is idle, nothing changed
    Ignored,
    /// Elapsed time moved forward by one step
    Advanced,
    /// The step would have passed the ceiling, elapsed is back at 0
    Wrapped,
}

/// Looping, visibility-gated playback clock.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    config: ClockConfig,
    state: ClockState,
    elapsed_ms: u64,
    ticks: u64,
}

impl PlaybackClock {
    /// Create an idle clock at 0.
    pub fn new(config: ClockConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ClockState::Idle,
            elapsed_ms: 0,
            ticks: 0,
        })
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    /// Number of ticks applied since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Surface entered view. Returns true if the clock was idle.
    ///
    /// Does not reset elapsed time; the reset happens on leaving view.
    pub fn enter_view(&mut self) -> bool {
        let was_idle = self.state == ClockState::Idle;
        self.state = ClockState::Running;
        was_idle
    }

    /// Surface left view: stop and reset to 0.
    pub fn leave_view(&mut self) {
        self.state = ClockState::Idle;
        self.elapsed_ms = 0;
    }

    /// Apply a visibility observation. Returns true on an edge.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if visible {
            self.enter_view()
        } else {
            let was_running = self.is_running();
            self.leave_view();
            was_running
        }
    }

    /// Advance by one step, wrapping to 0 past the ceiling.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == ClockState::Idle {
            return TickOutcome::Ignored;
        }

        self.ticks += 1;
        let next = self.elapsed_ms + self.config.step_ms;
        if next > self.config.loop_duration_ms {
            self.elapsed_ms = 0;
            TickOutcome::Wrapped
        } else {
            self.elapsed_ms = next;
            TickOutcome::Advanced
        }
    }
}
