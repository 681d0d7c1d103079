//! Display sessions
//!
//! A `DisplaySession` owns one lyric sequence, one playback clock and at
//! most one ticker task. The ticker exists only while the display surface
//! is in view: it is spawned on the enter edge and cancelled on the leave
//! edge or when the session is closed.
//!
//! Every state change is published as a `SessionSnapshot` on a watch
//! channel, which is the hand-off point to whatever renders the lyrics.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::clock::{ClockConfig, ClockState, PlaybackClock, TickOutcome};
use crate::error::{LyricsError, Result};
use crate::types::LyricSequence;

/// Point-in-time view of a session, as handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: ClockState,
    pub elapsed_secs: f64,
    pub active_index: Option<usize>,
    pub active_text: Option<String>,
    /// Ticks applied since the session was created
    pub ticks: u64,
}

struct SessionInner {
    clock: PlaybackClock,
    active_index: Option<usize>,
    /// Bumped on every cancellation. A ticker only applies ticks while
    /// its own generation is current.
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    closed: bool,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionInner {
    fn snapshot(&self, lyrics: &LyricSequence) -> SessionSnapshot {
        SessionSnapshot {
            state: self.clock.state(),
            elapsed_secs: self.clock.elapsed_secs(),
            active_index: self.active_index,
            active_text: self
                .active_index
                .and_then(|i| lyrics.get(i))
                .map(|e| e.text().to_string()),
            ticks: self.clock.ticks(),
        }
    }

    fn publish(&self, lyrics: &LyricSequence) {
        self.snapshots.send_replace(self.snapshot(lyrics));
    }

    fn tick(&mut self, lyrics: &LyricSequence) -> TickOutcome {
        let outcome = self.clock.tick();
        self.active_index = lyrics.active_index(self.clock.elapsed_secs());
        self.publish(lyrics);
        outcome
    }

    /// Stop the ticker and reset progress.
    fn stop(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.clock.leave_view();
        self.active_index = None;
    }
}

/// One display surface's lyric playback.
pub struct DisplaySession {
    id: String,
    lyrics: Arc<LyricSequence>,
    tick_interval: Duration,
    inner: Arc<Mutex<SessionInner>>,
    created_at: DateTime<Utc>,
    /// Unix seconds of the last client access
    pub last_accessed: AtomicU64,
}

impl DisplaySession {
    /// Create an idle session. Fails if the clock configuration is invalid.
    pub fn new(lyrics: Arc<LyricSequence>, config: ClockConfig) -> Result<Self> {
        let tick_interval = config.tick_interval();
        let clock = PlaybackClock::new(config)?;

        let inner = SessionInner {
            clock,
            active_index: None,
            generation: 0,
            ticker: None,
            closed: false,
            snapshots: watch::channel(SessionSnapshot {
                state: ClockState::Idle,
                elapsed_secs: 0.0,
                active_index: None,
                active_text: None,
                ticks: 0,
            })
            .0,
        };

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            lyrics,
            tick_interval,
            inner: Arc::new(Mutex::new(inner)),
            created_at: Utc::now(),
            last_accessed: AtomicU64::new(unix_now()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lyrics(&self) -> &Arc<LyricSequence> {
        &self.lyrics
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Report whether the display surface is in view.
    ///
    /// Entering view starts the ticker if it is not already running; it
    /// must be called from within a Tokio runtime. Leaving view resets
    /// elapsed time to 0 and clears the active line. Once this returns,
    /// no tick from a cancelled ticker is applied.
    pub fn set_visible(&self, visible: bool) -> Result<SessionSnapshot> {
        self.touch();
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(LyricsError::SessionClosed(self.id.clone()));
        }

        if visible {
            if inner.clock.enter_view() {
                let handle = spawn_ticker(
                    Arc::clone(&self.inner),
                    Arc::clone(&self.lyrics),
                    self.tick_interval,
                    inner.generation,
                );
                inner.ticker = Some(handle);
                tracing::debug!("Session {} entered view, ticker started", self.id);
            }
        } else {
            let was_running = inner.clock.is_running();
            inner.stop();
            if was_running {
                tracing::debug!("Session {} left view, ticker cancelled", self.id);
            }
        }

        inner.publish(&self.lyrics);
        Ok(inner.snapshot(&self.lyrics))
    }

    /// Current state of the session, counted as a client access
    pub fn snapshot(&self) -> SessionSnapshot {
        self.touch();
        self.peek_snapshot()
    }

    /// Current state of the session without refreshing the idle timer
    pub fn peek_snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot(&self.lyrics)
    }

    /// Subscribe to snapshots published after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.lock().snapshots.subscribe()
    }

    /// Tear the session down. Idempotent.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.stop();
        inner.closed = true;
        inner.publish(&self.lyrics);
        tracing::debug!("Session {} closed", self.id);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Update last accessed time to now
    pub fn touch(&self) {
        self.last_accessed.store(unix_now(), Ordering::Relaxed);
    }

    /// Get seconds since last access
    pub fn idle_secs(&self) -> u64 {
        unix_now().saturating_sub(self.last_accessed.load(Ordering::Relaxed))
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DisplaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySession")
            .field("id", &self.id)
            .field("lines", &self.lyrics.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn spawn_ticker(
    inner: Arc<Mutex<SessionInner>>,
    lyrics: Arc<LyricSequence>,
    period: Duration,
    generation: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // First tick one period after entering view, not immediately.
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let mut state = inner.lock();
            if state.generation != generation {
                break;
            }
            if state.tick(&lyrics) == TickOutcome::Wrapped {
                tracing::trace!("Playback clock wrapped to 0");
            }
        }
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> Arc<LyricSequence> {
        Arc::new(LyricSequence::parse(
            "[00:00.20] one\n[00:00.40] two\n[00:00.60] three",
        ))
    }

    fn session() -> DisplaySession {
        DisplaySession::new(sequence(), ClockConfig::default()).unwrap()
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session();
        assert!(!session.id().is_empty());
        let snap = session.snapshot();
        assert_eq!(snap.state, ClockState::Idle);
        assert_eq!(snap.elapsed_secs, 0.0);
        assert_eq!(snap.active_index, None);
        assert_eq!(snap.ticks, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClockConfig {
            step_ms: 0,
            ..Default::default()
        };
        assert!(DisplaySession::new(sequence(), config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_while_visible() {
        let session = session();
        let snap = session.set_visible(true).unwrap();
        assert_eq!(snap.state, ClockState::Running);
        assert_eq!(snap.ticks, 0);

        time::sleep(Duration::from_millis(450)).await;

        let snap = session.snapshot();
        assert_eq!(snap.ticks, 4);
        assert!((snap.elapsed_secs - 0.4).abs() < 1e-9);
        assert_eq!(snap.active_index, Some(1));
        assert_eq!(snap.active_text.as_deref(), Some("two"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_view_resets_and_cancels() {
        let session = session();
        session.set_visible(true).unwrap();
        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(session.snapshot().ticks, 3);

        let snap = session.set_visible(false).unwrap();
        assert_eq!(snap.state, ClockState::Idle);
        assert_eq!(snap.elapsed_secs, 0.0);
        assert_eq!(snap.active_index, None);

        // No further ticks after cancellation
        time::sleep(Duration::from_secs(2)).await;
        let snap = session.snapshot();
        assert_eq!(snap.ticks, 3);
        assert_eq!(snap.elapsed_secs, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_enter_does_not_double_rate() {
        let session = session();
        session.set_visible(true).unwrap();
        session.set_visible(true).unwrap();
        session.set_visible(true).unwrap();
        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(session.snapshot().ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenter_starts_from_zero() {
        let session = session();
        session.set_visible(true).unwrap();
        time::sleep(Duration::from_millis(550)).await;
        session.set_visible(false).unwrap();
        session.set_visible(true).unwrap();
        time::sleep(Duration::from_millis(250)).await;

        let snap = session.snapshot();
        assert!((snap.elapsed_secs - 0.2).abs() < 1e-9);
        assert_eq!(snap.active_index, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wraps_at_loop_ceiling() {
        let config = ClockConfig {
            tick_interval_ms: 100,
            step_ms: 100,
            loop_duration_ms: 300,
        };
        let session = DisplaySession::new(sequence(), config).unwrap();
        session.set_visible(true).unwrap();

        time::sleep(Duration::from_millis(350)).await;
        assert!((session.snapshot().elapsed_secs - 0.3).abs() < 1e-9);

        time::sleep(Duration::from_millis(100)).await;
        let snap = session.snapshot();
        assert_eq!(snap.elapsed_secs, 0.0);
        assert_eq!(snap.active_index, None);
        assert_eq!(snap.ticks, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_receives_ticks() {
        let session = session();
        let mut rx = session.subscribe();
        session.set_visible(true).unwrap();
        rx.borrow_and_update();

        rx.changed().await.unwrap();
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.ticks, 1);
        assert!((snap.elapsed_secs - 0.1).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_terminal() {
        let session = session();
        session.set_visible(true).unwrap();
        time::sleep(Duration::from_millis(250)).await;

        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(matches!(
            session.set_visible(true),
            Err(LyricsError::SessionClosed(_))
        ));

        time::sleep(Duration::from_secs(1)).await;
        let snap = session.snapshot();
        assert_eq!(snap.ticks, 2);
        assert_eq!(snap.state, ClockState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticker() {
        let session = session();
        let mut rx = session.subscribe();
        session.set_visible(true).unwrap();
        drop(session);

        // The close publishes a final idle snapshot, then the sender is
        // dropped along with the aborted ticker.
        time::sleep(Duration::from_secs(1)).await;
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.state, ClockState::Idle);
        assert_eq!(snap.ticks, 0);
    }

    #[test]
    fn test_snapshot_serialization() {
        let json = serde_json::to_value(session().snapshot()).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["elapsed_secs"], 0.0);
        assert!(json["active_index"].is_null());
        assert!(json["active_text"].is_null());
    }

    #[test]
    fn test_idle_secs() {
        let session = session();
        assert!(session.idle_secs() < 2);
    }

    #[test]
    fn test_peek_snapshot_keeps_idle_time() {
        let session = session();
        session.last_accessed.store(0, Ordering::Relaxed);

        let peeked = session.peek_snapshot();
        assert_eq!(peeked.state, ClockState::Idle);
        assert!(session.idle_secs() > 1_000_000);

        assert_eq!(session.snapshot(), peeked);
        assert!(session.idle_secs() < 2);
    }
}
