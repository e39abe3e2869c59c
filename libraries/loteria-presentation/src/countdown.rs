//! Pause-aware display countdown
//!
//! Gates how long each card stays on display. Pausing freezes exactly the
//! unused part of the window; resuming back-dates the start so a later pause
//! derives the same remaining time again.
//!
//! ```text
//! Idle ──begin──▶ Running(t0, d) ──pause──▶ Paused(d - (now - t0))
//!                    ▲    │                        │
//!                    │    └──expiry──▶ (caller decides: begin or stop)
//!                    └──────resume: Running(now - (d - r), d) ◀──┘
//! ```

use crate::types::TimerPhase;
use std::time::Duration;

/// Countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Nothing scheduled
    Idle,

    /// Counting down a window of `duration` that started at `started_at`
    Running {
        started_at: Duration,
        duration: Duration,
    },

    /// Frozen with `remaining` left in the window
    Paused { remaining: Duration },
}

impl TimerState {
    pub fn phase(&self) -> TimerPhase {
        match self {
            Self::Idle => TimerPhase::Idle,
            Self::Running { .. } => TimerPhase::Running,
            Self::Paused { .. } => TimerPhase::Paused,
        }
    }
}

/// The single outstanding expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingExpiry {
    /// Increases on every arm, identifies the schedule
    pub id: u64,

    /// Timestamp at which the window ends
    pub due: Duration,
}

/// Display countdown with one expiry slot
#[derive(Debug, Clone)]
pub struct Countdown {
    /// Full display window
    duration: Duration,

    state: TimerState,

    /// Armed expiry (at most one)
    pending: Option<PendingExpiry>,

    next_id: u64,
}

impl Countdown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: TimerState::Idle,
            pending: None,
            next_id: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn pending(&self) -> Option<PendingExpiry> {
        self.pending
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, TimerState::Paused { .. })
    }

    /// Start a fresh full window at `now`
    pub fn begin(&mut self, now: Duration) {
        self.state = TimerState::Running {
            started_at: now,
            duration: self.duration,
        };
        self.arm(now + self.duration);
    }

    /// Freeze the running window
    ///
    /// Returns the remaining time, or `None` if the countdown was not running.
    pub fn pause(&mut self, now: Duration) -> Option<Duration> {
        let TimerState::Running {
            started_at,
            duration,
        } = self.state
        else {
            return None;
        };

        let elapsed = now.saturating_sub(started_at);
        let remaining = duration.saturating_sub(elapsed);

        self.cancel();
        self.state = TimerState::Paused { remaining };

        tracing::debug!(
            remaining_ms = remaining.as_millis() as u64,
            "Countdown paused"
        );
        Some(remaining)
    }

    /// Continue a paused window
    ///
    /// Returns false if the countdown was not paused.
    pub fn resume(&mut self, now: Duration) -> bool {
        let TimerState::Paused { remaining } = self.state else {
            return false;
        };

        let consumed = self.duration.saturating_sub(remaining);
        self.state = TimerState::Running {
            started_at: now.saturating_sub(consumed),
            duration: self.duration,
        };
        self.arm(now + remaining);

        tracing::debug!(
            remaining_ms = remaining.as_millis() as u64,
            "Countdown resumed"
        );
        true
    }

    /// Cancel any expiry and go idle
    pub fn stop(&mut self) {
        self.cancel();
        self.state = TimerState::Idle;
    }

    /// Consume the expiry if it is due
    ///
    /// The state stays `Running` until the caller begins a new window or
    /// stops the countdown.
    pub fn take_expired(&mut self, now: Duration) -> bool {
        match self.pending {
            Some(pending) if self.is_running() && pending.due <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Time left in the current window
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running {
                started_at,
                duration,
            } => Some(duration.saturating_sub(now.saturating_sub(started_at))),
            TimerState::Paused { remaining } => Some(remaining),
        }
    }

    /// When the armed expiry fires
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.due)
    }

    fn arm(&mut self, due: Duration) {
        self.cancel();
        self.next_id += 1;
        self.pending = Some(PendingExpiry {
            id: self.next_id,
            due,
        });
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}
