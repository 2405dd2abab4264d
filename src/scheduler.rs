//! Single-slot debounce timer for a diff session.
//!
//! Scheduling always replaces the pending deadline, so at most one update
//! is outstanding per session. Time is passed in by the caller, which keeps
//! the timer deterministic and lets the host's event loop decide how to
//! wait (for example `crossterm::event::poll` with [`UpdateScheduler::timeout`]).

use std::time::{Duration, Instant};

/// Which debounce delay an update request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSpeed {
    /// Edits that changed the line count
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUpdate {
    pub due: Instant,
    pub speed: UpdateSpeed,
}

#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    fast_delay: Duration,
    slow_delay: Duration,
    pending: Option<PendingUpdate>,
}

impl UpdateScheduler {
    pub fn new(fast_delay: Duration, slow_delay: Duration) -> Self {
        UpdateScheduler {
            fast_delay,
            slow_delay,
            pending: None,
        }
    }

    /// Cancel any pending update and schedule a new one from `now`.
    ///
    /// A burst that already contains a line-count change keeps the fast
    /// delay until it fires.
    pub fn schedule(&mut self, now: Instant, speed: UpdateSpeed) {
        let speed = match self.pending {
            Some(PendingUpdate {
                speed: UpdateSpeed::Fast,
                ..
            }) => UpdateSpeed::Fast,
            _ => speed,
        };
        let delay = match speed {
            UpdateSpeed::Fast => self.fast_delay,
            UpdateSpeed::Slow => self.slow_delay,
        };
        self.pending = Some(PendingUpdate {
            due: now + delay,
            speed,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<PendingUpdate> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Time left until the pending update fires, zero when overdue.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Clear and report the pending update when its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if pending.due <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
