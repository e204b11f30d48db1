//! Trailing-edge debounce for style-change notifications.
//!
//! Style-change notifications from the host arrive in bursts; re-running
//! the full parse/apply pipeline per notification is wasteful and can
//! produce visible flicker. The debouncer collapses a burst into a single
//! run: each trigger resets the deadline, and the pipeline fires once the
//! delay has elapsed since the *last* trigger.
//!
//! No background threads and no ambient timer state: the owning session
//! polls with explicit instants, which also makes tests deterministic.

use std::time::{Duration, Instant};

/// An explicit timer-reset primitive. At most one run is ever pending.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    /// Arms the debouncer, or pushes an already-armed deadline out. A new
    /// trigger resets the pending timer rather than queuing a second run.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Fires at most once per arming, once the delay has elapsed since the
    /// last trigger.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clears any pending deadline deterministically.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
