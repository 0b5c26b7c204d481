//! Countdown cadence on the host's monotonic clock
//!
//! The countdown fires once per second on its own schedule. Deadlines advance
//! by exactly one period per firing, so frame jitter never accumulates into
//! drift. Firings are only collected at the start of a tick.

use serde::{Deserialize, Serialize};

use crate::consts::COUNTDOWN_PERIOD_MS;

/// One-second countdown schedule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    /// Next firing (ms); `None` until anchored by the first tick
    next_due_ms: Option<u64>,
}

impl Countdown {
    pub fn new() -> Self {
        Self { next_due_ms: None }
    }

    /// Forget the schedule (new round)
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Number of whole periods that came due by `now_ms`
    ///
    /// The first call anchors the schedule and reports nothing.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            self.next_due_ms = Some(now_ms.saturating_add(COUNTDOWN_PERIOD_MS));
            return 0;
        };
        let mut fired = 0;
        while now_ms >= due {
            fired += 1;
            due = due.saturating_add(COUNTDOWN_PERIOD_MS);
        }
        self.next_due_ms = Some(due);
        fired
    }
}
