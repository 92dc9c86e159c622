/// Fixed-period timers for the two long-running game tasks.
///
/// Both tasks run on the thread that owns the [`World`](crate::entities::World):
/// the main loop sleeps (on its input channel) until the nearest deadline,
/// then runs whichever tasks are due.  Input events that arrive while
/// waiting are applied between ticks.

use std::time::{Duration, Instant};

use crate::config::GameConfig;

/// A repeating deadline.  The first deadline is one period after the start,
/// so each task waits before its first run.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    /// Returns `true` and advances the deadline if it has passed.
    ///
    /// A timer that fell more than a period behind re-anchors on `now`
    /// instead of firing a burst of catch-up runs.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }

    /// Time left until the next deadline, zero if already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

/// Which tasks are due on this wake-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Due {
    pub frame: bool,
    pub spawn: bool,
}

/// The frame task and the spawn task, multiplexed on one thread.
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    frame: Interval,
    spawn: Interval,
}

impl Scheduler {
    pub fn new(config: &GameConfig, now: Instant) -> Self {
        Self {
            frame: Interval::starting_at(config.frame_period(), now),
            spawn: Interval::starting_at(config.spawn_period(), now),
        }
    }

    /// How long the loop may wait for input before a task is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.frame.remaining(now).min(self.spawn.remaining(now))
    }

    pub fn poll(&mut self, now: Instant) -> Due {
        Due {
            spawn: self.spawn.poll(now),
            frame: self.frame.poll(now),
        }
    }
}
