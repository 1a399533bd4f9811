//! Scheduling of game ticks.
//!
//! A [`Ticker`] only reports how many ticks are due; the game pulls them via
//! [`Game::pump`](crate::game::Game::pump) and runs them one after another,
//! so ticks never overlap.

use std::time::{Duration, Instant};

pub trait Ticker {
    /// (Re)starts the schedule with one tick every `interval`.
    fn start(&mut self, interval: Duration);

    /// Cancels the schedule. Ticks that were due but not yet taken are dropped.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Number of ticks that came due since the last call.
    fn due_ticks(&mut self) -> u32;
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Wall-clock ticker. It never reports more than one tick per call: when the
/// caller falls behind, the next deadline is pushed out from now instead of
/// replaying every missed tick.
#[derive(Debug, Default)]
pub struct IntervalTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long until the next tick is due, `None` while stopped.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(Instant::now()))
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self, interval: Duration) {
        self.interval = interval.max(MIN_INTERVAL);
        self.next = Some(Instant::now() + self.interval);
    }

    fn stop(&mut self) {
        self.next = None;
    }

    fn is_running(&self) -> bool {
        self.next.is_some()
    }

    fn due_ticks(&mut self) -> u32 {
        let next = match self.next {
            Some(next) => next,
            None => return 0,
        };

        let now = Instant::now();
        if now < next {
            return 0;
        }

        let mut following = next + self.interval;
        if following <= now {
            following = now + self.interval;
        }
        self.next = Some(following);
        1
    }
}

/// Ticker driven by hand, for running the game loop deterministically.
#[derive(Debug, Default)]
pub struct ManualTicker {
    interval: Option<Duration>,
    pending: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `n` ticks. Ignored while stopped, like a cancelled timer.
    pub fn advance(&mut self, n: u32) {
        if self.is_running() {
            self.pending += n;
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.interval = None;
        self.pending = 0;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    fn due_ticks(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}
