//! Time sources for the frame loop
//!
//! The controller never reads the system clock directly. Everything that
//! depends on time (frame pacing, overlay expiry, animation phase) goes
//! through [`TimeSource`], so headless runs and tests can drive time by hand.

use std::cell::Cell;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Monotonic time plus wall-clock time for display
pub trait TimeSource {
    /// Time elapsed since the source was created
    fn elapsed(&self) -> Duration;

    /// Local date and time shown on the launcher
    fn wall_clock(&self) -> DateTime<Local>;

    /// Blocks (or jumps) until `elapsed()` reaches `deadline`
    fn wait_until(&self, deadline: Duration);
}

/// Real time backed by [`Instant`]
#[derive(Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn wall_clock(&self) -> DateTime<Local> {
        Local::now()
    }

    fn wait_until(&self, deadline: Duration) {
        let now = self.elapsed();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Deterministic clock for headless runs and tests
///
/// `wait_until` advances time instantly instead of sleeping. The wall clock
/// is a fixed origin plus the elapsed time.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Duration>,
    origin: DateTime<Local>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    pub fn starting_at(origin: DateTime<Local>) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            origin,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }

    fn wall_clock(&self) -> DateTime<Local> {
        let offset = chrono::Duration::from_std(self.now.get()).unwrap_or(chrono::Duration::zero());
        self.origin + offset
    }

    fn wait_until(&self, deadline: Duration) {
        if deadline > self.now.get() {
            self.now.set(deadline);
        }
    }
}
