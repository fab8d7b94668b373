//! Run lifecycle shared by every game
//!
//! A game never owns a timer. The frame loop measures how much time passed
//! and calls [`ArcadeGame::update`] with it; each game feeds that `dt` into
//! its [`Ticker`]s and [`RunClock`] and drains whatever fired. Because every
//! fire is processed inside `update` while the status is checked, nothing
//! can tick a run that has already ended or been restarted.

use std::time::Duration;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Over,
}

/// Input actions the games can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    /// The held down key was let go
    DownReleased,
    HardDrop,
    RotateCw,
    RotateCcw,
    Restart,
    Quit,
}

/// Elapsed whole seconds while running
#[derive(Debug, Clone, Copy, Default)]
pub struct RunClock {
    seconds: u64,
    carry: Duration,
}

impl RunClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt`, counting one second every time a full second accumulates
    pub fn advance(&mut self, dt: Duration) {
        self.carry += dt;
        while self.carry >= Duration::from_secs(1) {
            self.carry -= Duration::from_secs(1);
            self.seconds += 1;
        }
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }
}

/// Fixed-interval timer fed by elapsed time
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval, keeping time already accumulated
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Restart the countdown to the next fire
    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }

    pub fn advance(&mut self, dt: Duration) {
        self.pending += dt;
    }

    /// Consume one interval if it is due
    pub fn fire(&mut self) -> bool {
        if self.interval.is_zero() || self.pending < self.interval {
            return false;
        }
        self.pending -= self.interval;
        true
    }
}

/// Game-specific statistics carried in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunExtras {
    Snake {
        best_length: usize,
        foods_eaten: u32,
        catches: u32,
    },
    Chaos {
        placements: u32,
        holes: u32,
        lines_cleared: u32,
    },
}

/// Final statistics captured once when a run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub score: u64,
    pub elapsed_secs: u64,
    pub extras: RunExtras,
}

/// Lifecycle every arcade game exposes to the frame loop
pub trait ArcadeGame {
    /// Reset all state and begin a new run
    fn start(&mut self);

    /// Advance timers by `dt`, processing every tick that came due
    fn update(&mut self, dt: Duration);

    /// Feed a player action
    fn apply(&mut self, action: Action);

    fn status(&self) -> RunStatus;

    /// Current score (final score once over)
    fn score(&self) -> u64;

    fn elapsed_secs(&self) -> u64;

    /// Final statistics, present only once the run is over
    fn snapshot(&self) -> Option<&Snapshot>;
}

/// Format whole seconds as MM:SS
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_counts_whole_seconds() {
        let mut clock = RunClock::new();
        for _ in 0..99 {
            clock.advance(Duration::from_millis(10));
        }
        assert_eq!(clock.seconds(), 0);
        clock.advance(Duration::from_millis(10));
        assert_eq!(clock.seconds(), 1);
        clock.advance(Duration::from_millis(2500));
        assert_eq!(clock.seconds(), 3);
    }

    #[test]
    fn test_ticker_fires_per_interval() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        ticker.advance(Duration::from_millis(250));
        assert!(ticker.fire());
        assert!(ticker.fire());
        assert!(!ticker.fire());
        ticker.advance(Duration::from_millis(50));
        assert!(ticker.fire());
    }

    #[test]
    fn test_ticker_reset_drops_pending_time() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        ticker.advance(Duration::from_millis(99));
        ticker.reset();
        ticker.advance(Duration::from_millis(99));
        assert!(!ticker.fire());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(3600), "60:00");
    }
}
