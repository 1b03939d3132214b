//! # Progress — Periodic Search Status
//!
//! Unbounded searches can run for hours without printing anything new once
//! primes thin out, so the engine ticks a [`Progress`] once per emitted prime
//! and it logs a `search progress` event at most once per interval (30 s by
//! default): candidates tested, primes found, rate (candidates/sec), current
//! candidate and elapsed time.
//!
//! The search is single-threaded, so plain counters replace atomics; the
//! reporter runs inline rather than on its own thread.

use std::time::{Duration, Instant};
use tracing::info;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

pub struct Progress {
    pub tested: u64,
    pub found: u64,
    pub current: u64,
    start: Instant,
    interval: Duration,
    last_report: Instant,
    reports: u64,
}

impl Progress {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Progress {
            tested: 0,
            found: 0,
            current: 0,
            start: now,
            interval,
            last_report: now,
            reports: 0,
        }
    }

    /// Update counters and report if the interval has elapsed.
    /// Returns true when a status line was logged.
    pub fn tick(&mut self, tested: u64, found: u64, current: u64) -> bool {
        self.tested = tested;
        self.found = found;
        self.current = current;
        if self.last_report.elapsed() < self.interval {
            return false;
        }
        self.print_status();
        self.last_report = Instant::now();
        true
    }

    /// Candidates per second since start; 0.0 when no time has passed.
    pub fn rate(&self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.tested as f64 / secs
        } else {
            0.0
        }
    }

    pub fn reports(&self) -> u64 {
        self.reports
    }

    pub fn print_status(&mut self) {
        let elapsed = self.start.elapsed();
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = self.current,
            tested = self.tested,
            rate = format_args!("{:.2}", self.rate()),
            found = self.found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "search progress"
        );
        self.reports += 1;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let p = Progress::new();
        assert_eq!(p.tested, 0);
        assert_eq!(p.found, 0);
        assert_eq!(p.current, 0);
        assert_eq!(p.reports(), 0);
    }

    /// With the default 30 s interval a tick right after creation only
    /// records counters.
    #[test]
    fn tick_before_interval_does_not_report() {
        let mut p = Progress::new();
        assert!(!p.tick(10, 3, 21));
        assert_eq!(p.tested, 10);
        assert_eq!(p.found, 3);
        assert_eq!(p.current, 21);
        assert_eq!(p.reports(), 0);
    }

    #[test]
    fn zero_interval_reports_every_tick() {
        let mut p = Progress::with_interval(Duration::ZERO);
        assert!(p.tick(1, 1, 3));
        assert!(p.tick(2, 2, 5));
        assert_eq!(p.reports(), 2);
    }

    #[test]
    fn rate_is_finite_right_after_creation() {
        let p = Progress::new();
        assert!(p.rate().is_finite());
        assert_eq!(p.rate(), 0.0);
    }

    #[test]
    fn print_status_does_not_panic() {
        let mut p = Progress::new();
        p.tick(100, 5, 199);
        p.print_status();
        assert_eq!(p.reports(), 1);
    }
}
