//! # Search — Trial-Division Prime Scan
//!
//! [`PrimeSearch`] is the lazy producer: an iterator that walks odd
//! candidates from the normalized start, trial-divides each one, and yields
//! a [`PrimeResult`] for every candidate with no odd divisor up to its
//! square root. It keeps the running counters (candidates tested, primes
//! found, total divisor tests) and checks the optional [`StopSignal`] once
//! per candidate.
//!
//! [`print_primes`] drives it for one run: writes each result line to the
//! context's sink, ticks progress, then computes and writes the
//! [`SearchSummary`].
//!
//! ## Scan rules
//!
//! - `end <= start` is rejected before any work.
//! - An even start is bumped to the next odd number; 2 is never scanned.
//! - 1 has no divisors to try and is therefore reported prime.
//! - Composites count towards `total_divisor_tests` but are not emitted.
//! - The scan also ends if the next candidate would overflow `u64`.

use std::io::Write;
use std::iter::FusedIterator;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::output;
use crate::progress::Progress;
use crate::run_params::SearchBounds;
use crate::trial_division::trial_divide;
use crate::validation::ValidationError;
use crate::StopSignal;

/// Context label attached to errors raised by the engine.
pub const CONTEXT: &str = "search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimeResult {
    pub value: u64,
    pub divisor_tests: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchSummary {
    pub total_divisor_tests: u64,
    pub elapsed_seconds: f64,
    pub tests_per_second: f64,
}

impl SearchSummary {
    /// Rate is reported as 0.0 when no measurable time has passed.
    pub fn new(total_divisor_tests: u64, elapsed: Duration) -> Self {
        let elapsed_seconds = elapsed.as_secs_f64();
        let tests_per_second = if elapsed_seconds > 0.0 {
            total_divisor_tests as f64 / elapsed_seconds
        } else {
            0.0
        };
        SearchSummary {
            total_divisor_tests,
            elapsed_seconds,
            tests_per_second,
        }
    }
}

/// Round an even start up to the next odd number. Odd values pass through.
pub fn normalize_start(start: u64) -> Option<u64> {
    if start % 2 == 0 {
        start.checked_add(1)
    } else {
        Some(start)
    }
}

/// Reject bounds whose end does not lie after the start.
pub fn check_bounds(bounds: &SearchBounds) -> Result<(), ValidationError> {
    match bounds.end() {
        Some(end) if end <= bounds.start() => Err(ValidationError::single(
            CONTEXT,
            "end_search",
            format!(
                "end_search = {} <= start_search = {}",
                end,
                bounds.start()
            ),
        )),
        _ => Ok(()),
    }
}

pub struct PrimeSearch<'a> {
    next: Option<u64>,
    end: Option<u64>,
    stop: Option<&'a dyn StopSignal>,
    candidates_tested: u64,
    primes_found: u64,
    total_divisor_tests: u64,
    cancelled: bool,
}

impl<'a> PrimeSearch<'a> {
    pub fn new(
        bounds: &SearchBounds,
        stop: Option<&'a dyn StopSignal>,
    ) -> Result<Self, ValidationError> {
        check_bounds(bounds)?;
        let next = normalize_start(bounds.start());
        debug!(
            start = bounds.start(),
            normalized = ?next,
            end = ?bounds.end(),
            "search bounds"
        );
        Ok(PrimeSearch {
            next,
            end: bounds.end(),
            stop,
            candidates_tested: 0,
            primes_found: 0,
            total_divisor_tests: 0,
            cancelled: false,
        })
    }

    /// Divisor tests over every candidate scanned so far, composites included.
    pub fn total_divisor_tests(&self) -> u64 {
        self.total_divisor_tests
    }

    pub fn candidates_tested(&self) -> u64 {
        self.candidates_tested
    }

    pub fn primes_found(&self) -> u64 {
        self.primes_found
    }

    /// True if the scan ended because the stop signal fired.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Next candidate to be scanned, if any.
    pub fn next_candidate(&self) -> Option<u64> {
        self.next
    }

    pub fn summarize(&self, elapsed: Duration) -> SearchSummary {
        SearchSummary::new(self.total_divisor_tests, elapsed)
    }
}

impl Iterator for PrimeSearch<'_> {
    type Item = PrimeResult;

    fn next(&mut self) -> Option<PrimeResult> {
        loop {
            let x = self.next?;
            if self.end.is_some_and(|end| x > end) {
                self.next = None;
                return None;
            }
            if self.stop.is_some_and(|s| s.is_stop_requested()) {
                debug!(at = x, "stop requested");
                self.cancelled = true;
                self.next = None;
                return None;
            }
            self.next = x.checked_add(2);

            let verdict = trial_divide(x);
            self.candidates_tested += 1;
            self.total_divisor_tests += verdict.divisor_tests;
            if verdict.is_prime {
                self.primes_found += 1;
                return Some(PrimeResult {
                    value: x,
                    divisor_tests: verdict.divisor_tests,
                });
            }
        }
    }
}

impl FusedIterator for PrimeSearch<'_> {}

/// Per-run state: when the run started, where output goes, progress.
pub struct SearchContext<W: Write> {
    started: Instant,
    sink: W,
    progress: Progress,
}

impl<W: Write> SearchContext<W> {
    pub fn new(sink: W) -> Self {
        Self::with_progress(sink, Progress::new())
    }

    pub fn with_progress(sink: W, progress: Progress) -> Self {
        SearchContext {
            started: Instant::now(),
            sink,
            progress,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

/// Scan `bounds`, writing one line per prime and the summary to the
/// context's sink.
///
/// Fails with a [`ValidationError`] (inside the `anyhow::Error`) if
/// `end <= start`; nothing is written in that case.
pub fn print_primes<W: Write>(
    bounds: &SearchBounds,
    ctx: &mut SearchContext<W>,
    stop: Option<&dyn StopSignal>,
) -> Result<SearchSummary> {
    let mut search = PrimeSearch::new(bounds, stop)?;

    while let Some(result) = search.next() {
        output::write_result(&mut ctx.sink, &result)?;
        ctx.progress.tick(
            search.candidates_tested(),
            search.primes_found(),
            result.value,
        );
    }

    let summary = search.summarize(ctx.elapsed());
    output::write_summary(&mut ctx.sink, &summary)?;

    ctx.progress.tick(
        search.candidates_tested(),
        search.primes_found(),
        search.next_candidate().unwrap_or(0),
    );
    info!(
        candidates = search.candidates_tested(),
        primes = search.primes_found(),
        total_divisor_tests = summary.total_divisor_tests,
        elapsed_secs = summary.elapsed_seconds,
        cancelled = search.was_cancelled(),
        "search finished"
    );
    Ok(summary)
}
