//! # Trial Division — Bounded Odd-Divisor Primality Test
//!
//! Tests a single odd candidate by dividing it by 3, 5, 7, … up to an odd
//! divisor ceiling derived from its integer square root. The number of
//! divisions performed is returned alongside the verdict; it is the
//! performance counter the search engine accumulates.
//!
//! Divisor 2 is never tried: callers only hand in odd candidates. For `x = 1`
//! and `x = 3` the ceiling is 1, no division runs, and the candidate is
//! reported prime with zero tests.

use tracing::trace;

/// Result of testing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_prime: bool,
    pub divisor_tests: u64,
}

/// floor(sqrt(x)) for the full `u64` range.
///
/// The f64 estimate can be off by one near 2^53 and above, so it is
/// corrected in both directions with exact integer arithmetic.
pub fn isqrt(x: u64) -> u64 {
    if x < 2 {
        return x;
    }
    let mut y = (x as f64).sqrt() as u64;
    while (y as u128) * (y as u128) > x as u128 {
        y -= 1;
    }
    while ((y + 1) as u128) * ((y + 1) as u128) <= x as u128 {
        y += 1;
    }
    y
}

/// Largest divisor tried for `x`: floor(sqrt(x)), rounded up to odd.
pub fn max_divisor(x: u64) -> u64 {
    let m = isqrt(x);
    if m % 2 == 0 {
        m + 1
    } else {
        m
    }
}

/// Trial-divide `x` by successive odd divisors starting at 3.
///
/// Stops at the first zero remainder. Every division is counted, including
/// the one that proves `x` composite.
pub fn trial_divide(x: u64) -> Verdict {
    let limit = max_divisor(x);
    let mut divisor_tests = 0u64;
    let mut d = 3u64;
    while d <= limit {
        divisor_tests += 1;
        if x % d == 0 {
            trace!(x, d, divisor_tests, "composite");
            return Verdict {
                is_prime: false,
                divisor_tests,
            };
        }
        d += 2;
    }
    Verdict {
        is_prime: true,
        divisor_tests,
    }
}
