//! Property-based tests for the trial-division search.
//!
//! These use `proptest` to check invariants of the scan across randomly
//! generated intervals rather than a handful of fixed examples.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # More cases:
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! Each property is named `prop_<function>_<invariant>`.

use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use primes::search::normalize_start;
use primes::trial_division::{isqrt, max_divisor, trial_divide};
use primes::{create_run_parameters, PrimeSearch, RawRunParams, SearchBounds};

fn bounds(start: u64, end: Option<u64>) -> SearchBounds {
    SearchBounds::new(start, end).unwrap()
}

// == Trial division =============================================================

proptest! {
    /// **Property**: isqrt(x)^2 <= x < (isqrt(x) + 1)^2 over the full u64 range.
    #[test]
    fn prop_isqrt_brackets_input(x in any::<u64>()) {
        let r = isqrt(x) as u128;
        prop_assert!(r * r <= x as u128);
        prop_assert!((r + 1) * (r + 1) > x as u128);
    }

    /// **Property**: the divisor ceiling is odd and never below sqrt(x).
    #[test]
    fn prop_max_divisor_odd_and_covers_sqrt(x in 1u64..1_000_000_000) {
        let m = max_divisor(x);
        prop_assert_eq!(m % 2, 1);
        prop_assert!(m >= isqrt(x));
        prop_assert!(m <= isqrt(x) + 1);
    }

    /// **Property**: for odd x >= 3, trial division agrees with a naive
    /// divisor scan over every odd d in [3, x).
    #[test]
    fn prop_trial_divide_matches_naive(half in 1u64..50_000) {
        let x = 2 * half + 1;
        let naive = (3..x).step_by(2).all(|d| x % d != 0);
        prop_assert_eq!(trial_divide(x).is_prime, naive, "disagreement on {}", x);
    }

    /// **Property**: a prime verdict costs exactly one test per odd divisor
    /// up to the ceiling; a composite verdict stops at its smallest odd factor.
    #[test]
    fn prop_trial_divide_counts_divisions(half in 0u64..500_000) {
        let x = 2 * half + 1;
        let v = trial_divide(x);
        let limit = max_divisor(x);
        if v.is_prime {
            let expected = if limit >= 3 { (limit - 3) / 2 + 1 } else { 0 };
            prop_assert_eq!(v.divisor_tests, expected);
        } else {
            let smallest = (3..=limit).step_by(2).find(|d| x % d == 0).unwrap();
            prop_assert_eq!(v.divisor_tests, (smallest - 3) / 2 + 1);
        }
    }
}

// == Search =====================================================================

proptest! {
    /// **Property**: odd normalization is idempotent.
    #[test]
    fn prop_normalize_start_idempotent(s in 1u64..u64::MAX - 1) {
        let once = normalize_start(s).unwrap();
        prop_assert_eq!(once % 2, 1);
        prop_assert_eq!(normalize_start(once), Some(once));
        if s % 2 == 1 {
            prop_assert_eq!(once, s);
        }
    }

    /// **Property**: every emitted value lies in [normalize(s), e], is odd,
    /// is strictly increasing, and has no divisor in [3, sqrt(p)].
    #[test]
    fn prop_search_results_in_range_and_prime(
        s in 1u64..100_000,
        width in 1u64..2_000,
    ) {
        let e = s + width;
        let lo = normalize_start(s).unwrap();
        let mut prev = None;
        for r in PrimeSearch::new(&bounds(s, Some(e)), None).unwrap() {
            prop_assert!(r.value >= lo && r.value <= e, "{} outside [{}, {}]", r.value, lo, e);
            prop_assert_eq!(r.value % 2, 1);
            if let Some(p) = prev {
                prop_assert!(r.value > p);
            }
            prev = Some(r.value);
            let root = isqrt(r.value);
            prop_assert!((3..=root).all(|d| r.value % d != 0), "{} has a divisor", r.value);
        }
    }

    /// **Property**: total divisor tests = tests of emitted primes + tests of
    /// every composite candidate scanned.
    #[test]
    fn prop_total_counts_composites_too(
        s in 1u64..50_000,
        width in 1u64..1_000,
    ) {
        let e = s + width;
        let mut search = PrimeSearch::new(&bounds(s, Some(e)), None).unwrap();
        let emitted: u64 = search.by_ref().map(|r| r.divisor_tests).sum();

        let lo = normalize_start(s).unwrap();
        let composite: u64 = (lo..=e)
            .step_by(2)
            .map(trial_divide)
            .filter(|v| !v.is_prime)
            .map(|v| v.divisor_tests)
            .sum();

        prop_assert_eq!(search.total_divisor_tests(), emitted + composite);
    }

    /// **Property**: end <= start is always rejected before scanning.
    #[test]
    fn prop_non_increasing_bounds_rejected(s in 1u64..1_000_000, back in 0u64..1_000) {
        let e = s.saturating_sub(back);
        let err = PrimeSearch::new(&bounds(s, Some(e)), None).err().unwrap();
        prop_assert_eq!(err.fields(), vec!["end_search"]);
    }

    /// **Property**: stopping right after the k-th result leaves a summary
    /// whose total equals the tests behind the emitted results plus the
    /// composites scanned between them.
    #[test]
    fn prop_cancel_keeps_consistent_totals(s in 1u64..100_000, k in 1usize..20) {
        let stop = AtomicBool::new(false);
        let started = Instant::now();
        let mut search = PrimeSearch::new(&bounds(s, None), Some(&stop)).unwrap();
        let mut last = 0;
        for _ in 0..k {
            last = search.next().unwrap().value;
        }
        stop.store(true, Ordering::Relaxed);
        prop_assert!(search.next().is_none());
        prop_assert!(search.was_cancelled());

        let lo = normalize_start(s).unwrap();
        let expected: u64 = (lo..=last).step_by(2).map(|x| trial_divide(x).divisor_tests).sum();
        let summary = search.summarize(started.elapsed());
        prop_assert_eq!(summary.total_divisor_tests, expected);
        prop_assert!(summary.tests_per_second.is_finite());
    }
}

// == Run parameters =============================================================

proptest! {
    /// **Property**: any decimal u64 pair round-trips through validation.
    #[test]
    fn prop_numeric_bounds_parse(s in 1u64..u64::MAX, e in any::<u64>()) {
        let raw = RawRunParams {
            start_search: s.to_string(),
            end_search: Some(e.to_string()),
            ..RawRunParams::default()
        };
        let p = create_run_parameters(&raw).unwrap();
        prop_assert_eq!(p.bounds.start(), s);
        prop_assert_eq!(p.bounds.end(), Some(e));
    }

    /// **Property**: two non-numeric bounds are reported together, start first.
    #[test]
    fn prop_bad_bounds_aggregate(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        let raw = RawRunParams {
            start_search: a.clone(),
            end_search: Some(b.clone()),
            ..RawRunParams::default()
        };
        let err = create_run_parameters(&raw).unwrap_err();
        prop_assert_eq!(err.fields(), vec!["start_search", "end_search"]);
        prop_assert!(err.errors()[0].message.contains(&a));
        prop_assert!(err.errors()[1].message.contains(&b));
    }
}
