pub mod output;
pub mod progress;
pub mod run_params;
pub mod search;
pub mod trial_division;
pub mod validation;

use std::sync::atomic::{AtomicBool, Ordering};

pub use run_params::{create_run_parameters, RawRunParams, RunParameters, SearchBounds};
pub use search::{print_primes, PrimeResult, PrimeSearch, SearchContext, SearchSummary};
pub use validation::{FieldError, ValidationError};

/// Cancellation source polled by the search loop once per candidate.
pub trait StopSignal: Send + Sync {
    fn is_stop_requested(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn is_stop_requested(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}
