//! # CLI Execution Functions
//!
//! Kept out of `main.rs` so the entry point stays declarative: logging setup,
//! the stop-signal handler, search execution with exit-code mapping, and the
//! examples text.

use anyhow::Result;
use primes::{print_primes, RunParameters, SearchContext, ValidationError};
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use primes::output::ResultSink;
use primes::search::check_bounds;

pub const EXIT_BAD_ARGUMENTS: u8 = 2;
pub const EXIT_BAD_BOUNDS: u8 = 5;

// ── Logging ─────────────────────────────────────────────────────

/// Structured logging to stderr: LOG_FORMAT=json for machine consumption,
/// human-readable otherwise. `RUST_LOG` sets the base filter (default
/// `info`); each `--diag_print` group adds a debug directive for its module.
pub fn init_tracing(diag_print: &[String]) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    for group in diag_print {
        match format!("primes::{}=debug", group).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("ignoring diag_print group {}: {}", group, e),
        }
    }

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

// ── Stop Signal ─────────────────────────────────────────────────

/// Spawn a helper thread that raises the returned flag on SIGINT/SIGTERM.
/// The search checks it once per candidate and then finishes normally,
/// so an interrupted unbounded run still prints its summary.
///
/// Returns only after the handlers are registered, so a signal arriving
/// once the search has started is never lost to the default handler.
pub fn install_stop_handler() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let (ready_tx, ready_rx) = mpsc::channel::<()>();
    std::thread::spawn(move || {
        let sig_rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                warn!(error = %e, "signal handler runtime unavailable; Ctrl-C will abort");
                return;
            }
        };
        sig_rt.block_on(async {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{signal, SignalKind};
                let handlers = signal(SignalKind::interrupt())
                    .and_then(|int| signal(SignalKind::terminate()).map(|term| (int, term)));
                match handlers {
                    Ok((mut sigint, mut sigterm)) => {
                        let _ = ready_tx.send(());
                        tokio::select! {
                            _ = sigint.recv() => {},
                            _ = sigterm.recv() => {},
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "signal handlers unavailable; Ctrl-C will abort");
                        return;
                    }
                }
            }
            #[cfg(not(unix))]
            {
                let ctrl_c = tokio::signal::ctrl_c();
                let _ = ready_tx.send(());
                let _ = ctrl_c.await;
            }
            info!("Stop requested, finishing current candidate");
            stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
        });
    });
    // A dropped sender means registration failed; the search still runs.
    let _ = ready_rx.recv();
    stop
}

// ── Search ──────────────────────────────────────────────────────

/// Run one search with validated parameters and map the outcome to an exit
/// code. Bounds rejected by the engine exit with 5; I/O failures propagate.
pub fn run_search(params: &RunParameters) -> Result<ExitCode> {
    info!(
        params = %serde_json::to_string(params)?,
        "primes starting"
    );

    // Reject bad bounds before the output file is created or truncated.
    if let Err(v) = check_bounds(&params.bounds) {
        eprint!("{}", v);
        return Ok(ExitCode::from(EXIT_BAD_BOUNDS));
    }

    let stop = if params.bounds.is_bounded() {
        None
    } else {
        Some(install_stop_handler())
    };

    let sink = ResultSink::from_option(params.output_filename.as_deref())?;
    let mut ctx = SearchContext::new(sink);
    let signal = stop.as_deref().map(|s| s as &dyn primes::StopSignal);

    match print_primes(&params.bounds, &mut ctx, signal) {
        Ok(summary) => {
            debug!(summary = %serde_json::to_string(&summary)?, "search summary");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => match e.downcast_ref::<ValidationError>() {
            Some(v) => {
                eprint!("{}", v);
                Ok(ExitCode::from(EXIT_BAD_BOUNDS))
            }
            None => Err(e),
        },
    }
}

// ── Help Text ───────────────────────────────────────────────────

pub const EXAMPLES: &str = "\
primes examples:

  # primes in [1, 100]
  primes -s 1 -e 100

  # primes from one million until Ctrl-C
  primes --start_search 1000000

  # keep a copy of the result lines and trace the search loop
  primes -s 1 -e 100000 -o primes.txt -D search
";

pub fn print_examples() {
    print!("{}", EXAMPLES);
}
