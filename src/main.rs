//! # Main — CLI Entry Point
//!
//! Parses the command line, validates it into run parameters, sets up
//! logging and hands off to the search in `cli.rs`.
//!
//! ## Options
//!
//! - `-s/--start_search` (`PRIMES_START_SEARCH`): start of interval, default 1.
//! - `-e/--end_search` (`PRIMES_END_SEARCH`): end of interval; omit to search
//!   until Ctrl-C.
//! - `-o/--output_filename`: also write result lines to this file.
//! - `-D/--diag_print`: debug logging for one routine group (repeatable).
//! - `-x/--examples`: print usage examples and exit.
//!
//! ## Exit codes
//!
//! 0 success, 1 runtime error, 2 bad arguments, 5 search bounds rejected.

mod cli;

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primes",
    version,
    disable_version_flag = true,
    about = "Search an integer interval for primes by trial division"
)]
struct Cli {
    /// Start of interval to be searched for primes
    #[arg(short = 's', long = "start_search", env = "PRIMES_START_SEARCH", default_value = "1")]
    start_search: String,

    /// End of interval to be searched for primes (omit to search until interrupted)
    #[arg(short = 'e', long = "end_search", env = "PRIMES_END_SEARCH")]
    end_search: Option<String>,

    /// Also write result lines to this file
    #[arg(short = 'o', long = "output_filename")]
    output_filename: Option<PathBuf>,

    /// Enable debug output for a routine group (run_params, search, trial_division, output, progress, cli)
    #[arg(short = 'D', long = "diag_print")]
    diag_print: Vec<String>,

    /// Print usage examples then exit
    #[arg(short = 'x', long = "examples")]
    examples: bool,

    /// Print version number then exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.examples {
        cli::print_examples();
        return Ok(ExitCode::SUCCESS);
    }

    let raw = primes::RawRunParams {
        start_search: cli.start_search,
        end_search: cli.end_search,
        output_filename: cli.output_filename,
        diag_print: cli.diag_print,
    };
    let params = primes::create_run_parameters(&raw);

    cli::init_tracing(params.as_ref().map(|p| p.diag_print.as_slice()).unwrap_or(&[]));

    match params {
        Ok(params) => cli::run_search(&params),
        Err(e) => {
            eprint!("{}", e);
            Ok(ExitCode::from(cli::EXIT_BAD_ARGUMENTS))
        }
    }
}
