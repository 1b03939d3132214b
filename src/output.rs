//! # Output — Result and Summary Lines
//!
//! Text formatting for the search output, plus [`ResultSink`], the writer
//! that sends every line to stdout and optionally tees it into a plain text
//! file. Each line is flushed as soon as it is written so results show up
//! while an unbounded search is still running.
//!
//! ```text
//! 17 [2]
//! 19 [2]
//! total divisors tested = 10
//! total run time        = 0:00:00.000042
//! divisors per second   = 238095.23809523808
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::search::{PrimeResult, SearchSummary};

pub fn format_result(result: &PrimeResult) -> String {
    format!("{} [{}]", result.value, result.divisor_tests)
}

/// Elapsed seconds as `H:MM:SS.ffffff`.
pub fn format_run_time(seconds: f64) -> String {
    let micros = (seconds.max(0.0) * 1_000_000.0).round() as u64;
    let total_secs = micros / 1_000_000;
    let frac = micros % 1_000_000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{}:{:02}:{:02}.{:06}", h, m, s, frac)
}

pub fn format_summary(summary: &SearchSummary) -> [String; 3] {
    [
        format!("total divisors tested = {}", summary.total_divisor_tests),
        format!(
            "total run time        = {}",
            format_run_time(summary.elapsed_seconds)
        ),
        format!("divisors per second   = {}", summary.tests_per_second),
    ]
}

pub fn write_result<W: Write>(w: &mut W, result: &PrimeResult) -> io::Result<()> {
    writeln!(w, "{}", format_result(result))?;
    w.flush()
}

pub fn write_summary<W: Write>(w: &mut W, summary: &SearchSummary) -> io::Result<()> {
    for line in format_summary(summary) {
        writeln!(w, "{}", line)?;
    }
    w.flush()
}

/// Stdout, optionally teed into a file.
pub struct ResultSink {
    stdout: Stdout,
    file: Option<BufWriter<File>>,
}

impl ResultSink {
    pub fn stdout() -> Self {
        ResultSink {
            stdout: io::stdout(),
            file: None,
        }
    }

    /// Stdout plus `path`, created or truncated.
    pub fn with_file(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Error opening output file \"{}\"", path.display()))?;
        debug!(path = %path.display(), "output file opened");
        Ok(ResultSink {
            stdout: io::stdout(),
            file: Some(BufWriter::new(file)),
        })
    }

    pub fn from_option(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::with_file(p),
            None => Ok(Self::stdout()),
        }
    }
}

impl Write for ResultSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        if let Some(f) = self.file.as_mut() {
            f.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        if let Some(f) = self.file.as_mut() {
            f.flush()?;
        }
        Ok(())
    }
}
