//! # RunParams — Validated Run Parameters
//!
//! Turns the raw strings handed over by the command line into an immutable
//! [`RunParameters`] in a single step. Every field is checked and every
//! failure is collected, so a user who typos both bounds sees both problems
//! in one report:
//!
//! 1. `start_search`: integer, at least 1.
//! 2. `end_search`: integer when present; absent means unbounded.
//! 3. `output_filename`: must not be a directory, parent must exist.
//! 4. `diag_print`: each entry names a known routine group.
//!
//! The ordering check `end_search > start_search` is intentionally absent
//! here: the search engine performs it when a run starts.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::validation::{ErrorCollector, FieldError, ValidationError};

/// Context label attached to errors raised by this module.
pub const CONTEXT: &str = "run_params";

/// Routine groups accepted by `--diag_print`.
pub const DIAG_GROUPS: &[&str] = &[
    "run_params",
    "search",
    "trial_division",
    "output",
    "progress",
    "cli",
];

/// Inclusive search interval. `end == None` searches until cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchBounds {
    start: u64,
    end: Option<u64>,
}

impl SearchBounds {
    /// Bounds with `start >= 1`. Ordering of `start` and `end` is checked
    /// by the engine, not here.
    pub fn new(start: u64, end: Option<u64>) -> Result<Self, ValidationError> {
        if start == 0 {
            return Err(ValidationError::single(
                CONTEXT,
                "start_search",
                "start_search = 0 : must be >= 1",
            ));
        }
        Ok(SearchBounds { start, end })
    }

    pub fn unbounded(start: u64) -> Result<Self, ValidationError> {
        Self::new(start, None)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> Option<u64> {
        self.end
    }

    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }
}

/// Unvalidated values as they arrive from the CLI.
#[derive(Debug, Clone)]
pub struct RawRunParams {
    pub start_search: String,
    pub end_search: Option<String>,
    pub output_filename: Option<PathBuf>,
    pub diag_print: Vec<String>,
}

impl Default for RawRunParams {
    fn default() -> Self {
        RawRunParams {
            start_search: "1".to_string(),
            end_search: None,
            output_filename: None,
            diag_print: Vec::new(),
        }
    }
}

/// Everything needed to run one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunParameters {
    pub bounds: SearchBounds,
    pub output_filename: Option<PathBuf>,
    pub diag_print: Vec<String>,
}

/// Parse one bound. Leading and trailing whitespace is ignored.
pub fn parse_search_value(field: &str, raw: &str) -> Result<u64, FieldError> {
    let trimmed = raw.trim();
    trimmed.parse::<u64>().map_err(|_| {
        let message = if trimmed.starts_with('-') && trimmed[1..].parse::<u64>().is_ok() {
            format!("invalid value \"{}\" : must be a positive integer", raw)
        } else {
            format!("invalid integer value \"{}\"", raw)
        };
        FieldError {
            field: field.to_string(),
            message,
        }
    })
}

fn check_output_filename(path: &Path) -> Result<(), FieldError> {
    let err = |message: String| FieldError {
        field: "output_filename".to_string(),
        message,
    };
    if path.as_os_str().is_empty() {
        return Err(err("output file name is empty".to_string()));
    }
    if path.is_dir() {
        return Err(err(format!(
            "\"{}\" is a directory, not a file",
            path.display()
        )));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(err(format!(
            "directory \"{}\" for output file \"{}\" does not exist",
            parent.display(),
            path.display()
        ))),
        _ => Ok(()),
    }
}

/// Validate every raw field and build [`RunParameters`], or report all the
/// failures at once.
pub fn create_run_parameters(raw: &RawRunParams) -> Result<RunParameters, ValidationError> {
    debug!(?raw, "creating run parameters");
    let mut errors = ErrorCollector::new(CONTEXT);

    let start = errors.check(parse_search_value("start_search", &raw.start_search));
    if start == Some(0) {
        errors.push("start_search", "start_search = 0 : must be >= 1");
    }

    let end = match &raw.end_search {
        Some(s) => errors.check(parse_search_value("end_search", s)).map(Some),
        None => Some(None),
    };

    if let Some(path) = &raw.output_filename {
        errors.check(check_output_filename(path));
    }

    for name in &raw.diag_print {
        if !DIAG_GROUPS.contains(&name.as_str()) {
            errors.push(
                "diag_print",
                format!(
                    "unknown routine group \"{}\" : valid groups are {:?}",
                    name, DIAG_GROUPS
                ),
            );
        }
    }

    errors.finish()?;

    let bounds = match (start, end) {
        (Some(start), Some(end)) => SearchBounds::new(start, end)?,
        _ => {
            return Err(ValidationError::single(
                CONTEXT,
                "start_search",
                "search bounds could not be parsed",
            ))
        }
    };
    let params = RunParameters {
        bounds,
        output_filename: raw.output_filename.clone(),
        diag_print: raw.diag_print.clone(),
    };
    debug!(?params, "run parameters created");
    Ok(params)
}
