//! # Validation — Aggregated Argument Errors
//!
//! Every check over user-supplied run parameters reports into an
//! [`ErrorCollector`] instead of returning on the first failure. When the
//! checks are done, the collector either yields `Ok(())` or a single
//! [`ValidationError`] carrying every offending field, in the order the
//! checks ran, plus a context label naming the component that rejected them.
//!
//! The `Display` form is the user-facing report printed by the CLI:
//!
//! ```text
//! run_params:
//!   EXCEPTION : Argument error(s) :
//!   start_search : invalid integer value "abc"
//!   end_search : invalid integer value "xyz"
//! ```

use serde::Serialize;

/// One rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A non-empty, ordered list of field errors raised by one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    context: String,
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Error with exactly one field.
    pub fn single(
        context: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationError {
            context: context.into(),
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Field names in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}:", self.context)?;
        writeln!(f, "  EXCEPTION : Argument error(s) :")?;
        for e in &self.errors {
            writeln!(f, "  {} : {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates field errors for one validation pass.
#[derive(Debug)]
pub struct ErrorCollector {
    context: String,
    errors: Vec<FieldError>,
}

impl ErrorCollector {
    pub fn new(context: impl Into<String>) -> Self {
        ErrorCollector {
            context: context.into(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record the error side of `result`, passing the value through.
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                context: self.context,
                errors: self.errors,
            })
        }
    }
}
