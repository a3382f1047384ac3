//! Public error types for the Holo API.
//!
//! Internal errors (`ParseError`, `EvalError`) are converted to these types at
//! the API boundary.

use core::fmt;

use thiserror::Error;

use crate::evaluator::EvalError;
use crate::parser::{ParseError, Span};

/// Public error type for all Holo operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source did not parse.
    ///
    /// Carries the source text so diagnostics can be rendered later.
    #[error("Compilation failed with {} error(s)", error_count(.diagnostics))]
    Compilation {
        diagnostics: Vec<Diagnostic>,
        src: String,
    },

    /// Evaluation failed (missing variable, uncallable box, ...).
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A frame or step limit was hit.
    #[error("Resource limit exceeded: {0}")]
    ResourceExceeded(String),

    /// The program used a feature that is reserved but not implemented.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the problem.
    pub span: Span,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "P001").
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            src: err.source,
        }
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::ResourceExceeded(res_err) => Error::ResourceExceeded(res_err.to_string()),
            EvalError::Unsupported { feature } => Error::Unsupported(feature.to_string()),
            other => Error::Runtime(other.to_string()),
        }
    }
}
