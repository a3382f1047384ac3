use crate::api::{Diagnostic, Severity};
use crate::parser::Span;

/// Parser error with the source it was raised against.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// A character that cannot start or continue the expected construct
    UnexpectedChar { expected: &'static str, found: char },
    /// Input ended while a construct was still required
    UnexpectedEnd { expected: &'static str },
    /// A string literal without its closing quote
    UnterminatedString,
    /// Badly placed `.` or `_`, or a missing digit
    InvalidNumber { reason: &'static str },
    /// A well-formed number that does not fit its type
    NumberOutOfRange { text: String },
    /// A box literal without its closing `}`
    UnclosedBox { found: Option<char> },
    /// Content left over after a complete program
    TrailingInput { found: char },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { depth: usize, max_depth: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, span: Span) -> Self {
        Self {
            kind,
            source: source.to_string(),
            span,
        }
    }

    /// Human-readable message, without location.
    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedChar { expected, found } => {
                format!("Expected {}, got `{}`", expected, found)
            }
            ParseErrorKind::UnexpectedEnd { expected } => {
                format!("Expected {}, got end of input", expected)
            }
            ParseErrorKind::UnterminatedString => {
                "Expected end of string, got end of input".to_string()
            }
            ParseErrorKind::InvalidNumber { reason } => reason.to_string(),
            ParseErrorKind::NumberOutOfRange { text } => {
                format!("Number `{}` is out of range", text)
            }
            ParseErrorKind::UnclosedBox { found: Some(c) } => {
                format!("Expected `}}` to end box, got `{}`", c)
            }
            ParseErrorKind::UnclosedBox { found: None } => {
                "Expected `}` to end box, got end of input".to_string()
            }
            ParseErrorKind::TrailingInput { found } => format!("Expected `;`, got `{}`", found),
            ParseErrorKind::MaxDepthExceeded { max_depth, .. } => format!(
                "Expression nesting depth exceeds maximum of {} levels",
                max_depth
            ),
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedChar { .. } | ParseErrorKind::UnexpectedEnd { .. } => {
                ("P001", None)
            }
            ParseErrorKind::UnterminatedString => {
                ("P002", Some("Add the missing closing quote"))
            }
            ParseErrorKind::InvalidNumber { .. } | ParseErrorKind::NumberOutOfRange { .. } => {
                ("P003", Some("Check the number format"))
            }
            ParseErrorKind::UnclosedBox { .. } => ("P004", Some("Add the missing `}`")),
            ParseErrorKind::TrailingInput { .. } => {
                ("P005", Some("Separate expressions with `;`"))
            }
            ParseErrorKind::MaxDepthExceeded { .. } => {
                ("P006", Some("Reduce nesting or simplify the expression"))
            }
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.message(),
            span: self.span.clone(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ParseError {}
