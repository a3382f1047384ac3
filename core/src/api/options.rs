//! Configuration options for the Holo engine.

use crate::evaluator::EvaluatorOptions;
use crate::parser::DEFAULT_MAX_DEPTH;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use holo_core::api::CompilationOptions;
///
/// let options = CompilationOptions { max_depth: 64 };
/// assert_eq!(CompilationOptions::default().max_depth, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Maximum nesting of boxes and assignments the parser accepts.
    ///
    /// Default: 256
    pub max_depth: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration options for program execution.
///
/// These options bound the resources a single run may use.
///
/// # Example
///
/// ```
/// use holo_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_frames: Some(10_000),
///     max_steps: Some(1_000_000),
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Maximum number of live evaluation frames (if Some).
    ///
    /// Default: None
    pub max_frames: Option<usize>,

    /// Maximum number of evaluation steps (if Some).
    ///
    /// Set to `None` for unlimited steps (be careful with untrusted boxes:
    /// a method that calls itself never returns).
    ///
    /// Default: None
    pub max_steps: Option<usize>,
}

impl From<&ExecutionOptions> for EvaluatorOptions {
    fn from(options: &ExecutionOptions) -> Self {
        EvaluatorOptions {
            max_frames: options.max_frames,
            max_steps: options.max_steps,
        }
    }
}

/// Configuration options for the Holo engine.
///
/// # Example
///
/// ```
/// use holo_core::api::{CompilationOptions, EngineOptions, ExecutionOptions};
///
/// let options = EngineOptions {
///     default_compilation_options: CompilationOptions::default(),
///     default_execution_options: ExecutionOptions {
///         max_frames: None,
///         max_steps: Some(10_000),
///     },
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Options used by `Engine::compile()`.
    pub default_compilation_options: CompilationOptions,

    /// Options used when running compiled programs.
    pub default_execution_options: ExecutionOptions,
}
