//! Trampolined tree-walking evaluator.
//!
//! The evaluator runs parsed expressions (`Expr`) against a scope [`Box`] and
//! produces a result `Box`.
//!
//! ## Design Principles
//!
//! - **Never recurse**: evaluation keeps an explicit frame stack and value
//!   stack on the heap, so arbitrarily deep trees cannot overflow the host
//!   stack.
//! - **Never panic**: broken invariants surface as [`EvalError::Internal`].
//! - **Bounded on request**: [`EvaluatorOptions`] can cap live frames and
//!   total steps.
//!
//! ## Example
//!
//! ```
//! use holo_core::{evaluator, parser, values::Box};
//!
//! let expr = parser::parse("a = 3; a").unwrap();
//! let scope = Box::new();
//! let result = evaluator::eval(&scope, &expr).unwrap();
//! assert_eq!(result.as_integer(), Some(3));
//! ```

mod actor;
mod error;
mod frame;
mod options;
mod stack;

#[cfg(test)]
mod actor_test;

pub use actor::Actor;
pub use error::{EvalError, ResourceExceeded};
pub use options::EvaluatorOptions;

use std::sync::Arc;

use crate::parser::Expr;
use crate::values::Box;

/// Evaluate `expr` in `scope` with no resource limits.
pub fn eval(scope: &Box, expr: &Arc<Expr>) -> Result<Box, EvalError> {
    eval_with_options(scope, expr, EvaluatorOptions::default())
}

/// Evaluate `expr` in `scope` with custom limits.
///
/// ## Example
///
/// ```
/// use holo_core::evaluator::{self, EvalError, EvaluatorOptions, ResourceExceeded};
/// use holo_core::{parser, values::Box};
///
/// let expr = parser::parse("{ { { 1 } } }").unwrap();
/// let options = EvaluatorOptions { max_frames: Some(2), max_steps: None };
/// let err = evaluator::eval_with_options(&Box::new(), &expr, options).unwrap_err();
/// assert_eq!(
///     err,
///     EvalError::ResourceExceeded(ResourceExceeded::FrameLimit { max_frames: 2 })
/// );
/// ```
pub fn eval_with_options(
    scope: &Box,
    expr: &Arc<Expr>,
    options: EvaluatorOptions,
) -> Result<Box, EvalError> {
    Actor::with_options(options).evaluate(scope, expr)
}
