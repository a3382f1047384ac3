//! Compiled Holo programs.

use std::sync::Arc;

use super::{Engine, Error};
use crate::parser::Expr;
use crate::values::Box;

/// A parsed Holo program ready for execution.
///
/// Compiled programs own their expression tree and can be run any number of
/// times, on any engine, and from any thread.
///
/// # Example
///
/// ```
/// use holo_core::api::Engine;
/// use holo_core::values::Box;
///
/// let engine = Engine::default();
/// let scope = Box::new();
///
/// engine.compile("counter = 1").unwrap().run_in(&engine, &scope).unwrap();
/// let value = engine.compile("counter").unwrap().run_in(&engine, &scope).unwrap();
/// assert_eq!(value.as_integer(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    expr: Arc<Expr>,
    source: Arc<str>,
}

impl CompiledProgram {
    pub(crate) fn new(expr: Arc<Expr>, source: &str) -> Self {
        Self {
            expr,
            source: Arc::from(source),
        }
    }

    /// The parsed expression tree.
    pub fn expr(&self) -> &Arc<Expr> {
        &self.expr
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run against a fresh, empty root box.
    pub fn run(&self, engine: &Engine) -> Result<Box, Error> {
        self.run_in(engine, &Box::new())
    }

    /// Run against `scope`. Top-level assignments are stored in `scope`.
    pub fn run_in(&self, engine: &Engine, scope: &Box) -> Result<Box, Error> {
        Ok(engine.actor().evaluate(scope, &self.expr)?)
    }
}
