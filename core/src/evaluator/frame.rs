use std::sync::Arc;

use crate::parser::Expr;
use crate::values::Box;

/// One in-progress expression evaluation.
#[derive(Debug)]
pub(crate) struct Frame {
    /// Box that unqualified `Get` and `Assign` operate on.
    pub scope: Box,
    pub expr: Arc<Expr>,
    /// How far this expression's state machine has advanced.
    pub step: usize,
    /// Value stack length when the frame was pushed.
    pub baseline: usize,
}

impl Frame {
    pub fn new(scope: Box, expr: Arc<Expr>, baseline: usize) -> Self {
        Self {
            scope,
            expr,
            step: 0,
            baseline,
        }
    }
}
