use std::sync::Arc;

use crate::parser::Expr;

/// The callable behaviour of a box: parameter names and a body.
///
/// A method without a body is not callable. Cloning is cheap; both parts are
/// shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxMethod {
    pub parameters: Arc<[String]>,
    pub body: Option<Arc<Expr>>,
}

impl BoxMethod {
    pub fn new<P, S>(parameters: P, body: Arc<Expr>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
            body: Some(body),
        }
    }

    pub fn is_callable(&self) -> bool {
        self.body.is_some()
    }
}
