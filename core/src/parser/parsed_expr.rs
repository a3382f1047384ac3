use core::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::values::Box;

/// Signature of a host-provided function reachable through [`Expr::ExternalCall`].
pub type ExternalFn = fn(&[Box]) -> Box;

/// Opaque handle to a host function.
///
/// Compared by address, so two handles are equal only when they name the
/// same function.
#[derive(Clone, Copy)]
pub struct ExternalFunction(pub ExternalFn);

impl PartialEq for ExternalFunction {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::fn_addr_eq(self.0, other.0)
    }
}

impl fmt::Debug for ExternalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalFunction({:p})", self.0 as *const ())
    }
}

/// Expression tree produced by the parser.
///
/// Children are shared through `Arc` so that evaluator frames and method
/// bodies can hold on to a subtree without copying it. Nodes are never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Multi(Vec<Arc<Expr>>),
    Get {
        target: Option<Arc<Expr>>,
        member: String,
    },
    Assign {
        target: Option<Arc<Expr>>,
        member: String,
        value: Arc<Expr>,
    },
    Call {
        target: Arc<Expr>,
        argument: Arc<Expr>,
    },
    BoxLiteral(Option<Arc<Expr>>),
    StringLiteral(Vec<u8>),
    IntegerLiteral(i64),
    RealLiteral(f64),
    ExternalCall(ExternalFunction),
}

impl Expr {
    pub fn multi(exprs: impl IntoIterator<Item = Arc<Expr>>) -> Arc<Expr> {
        Arc::new(Expr::Multi(exprs.into_iter().collect()))
    }

    pub fn get(member: impl Into<String>) -> Arc<Expr> {
        Arc::new(Expr::Get {
            target: None,
            member: member.into(),
        })
    }

    pub fn get_on(target: Arc<Expr>, member: impl Into<String>) -> Arc<Expr> {
        Arc::new(Expr::Get {
            target: Some(target),
            member: member.into(),
        })
    }

    pub fn assign(member: impl Into<String>, value: Arc<Expr>) -> Arc<Expr> {
        Arc::new(Expr::Assign {
            target: None,
            member: member.into(),
            value,
        })
    }

    pub fn assign_on(target: Arc<Expr>, member: impl Into<String>, value: Arc<Expr>) -> Arc<Expr> {
        Arc::new(Expr::Assign {
            target: Some(target),
            member: member.into(),
            value,
        })
    }

    pub fn call(target: Arc<Expr>, argument: Arc<Expr>) -> Arc<Expr> {
        Arc::new(Expr::Call { target, argument })
    }

    pub fn boxed(body: Option<Arc<Expr>>) -> Arc<Expr> {
        Arc::new(Expr::BoxLiteral(body))
    }

    pub fn string(content: impl Into<Vec<u8>>) -> Arc<Expr> {
        Arc::new(Expr::StringLiteral(content.into()))
    }

    pub fn integer(value: i64) -> Arc<Expr> {
        Arc::new(Expr::IntegerLiteral(value))
    }

    pub fn real(value: f64) -> Arc<Expr> {
        Arc::new(Expr::RealLiteral(value))
    }

    pub fn external(function: ExternalFn) -> Arc<Expr> {
        Arc::new(Expr::ExternalCall(ExternalFunction(function)))
    }

    /// Stable name of the variant, used in traces and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Multi(_) => "Multi",
            Expr::Get { .. } => "Get",
            Expr::Assign { .. } => "Assign",
            Expr::Call { .. } => "Call",
            Expr::BoxLiteral(_) => "BoxLiteral",
            Expr::StringLiteral(_) => "StringLiteral",
            Expr::IntegerLiteral(_) => "IntegerLiteral",
            Expr::RealLiteral(_) => "RealLiteral",
            Expr::ExternalCall(_) => "ExternalCall",
        }
    }

    /// Moves every direct child out of this node into `out`.
    ///
    /// Mandatory children are swapped for a shared empty placeholder.
    fn detach_children(&mut self, out: &mut Vec<Arc<Expr>>) {
        match self {
            Expr::Multi(exprs) => out.append(exprs),
            Expr::Get { target, .. } => out.extend(target.take()),
            Expr::Assign { target, value, .. } => {
                out.extend(target.take());
                out.push(core::mem::replace(value, placeholder()));
            }
            Expr::Call { target, argument } => {
                out.push(core::mem::replace(target, placeholder()));
                out.push(core::mem::replace(argument, placeholder()));
            }
            Expr::BoxLiteral(body) => out.extend(body.take()),
            Expr::StringLiteral(_)
            | Expr::IntegerLiteral(_)
            | Expr::RealLiteral(_)
            | Expr::ExternalCall(_) => {}
        }
    }
}

static PLACEHOLDER: Lazy<Arc<Expr>> = Lazy::new(|| Arc::new(Expr::Multi(Vec::new())));

fn placeholder() -> Arc<Expr> {
    Arc::clone(&PLACEHOLDER)
}

// Deeply nested trees would otherwise be torn down recursively, tying the
// maximum tree depth to the host stack again.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(mut expr) = Arc::try_unwrap(child) {
                expr.detach_children(&mut pending);
            }
        }
    }
}
