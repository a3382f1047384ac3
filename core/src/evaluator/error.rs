//! Evaluation errors.
//!
//! # Error Categories
//!
//! - **Binding errors**: a `Get` named a variable the box does not have.
//! - **Call errors**: the call target has no method body, or its `call`
//!   delegation chain loops.
//! - **Unsupported**: features that are reserved but not implemented
//!   (external calls).
//! - **Resource exceeded**: a configured frame or step limit was hit.
//! - **Internal**: broken evaluator invariants. These are bugs, not user
//!   errors.
//!
//! Every error aborts the evaluation that raised it.

use thiserror::Error;

/// Runtime evaluation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Variable `{name}` not found")]
    VariableNotFound { name: String },

    #[error("Call target has no callable method")]
    NotCallable,

    #[error("`call` delegation chain forms a cycle")]
    DelegationCycle,

    #[error("Unsupported: {feature}")]
    Unsupported { feature: &'static str },

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceeded),

    #[error("Internal evaluator error: {message}")]
    Internal { message: String },
}

/// Resource limit exceeded errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceExceeded {
    #[error("Evaluation frame stack exceeds maximum of {max_frames} frames")]
    FrameLimit { max_frames: usize },

    #[error("Evaluation exceeds maximum of {max_steps} steps")]
    StepLimit { max_steps: usize },
}

impl EvalError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        EvalError::Internal {
            message: message.into(),
        }
    }
}
