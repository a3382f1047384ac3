use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::error::{EvalError, ResourceExceeded};
use super::frame::Frame;
use super::options::EvaluatorOptions;
use super::stack::Stack;
use crate::parser::Expr;
use crate::values::{Box, BoxMethod};

/// Runs expression trees against boxes.
///
/// An actor evaluates one tree at a time: concurrent calls to
/// [`Actor::evaluate`] wait for each other. Evaluation never recurses on the
/// host stack, so nesting depth is limited only by memory and by
/// [`EvaluatorOptions::max_frames`].
#[derive(Debug, Default)]
pub struct Actor {
    options: EvaluatorOptions,
    lock: Mutex<()>,
}

impl Actor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvaluatorOptions) -> Self {
        Self {
            options,
            lock: Mutex::new(()),
        }
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Evaluates `expr` with `scope` as the ambient box.
    ///
    /// Variables assigned without a target land in `scope`, so a caller that
    /// reuses the same scope sees earlier assignments.
    pub fn evaluate(&self, scope: &Box, expr: &Arc<Expr>) -> Result<Box, EvalError> {
        let _guard = self.lock.lock();
        debug!(kind = expr.kind_name(), "evaluation started");

        let mut machine = Machine::new(&self.options);
        let result = machine.run(scope.clone(), expr.clone());

        match &result {
            Ok(_) => debug!(steps = machine.steps, "evaluation finished"),
            Err(err) => debug!(steps = machine.steps, error = %err, "evaluation failed"),
        }
        result
    }
}

/// What the dispatch loop does with the current frame after one step.
enum Transition {
    /// Stay on this frame and move to its next step.
    Advance,
    /// Move to the next step, then evaluate a child expression in `scope`.
    Enter(Box, Arc<Expr>),
    /// This frame has left its value on the stack.
    Leave,
}

/// State of a single evaluation.
struct Machine<'a> {
    options: &'a EvaluatorOptions,
    frames: Stack<Frame>,
    values: Stack<Box>,
    steps: usize,
}

impl<'a> Machine<'a> {
    fn new(options: &'a EvaluatorOptions) -> Self {
        Self {
            options,
            frames: Stack::with_limit(options.max_frames),
            values: Stack::new(),
            steps: 0,
        }
    }

    fn run(&mut self, scope: Box, expr: Arc<Expr>) -> Result<Box, EvalError> {
        // Sentinel: the result of a program that leaves nothing behind.
        self.values.push(Box::null());
        self.enter(scope, expr)?;

        loop {
            let depth = self.frames.len();
            let Some(frame) = self.frames.peek_mut() else {
                break;
            };
            if let Some(max_steps) = self.options.max_steps {
                if self.steps >= max_steps {
                    return Err(ResourceExceeded::StepLimit { max_steps }.into());
                }
            }
            self.steps += 1;

            trace!(
                kind = frame.expr.kind_name(),
                step = frame.step,
                frames = depth,
                values = self.values.len(),
                "step"
            );

            match step(frame, &mut self.values)? {
                Transition::Advance => frame.step += 1,
                Transition::Enter(scope, child) => {
                    frame.step += 1;
                    self.enter(scope, child)?;
                }
                Transition::Leave => {
                    self.frames.pop();
                }
            }
        }

        self.values
            .pop()
            .ok_or_else(|| EvalError::internal("value stack empty at end of evaluation"))
    }

    fn enter(&mut self, scope: Box, expr: Arc<Expr>) -> Result<(), EvalError> {
        let frame = Frame::new(scope, expr, self.values.len());
        self.frames
            .try_push(frame)
            .map_err(|full| ResourceExceeded::FrameLimit {
                max_frames: full.limit,
            })?;
        Ok(())
    }
}

fn pop(values: &mut Stack<Box>) -> Result<Box, EvalError> {
    values
        .pop()
        .ok_or_else(|| EvalError::internal("value stack underflow"))
}

fn lookup(target: &Box, member: &str) -> Result<Box, EvalError> {
    target
        .get_variable(member)
        .ok_or_else(|| EvalError::VariableNotFound {
            name: member.to_string(),
        })
}

/// Advances `frame` by one step.
///
/// Every frame leaves exactly one more value on the stack than it found
/// there.
fn step(frame: &Frame, values: &mut Stack<Box>) -> Result<Transition, EvalError> {
    let scope = &frame.scope;

    let transition = match (&*frame.expr, frame.step) {
        (Expr::Multi(items), i) if i < items.len() => {
            values.truncate(frame.baseline);
            Transition::Enter(scope.clone(), items[i].clone())
        }
        (Expr::Multi(items), _) => {
            if items.is_empty() {
                values.push(Box::null());
            }
            Transition::Leave
        }

        (Expr::Get { target: None, member }, 0) => {
            values.push(lookup(scope, member)?);
            Transition::Advance
        }
        (Expr::Get { target: Some(target), .. }, 0) => {
            Transition::Enter(scope.clone(), target.clone())
        }
        (Expr::Get { target: Some(_), member }, 1) => {
            let target = pop(values)?;
            values.push(lookup(&target, member)?);
            Transition::Advance
        }
        (Expr::Get { .. }, _) => Transition::Leave,

        (Expr::Assign { target: None, value, .. }, 0) => {
            Transition::Enter(scope.clone(), value.clone())
        }
        (Expr::Assign { target: None, member, .. }, 1) => {
            let value = pop(values)?;
            scope.set_variable(member, Some(value.clone()));
            values.push(value);
            Transition::Advance
        }
        (Expr::Assign { target: None, .. }, _) => Transition::Leave,
        (Expr::Assign { target: Some(target), .. }, 0) => {
            Transition::Enter(scope.clone(), target.clone())
        }
        (Expr::Assign { target: Some(_), value, .. }, 1) => {
            Transition::Enter(scope.clone(), value.clone())
        }
        (Expr::Assign { target: Some(_), member, .. }, 2) => {
            let value = pop(values)?;
            let target = pop(values)?;
            target.set_variable(member, Some(value.clone()));
            values.push(value);
            Transition::Advance
        }
        (Expr::Assign { .. }, _) => Transition::Leave,

        (Expr::Call { target, .. }, 0) => Transition::Enter(scope.clone(), target.clone()),
        (Expr::Call { argument, .. }, 1) => Transition::Enter(scope.clone(), argument.clone()),
        (Expr::Call { .. }, 2) => {
            let argument = pop(values)?;
            let target = pop(values)?;
            let method = target.resolve_method()?;
            let Some(body) = method.body.clone() else {
                return Err(EvalError::NotCallable);
            };
            let call_scope = call_scope(target, method, argument);
            Transition::Enter(call_scope, body)
        }
        (Expr::Call { .. }, _) => Transition::Leave,

        (Expr::BoxLiteral(body), 0) => {
            let child = Box::new();
            values.push(child.clone());
            match body {
                Some(body) => Transition::Enter(child, body.clone()),
                None => Transition::Advance,
            }
        }
        (Expr::BoxLiteral(_), 1) => {
            // Drop whatever the body produced; the box itself is the result.
            values.truncate(frame.baseline + 1);
            Transition::Advance
        }
        (Expr::BoxLiteral(_), _) => Transition::Leave,

        (Expr::StringLiteral(bytes), 0) => {
            values.push(Box::from_string(bytes.clone()));
            Transition::Advance
        }
        (Expr::IntegerLiteral(value), 0) => {
            values.push(Box::from_integer(*value));
            Transition::Advance
        }
        (Expr::RealLiteral(value), 0) => {
            values.push(Box::from_real(*value));
            Transition::Advance
        }
        (Expr::StringLiteral(_) | Expr::IntegerLiteral(_) | Expr::RealLiteral(_), _) => {
            Transition::Leave
        }

        (Expr::ExternalCall(_), _) => {
            return Err(EvalError::Unsupported {
                feature: "external calls",
            });
        }
    };

    Ok(transition)
}

/// Builds the scope a method body runs in.
///
/// The scope's only component is the call target. When the argument is a
/// list, parameter `i` is bound to item `i` and parameters beyond the end of
/// the list stay unbound. Any other argument is bound whole to the first
/// parameter.
fn call_scope(target: Box, method: BoxMethod, argument: Box) -> Box {
    let parameters = method.parameters.clone();
    let scope = Box::from_parts(Box::from_list([target]), method, None);

    match argument.as_list() {
        Some(items) => {
            for (parameter, item) in parameters.iter().zip(items) {
                scope.set_variable(parameter, Some(item));
            }
        }
        None => {
            if let Some(first) = parameters.first() {
                scope.set_variable(first, Some(argument));
            }
        }
    }
    scope
}
