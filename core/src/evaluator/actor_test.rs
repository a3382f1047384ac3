//! Unit tests for the evaluator.

use super::*;
use crate::parser::{self, Expr};
use crate::test_utils::init_test_logging;
use crate::values::{Box, BoxMethod, CALL, COMPONENTS, Kind};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn run(scope: &Box, source: &str) -> Result<Box, EvalError> {
    let expr = parser::parse(source).unwrap();
    eval(scope, &expr)
}

fn callable(parameters: &[&str], body: Arc<Expr>) -> Box {
    Box::with_method(BoxMethod::new(parameters.iter().copied(), body))
}

#[test]
fn test_driver_program() {
    init_test_logging();
    let root = Box::new();
    let result = run(&root, "\"hello there\"; 4.6; { a = 3; };").unwrap();

    assert!(!Box::ptr_eq(&result, &root));
    assert_eq!(result.get_variable("a").unwrap().as_integer(), Some(3));
    // The box body ran in the new box, not in the root.
    assert!(root.get_variable("a").is_none());
}

#[test]
fn test_multi_yields_last_value() {
    let result = run(&Box::new(), "1; 'two'; 3.5").unwrap();
    assert_eq!(result.as_real(), Some(3.5));
}

#[test]
fn test_empty_program_is_null() {
    assert!(run(&Box::new(), "").unwrap().is_null());
    assert!(eval(&Box::new(), &Expr::multi([])).unwrap().is_null());
}

#[test]
fn test_literals() {
    let scope = Box::new();
    assert_eq!(run(&scope, "-42").unwrap().as_integer(), Some(-42));
    assert_eq!(run(&scope, "1_000").unwrap().as_integer(), Some(1000));
    assert_eq!(run(&scope, "0.25").unwrap().as_real(), Some(0.25));
    assert_eq!(
        run(&scope, "'single'").unwrap().as_string_bytes(),
        Some(&b"single"[..])
    );

    let value = run(&scope, "7").unwrap();
    assert!(value.is_kind(Kind::Integer));
}

#[test]
fn test_literals_are_fresh_each_time() {
    let scope = Box::new();
    let first = run(&scope, "1").unwrap();
    let second = run(&scope, "1").unwrap();
    assert!(!Box::ptr_eq(&first, &second));
}

#[test]
fn test_assign_then_get() {
    let scope = Box::new();
    let result = run(&scope, "a = 3; a").unwrap();
    assert_eq!(result.as_integer(), Some(3));
    assert_eq!(scope.get_variable("a").unwrap().as_integer(), Some(3));
}

#[test]
fn test_assign_yields_assigned_value() {
    let scope = Box::new();
    let result = run(&scope, "a = b = 5").unwrap();
    let a = scope.get_variable("a").unwrap();
    let b = scope.get_variable("b").unwrap();
    assert!(Box::ptr_eq(&result, &a));
    assert!(Box::ptr_eq(&a, &b));
}

#[test]
fn test_assignment_shares_box() {
    let scope = Box::new();
    run(&scope, "a = {}; b = a").unwrap();
    let a = scope.get_variable("a").unwrap();
    let b = scope.get_variable("b").unwrap();
    assert!(Box::ptr_eq(&a, &b));
}

#[test]
fn test_reassignment_replaces() {
    let scope = Box::new();
    let result = run(&scope, "a = 1; a = 'x'; a").unwrap();
    assert_eq!(result.as_string_bytes(), Some(&b"x"[..]));
}

#[test]
fn test_missing_variable() {
    let err = run(&Box::new(), "missing").unwrap_err();
    assert_eq!(
        err,
        EvalError::VariableNotFound {
            name: "missing".to_string()
        }
    );
    assert_eq!(err.to_string(), "Variable `missing` not found");
}

#[test]
fn test_box_body_does_not_see_outer_scope() {
    let err = run(&Box::new(), "a = 1; { b = a }").unwrap_err();
    assert_eq!(
        err,
        EvalError::VariableNotFound {
            name: "a".to_string()
        }
    );
}

#[test]
fn test_independent_scopes() {
    let first = Box::new();
    let second = Box::new();
    run(&first, "a = 1").unwrap();
    assert!(run(&second, "a").is_err());
    assert_eq!(run(&first, "a").unwrap().as_integer(), Some(1));
}

#[test]
fn test_box_literal_without_body() {
    let result = eval(&Box::new(), &Expr::boxed(None)).unwrap();
    assert!(result.variable_names().is_empty());
}

#[test]
fn test_nested_box_literals() {
    let result = run(&Box::new(), "{ inner = { x = 1 }; y = 2 }").unwrap();
    let inner = result.get_variable("inner").unwrap();
    assert_eq!(inner.get_variable("x").unwrap().as_integer(), Some(1));
    assert_eq!(result.get_variable("y").unwrap().as_integer(), Some(2));
}

#[test]
fn test_targeted_get_and_assign() {
    let scope = Box::new();
    let object = Box::new();
    scope.set_variable("object", Some(object.clone()));

    let assign = Expr::assign_on(Expr::get("object"), "field", Expr::integer(9));
    let result = eval(&scope, &assign).unwrap();
    assert_eq!(result.as_integer(), Some(9));
    assert!(scope.get_variable("field").is_none());

    let get = Expr::get_on(Expr::get("object"), "field");
    let found = eval(&scope, &get).unwrap();
    assert!(Box::ptr_eq(&found, &object.get_variable("field").unwrap()));

    let missing = Expr::get_on(Expr::get("object"), "other");
    assert_eq!(
        eval(&scope, &missing).unwrap_err(),
        EvalError::VariableNotFound {
            name: "other".to_string()
        }
    );
}

#[test]
fn test_targeted_assign_on_box_literal() {
    let expr = Expr::assign_on(Expr::boxed(None), "x", Expr::string("v"));
    let result = eval(&Box::new(), &expr).unwrap();
    assert_eq!(result.as_string_bytes(), Some(&b"v"[..]));
}

#[test]
fn test_call_binds_parameter() {
    let scope = Box::new();
    scope.set_variable("identity", Some(callable(&["x"], Expr::get("x"))));

    let expr = Expr::call(Expr::get("identity"), Expr::integer(5));
    let result = eval(&scope, &expr).unwrap();
    assert_eq!(result.as_integer(), Some(5));
}

#[test]
fn test_call_scope_components_is_target() {
    let scope = Box::new();
    let target = callable(&[], Expr::get(COMPONENTS));
    scope.set_variable("f", Some(target.clone()));

    let expr = Expr::call(Expr::get("f"), Expr::integer(0));
    let components = eval(&scope, &expr).unwrap().as_list().unwrap();
    assert_eq!(components.len(), 1);
    assert!(Box::ptr_eq(&components[0], &target));
}

#[test]
fn test_call_body_assignments_stay_in_call_scope() {
    let scope = Box::new();
    let body = Expr::multi([Expr::assign("local", Expr::integer(1)), Expr::get("x")]);
    scope.set_variable("f", Some(callable(&["x"], body)));

    let result = eval(&scope, &Expr::call(Expr::get("f"), Expr::string("arg"))).unwrap();
    assert_eq!(result.as_string_bytes(), Some(&b"arg"[..]));
    assert!(scope.get_variable("local").is_none());
}

#[test]
fn test_call_with_list_argument_binds_items() {
    let scope = Box::new();
    let first = Box::from_integer(1);
    let second = Box::from_integer(2);
    scope.set_variable(
        "args",
        Some(Box::from_list([first.clone(), second.clone()])),
    );
    scope.set_variable("pick_y", Some(callable(&["x", "y"], Expr::get("y"))));
    scope.set_variable("pick_z", Some(callable(&["x", "y", "z"], Expr::get("z"))));

    let result = eval(&scope, &Expr::call(Expr::get("pick_y"), Expr::get("args"))).unwrap();
    assert!(Box::ptr_eq(&result, &second));

    // Parameters past the end of the list are left unbound.
    let err = eval(&scope, &Expr::call(Expr::get("pick_z"), Expr::get("args"))).unwrap_err();
    assert_eq!(
        err,
        EvalError::VariableNotFound {
            name: "z".to_string()
        }
    );
}

#[test]
fn test_call_with_scalar_argument_leaves_rest_unbound() {
    let scope = Box::new();
    scope.set_variable("f", Some(callable(&["x", "y"], Expr::get("y"))));
    let err = eval(&scope, &Expr::call(Expr::get("f"), Expr::integer(1))).unwrap_err();
    assert_eq!(
        err,
        EvalError::VariableNotFound {
            name: "y".to_string()
        }
    );
}

#[test]
fn test_call_follows_delegation() {
    let scope = Box::new();
    let implementation = callable(&["x"], Expr::get("x"));
    let front = Box::new();
    front.set_variable(CALL, Some(implementation));
    scope.set_variable("front", Some(front.clone()));

    let result = eval(&scope, &Expr::call(Expr::get("front"), Expr::integer(11))).unwrap();
    assert_eq!(result.as_integer(), Some(11));
}

#[test]
fn test_call_without_method_is_not_callable() {
    let scope = Box::new();
    run(&scope, "plain = {}").unwrap();
    let err = eval(&scope, &Expr::call(Expr::get("plain"), Expr::integer(1))).unwrap_err();
    assert_eq!(err, EvalError::NotCallable);

    // Literals have no method either.
    let err = eval(&scope, &Expr::call(Expr::integer(1), Expr::integer(1))).unwrap_err();
    assert_eq!(err, EvalError::NotCallable);
}

#[test]
fn test_call_delegation_cycle() {
    let scope = Box::new();
    let a = Box::new();
    let b = Box::new();
    a.set_variable(CALL, Some(b.clone()));
    b.set_variable(CALL, Some(a.clone()));
    scope.set_variable("a", Some(a.clone()));

    let err = eval(&scope, &Expr::call(Expr::get("a"), Expr::integer(1))).unwrap_err();
    assert_eq!(err, EvalError::DelegationCycle);

    a.set_variable(CALL, None);
}

#[test]
fn test_external_call_is_unsupported() {
    fn host(_: &[Box]) -> Box {
        Box::null()
    }

    let err = eval(&Box::new(), &Expr::external(host)).unwrap_err();
    assert_eq!(
        err,
        EvalError::Unsupported {
            feature: "external calls"
        }
    );
}

#[test]
fn test_error_aborts_sequence() {
    let scope = Box::new();
    let err = run(&scope, "a = 1; missing; b = 2").unwrap_err();
    assert!(matches!(err, EvalError::VariableNotFound { .. }));
    assert!(scope.get_variable("a").is_some());
    assert!(scope.get_variable("b").is_none());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    const DEPTH: usize = 10_000;

    let mut expr = Expr::assign("leaf", Expr::integer(1));
    for _ in 0..DEPTH {
        expr = Expr::boxed(Some(expr));
    }
    assert!(eval(&Box::new(), &expr).is_ok());

    let mut expr = Expr::integer(7);
    for _ in 0..DEPTH {
        expr = Expr::multi([Expr::string("skip"), expr]);
    }
    assert_eq!(eval(&Box::new(), &expr).unwrap().as_integer(), Some(7));
}

#[test]
fn test_deep_result_is_dropped_without_overflow() {
    const DEPTH: usize = 10_000;

    let mut expr = Expr::assign("x", Expr::integer(1));
    for _ in 0..DEPTH {
        expr = Expr::assign("x", Expr::boxed(Some(expr)));
    }

    let root = Box::new();
    assert!(eval(&root, &expr).is_ok());

    let mut depth = 0;
    let mut current = root.get_variable("x");
    while let Some(b) = current {
        depth += 1;
        current = b.get_variable("x");
    }
    assert_eq!(depth, DEPTH + 1);

    drop(expr);
    drop(root);
}

#[test]
fn test_frame_limit() {
    let mut expr = Expr::integer(1);
    for _ in 0..10 {
        expr = Expr::boxed(Some(expr));
    }

    let options = EvaluatorOptions {
        max_frames: Some(5),
        max_steps: None,
    };
    let err = eval_with_options(&Box::new(), &expr, options).unwrap_err();
    assert_eq!(
        err,
        EvalError::ResourceExceeded(ResourceExceeded::FrameLimit { max_frames: 5 })
    );

    let options = EvaluatorOptions {
        max_frames: Some(11),
        max_steps: None,
    };
    assert!(eval_with_options(&Box::new(), &expr, options).is_ok());
}

#[test]
fn test_step_limit_stops_runaway_self_call() {
    init_test_logging();
    let scope = Box::new();
    // f(f) calls f(f) forever.
    let body = Expr::call(Expr::get("f"), Expr::get("f"));
    scope.set_variable("loop", Some(callable(&["f"], body)));

    let expr = Expr::call(Expr::get("loop"), Expr::get("loop"));
    let options = EvaluatorOptions {
        max_frames: None,
        max_steps: Some(1_000),
    };
    let err = eval_with_options(&scope, &expr, options).unwrap_err();
    assert_eq!(
        err,
        EvalError::ResourceExceeded(ResourceExceeded::StepLimit { max_steps: 1_000 })
    );
}

#[test]
fn test_step_limit_allows_small_programs() {
    let expr = parser::parse("a = 1; a").unwrap();
    let options = EvaluatorOptions {
        max_frames: None,
        max_steps: Some(100),
    };
    let result = eval_with_options(&Box::new(), &expr, options).unwrap();
    assert_eq!(result.as_integer(), Some(1));
}

#[test]
fn test_actor_is_reusable() {
    let actor = Actor::new();
    let scope = Box::new();
    actor.evaluate(&scope, &parser::parse("a = 1").unwrap()).unwrap();
    let result = actor.evaluate(&scope, &parser::parse("a").unwrap()).unwrap();
    assert_eq!(result.as_integer(), Some(1));

    // A failed evaluation leaves the actor usable.
    assert!(actor.evaluate(&scope, &parser::parse("nope").unwrap()).is_err());
    assert!(actor.evaluate(&scope, &parser::parse("a").unwrap()).is_ok());
}

#[test]
fn test_concurrent_evaluations() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Actor>();

    let actor = Actor::new();
    std::thread::scope(|s| {
        for i in 0..8i64 {
            let actor = &actor;
            s.spawn(move || {
                let scope = Box::new();
                for _ in 0..50 {
                    let source = format!("x = {}; {{ y = x }}; x", i);
                    let expr = parser::parse(&source).unwrap();
                    // `{ y = x }` fails: box bodies cannot see `x`.
                    assert!(actor.evaluate(&scope, &expr).is_err());

                    let expr = parser::parse(&format!("x = {}; x", i)).unwrap();
                    let result = actor.evaluate(&scope, &expr).unwrap();
                    assert_eq!(result.as_integer(), Some(i));
                }
            });
        }
    });
}
