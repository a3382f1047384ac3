#![allow(dead_code)]

use holo::Error;
use holo::parser::Expr;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Runs `input` in a fresh engine and checks either the displayed result or
/// the error message.
///
/// For compilation errors the message is the first diagnostic's message; for
/// any other error it is the error's `Display`.
macro_rules! test_case {
    (name: $name:ident, input: $input:expr, result: $result:expr $(,)?) => {
        #[test]
        fn $name() {
            let engine = holo::Engine::default();
            let value = engine
                .run($input)
                .unwrap_or_else(|e| panic!("`{}` failed: {}", $input, cases::error_message(&e)));
            pretty_assertions::assert_eq!(value.to_string(), $result);
        }
    };
    (name: $name:ident, input: $input:expr, error: $error:expr $(,)?) => {
        #[test]
        fn $name() {
            let engine = holo::Engine::default();
            match engine.run($input) {
                Ok(value) => panic!("`{}` should fail, got {}", $input, value),
                Err(e) => pretty_assertions::assert_eq!(cases::error_message(&e), $error),
            }
        }
    };
}

pub fn error_message(error: &Error) -> String {
    match error {
        Error::Compilation { diagnostics, .. } => diagnostics
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

pub struct TestCase {
    pub name: &'static str,
    pub expr: &'static str,
    pub ast: Arc<Expr>,
}

pub static TEST_CASES: Lazy<Vec<TestCase>> = Lazy::new(|| {
    vec![
        TestCase {
            name: "driver_program",
            expr: "\"hello there\"; 4.6; { a = 3; };",
            ast: Expr::multi([
                Expr::string("hello there"),
                Expr::real(4.6),
                Expr::boxed(Some(Expr::assign("a", Expr::integer(3)))),
            ]),
        },
        TestCase {
            name: "chained_assignment",
            expr: "a = b = 'x'",
            ast: Expr::assign("a", Expr::assign("b", Expr::string("x"))),
        },
        TestCase {
            name: "box_with_sequence",
            expr: "{ x = 1; y = x }",
            ast: Expr::boxed(Some(Expr::multi([
                Expr::assign("x", Expr::integer(1)),
                Expr::assign("y", Expr::get("x")),
            ]))),
        },
        TestCase {
            name: "signed_numbers",
            expr: "-1_000; +2.5",
            ast: Expr::multi([Expr::integer(-1000), Expr::real(2.5)]),
        },
        TestCase {
            name: "empty_program",
            expr: "  ",
            ast: Expr::multi([]),
        },
    ]
});
