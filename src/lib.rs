//! Holo - a minimal prototype-based language
//!
//! # Overview
//!
//! Every value in Holo is a [`Box`](values::Box): a mutable bag of named
//! variables with reference identity. Programs are sequences of string and
//! number literals, variable reads, assignments and box literals:
//!
//! ```text
//! "hello there"; 4.6; { a = 3; };
//! ```
//!
//! Evaluation is trampolined: the evaluator keeps its own frame and value
//! stacks, so deeply nested programs cannot overflow the host stack.
//!
//! # Quick Start
//!
//! ```
//! use holo::{Engine, EngineOptions};
//!
//! let engine = Engine::new(EngineOptions::default());
//! let program = engine.compile("{ a = 3; }").unwrap();
//! let result = program.run(&engine).unwrap();
//!
//! assert_eq!(result.get_variable("a").unwrap().as_integer(), Some(3));
//! ```
//!
//! # Error Handling
//!
//! All API functions return `Result<T, holo::Error>`:
//!
//! ```
//! use holo::{Engine, Error, render_error_to_string_no_color};
//!
//! let engine = Engine::default();
//! match engine.compile("a = ") {
//!     Err(err @ Error::Compilation { .. }) => {
//!         let rendered = render_error_to_string_no_color(&err);
//!         assert!(rendered.contains("got end of input"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

pub use holo_core::api::{
    CompilationOptions, CompiledProgram, Diagnostic, Engine, EngineOptions, Error,
    ExecutionOptions, Severity,
};

pub mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

pub use holo_core::{evaluator, parser, values};
