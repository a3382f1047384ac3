//! Public API for the Holo language.
//!
//! This module provides the stable public API for compiling and running Holo
//! programs: an [`Engine`] compiles source into a [`CompiledProgram`], which
//! can then be run against a fresh root box or a caller-provided scope.
//!
//! # Example
//!
//! ```
//! use holo_core::api::{Engine, EngineOptions, ExecutionOptions};
//!
//! let options = EngineOptions {
//!     default_execution_options: ExecutionOptions {
//!         max_frames: None,
//!         max_steps: Some(100_000),
//!     },
//!     ..Default::default()
//! };
//! let engine = Engine::new(options);
//!
//! let result = engine.run("'hello'; { greeting = 'hi' }").unwrap();
//! assert!(result.get_variable("greeting").is_some());
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;


pub use engine::Engine;
pub use error::{Diagnostic, Error, Severity};
pub use expression::CompiledProgram;
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};
