//! The Holo compilation engine.

use super::{CompilationOptions, CompiledProgram, EngineOptions, Error};
use crate::evaluator::Actor;
use crate::parser;
use crate::values::Box;

/// The Holo compilation and execution engine.
///
/// The engine owns:
/// - Runtime configuration (EngineOptions)
/// - The actor that runs compiled programs
///
/// Programs run on one engine are serialized; use several engines to run
/// programs in parallel.
///
/// # Example
///
/// ```
/// use holo_core::api::{Engine, EngineOptions};
///
/// let engine = Engine::new(EngineOptions::default());
///
/// let program = engine.compile("{ answer = 42 }").unwrap();
/// let result = program.run(&engine).unwrap();
/// assert_eq!(result.get_variable("answer").unwrap().as_integer(), Some(42));
/// ```
#[derive(Debug)]
pub struct Engine {
    options: EngineOptions,
    actor: Actor,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        let actor = Actor::with_options((&options.default_execution_options).into());
        Self { options, actor }
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub(crate) fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Compile a Holo program with the engine's default compilation options.
    pub fn compile(&self, source: &str) -> Result<CompiledProgram, Error> {
        self.compile_with_options(&self.options.default_compilation_options, source)
    }

    /// Compile a Holo program with explicit options.
    ///
    /// # Example
    ///
    /// ```
    /// use holo_core::api::{CompilationOptions, Engine, EngineOptions, Error};
    ///
    /// let engine = Engine::new(EngineOptions::default());
    /// let shallow = CompilationOptions { max_depth: 1 };
    /// let err = engine.compile_with_options(&shallow, "{ { 1 } }").unwrap_err();
    /// assert!(matches!(err, Error::Compilation { .. }));
    /// ```
    pub fn compile_with_options(
        &self,
        options: &CompilationOptions,
        source: &str,
    ) -> Result<CompiledProgram, Error> {
        let expr = parser::parse_with_max_depth(source, options.max_depth)?;
        Ok(CompiledProgram::new(expr, source))
    }

    /// Compile and run `source` against a fresh root box.
    pub fn run(&self, source: &str) -> Result<Box, Error> {
        self.compile(source)?.run(self)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
