//! Core of the Holo language: parser, object model and evaluator.
//!
//! Most users want the [`api`] module; the lower layers are public for
//! embedders that build expression trees or boxes by hand.

pub mod api;
pub mod evaluator;
pub mod parser;
pub mod values;
