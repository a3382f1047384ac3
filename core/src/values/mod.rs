//! The object model.
//!
//! Everything in the language is a [`Box`]: a mutable, identity-based bag of
//! named variables with an optional callable method and an optional native
//! payload. Built-in values are boxes whose `components` name one of the
//! canonical [`Kind`] boxes and whose payload holds the native value.

mod boxed;
mod kind;
mod method;

pub use boxed::{Box, BoxData, CALL, COMPONENTS};
pub use kind::Kind;
pub use method::BoxMethod;
