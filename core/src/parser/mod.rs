pub mod error;
mod parsed_expr;
pub mod parser;
mod syntax;

pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, ExternalFn, ExternalFunction};
pub use syntax::Span;
