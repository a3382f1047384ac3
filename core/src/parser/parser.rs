//! Hand-written recursive-descent parser.
//!
//! Scanning and tree construction are interleaved: there is no token stream.
//! The grammar is small enough that every decision is made by looking at a
//! single byte, and all syntax characters are ASCII, so the parser walks the
//! source as bytes and only decodes a full `char` when reporting an error.

use std::sync::Arc;

use tracing::trace;

use crate::parser::{Expr, ParseError, ParseErrorKind, Span};

/// Default limit on box and assignment nesting.
///
/// The parser recurses once per nested `{` or `=`, so this bounds its use of
/// the host stack. Trees built by hand are not subject to it.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parse a program with the default nesting limit.
///
/// Programs nesting boxes or assignments more than [`DEFAULT_MAX_DEPTH`]
/// deep are rejected with `MaxDepthExceeded`. The evaluator itself handles
/// arbitrarily deep trees; to run one, raise the limit through
/// [`parse_with_max_depth`] (or `CompilationOptions::max_depth`) or build the
/// tree directly with the [`Expr`] constructors.
pub fn parse(source: &str) -> Result<Arc<Expr>, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse a program, failing once box or assignment nesting exceeds `max_depth`.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Arc<Expr>, ParseError> {
    let mut parser = Parser::new(source, max_depth);
    let expr = parser.parse_sequence()?;
    parser.parse_end_of_input()?;
    trace!(kind = expr.kind_name(), len = source.len(), "parsed program");
    Ok(expr)
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | 0x0b | 0x0c | b'\r' | b'\n')
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_identifier_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

struct Parser<'s> {
    source: &'s str,
    bytes: &'s [u8],
    index: usize,
    depth: usize,
    max_depth: usize,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str, max_depth: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            index: 0,
            depth: 0,
            max_depth,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// The full character at the cursor, for error messages.
    fn current_char(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source, span)
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        let span = if self.index < self.source.len() {
            Span::char_at(self.source, self.index)
        } else {
            Span::new(self.index, self.index)
        };
        self.error(kind, span)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.index += 1;
        }
    }

    fn enter_nested(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error_here(ParseErrorKind::MaxDepthExceeded {
                depth: self.depth,
                max_depth: self.max_depth,
            }));
        }
        Ok(())
    }

    fn exit_nested(&mut self) {
        self.depth -= 1;
    }

    fn parse_end_of_input(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.current_char() {
            Some(found) => Err(self.error_here(ParseErrorKind::TrailingInput { found })),
            None => Ok(()),
        }
    }

    /// Parses `;`-separated expressions until something that is neither an
    /// expression nor a `;` is reached. That character is left for the caller.
    ///
    /// Exactly one expression is returned as-is; any other count is wrapped
    /// in a `Multi`.
    fn parse_sequence(&mut self) -> Result<Arc<Expr>, ParseError> {
        let mut exprs = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }

            if let Some(expr) = self.parse_expression()? {
                exprs.push(expr);
            }

            self.skip_whitespace();
            if !self.eat(b';') {
                break;
            }
        }

        if exprs.len() == 1 {
            return Ok(exprs.remove(0));
        }
        Ok(Arc::new(Expr::Multi(exprs)))
    }

    /// Parses one expression, or returns `None` without consuming anything
    /// when the cursor is not at the start of one.
    fn parse_expression(&mut self) -> Result<Option<Arc<Expr>>, ParseError> {
        let Some(byte) = self.peek() else {
            return Ok(None);
        };

        let expr = match byte {
            b'"' | b'\'' => self.parse_string()?,
            b'0'..=b'9' | b'-' | b'+' => self.parse_number()?,
            b'{' => self.parse_box()?,
            byte if is_identifier_start(byte) => self.parse_identifier_expression()?,
            _ => return Ok(None),
        };
        Ok(Some(expr))
    }

    fn expect_expression(&mut self, expected: &'static str) -> Result<Arc<Expr>, ParseError> {
        if let Some(expr) = self.parse_expression()? {
            return Ok(expr);
        }
        match self.current_char() {
            Some(found) => Err(self.error_here(ParseErrorKind::UnexpectedChar { expected, found })),
            None => Err(self.error_here(ParseErrorKind::UnexpectedEnd { expected })),
        }
    }

    fn parse_string(&mut self) -> Result<Arc<Expr>, ParseError> {
        let start = self.index;
        let quote = self.bytes[start];
        self.index += 1;

        let Some(len) = self.bytes[self.index..].iter().position(|&b| b == quote) else {
            self.index = self.bytes.len();
            return Err(self.error(
                ParseErrorKind::UnterminatedString,
                Span::new(start, self.bytes.len()),
            ));
        };

        let content = &self.bytes[self.index..self.index + len];
        self.index += len + 1;
        Ok(Arc::new(Expr::StringLiteral(content.to_vec())))
    }

    fn parse_number(&mut self) -> Result<Arc<Expr>, ParseError> {
        let start = self.index;
        let invalid = |parser: &Self, reason| {
            parser.error(
                ParseErrorKind::InvalidNumber { reason },
                Span::new(start, parser.index.max(start + 1)),
            )
        };

        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.index += 1;
        }
        if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
            return Err(invalid(self, "Expected digit to start number"));
        }
        self.index += 1;

        let mut seen_dot = false;
        while let Some(byte) = self.peek() {
            let previous = self.bytes[self.index - 1];
            match byte {
                b'0'..=b'9' => {}
                b'.' => {
                    if seen_dot {
                        return Err(invalid(self, "Unexpected second `.` in number"));
                    }
                    if !previous.is_ascii_digit() {
                        return Err(invalid(self, "Expected digit before `.` in number"));
                    }
                    seen_dot = true;
                }
                b'_' => {
                    if !previous.is_ascii_digit() {
                        return Err(invalid(self, "Expected digit before `_` in number"));
                    }
                }
                _ => break,
            }
            self.index += 1;
        }

        match self.bytes[self.index - 1] {
            b'_' => return Err(invalid(self, "Trailing `_` in number")),
            b'.' => return Err(invalid(self, "Expected digit after `.` in number")),
            _ => {}
        }

        let text = &self.source[start..self.index];
        let digits: String = text.chars().filter(|&c| c != '_').collect();
        let out_of_range = || {
            self.error(
                ParseErrorKind::NumberOutOfRange {
                    text: text.to_string(),
                },
                Span::new(start, self.index),
            )
        };

        if seen_dot {
            let value: f64 = digits.parse().map_err(|_| out_of_range())?;
            if !value.is_finite() {
                return Err(out_of_range());
            }
            Ok(Arc::new(Expr::RealLiteral(value)))
        } else {
            let value: i64 = digits.parse().map_err(|_| out_of_range())?;
            Ok(Arc::new(Expr::IntegerLiteral(value)))
        }
    }

    fn parse_identifier(&mut self) -> &'s str {
        let start = self.index;
        self.index += 1;
        while self.peek().is_some_and(is_identifier_continue) {
            self.index += 1;
        }
        &self.source[start..self.index]
    }

    /// `name` or `name = expr`.
    fn parse_identifier_expression(&mut self) -> Result<Arc<Expr>, ParseError> {
        let member = self.parse_identifier().to_string();
        self.skip_whitespace();

        if !self.eat(b'=') {
            return Ok(Arc::new(Expr::Get {
                target: None,
                member,
            }));
        }

        self.enter_nested()?;
        self.skip_whitespace();
        let value = self.expect_expression("expression after `=`")?;
        self.exit_nested();

        Ok(Arc::new(Expr::Assign {
            target: None,
            member,
            value,
        }))
    }

    fn parse_box(&mut self) -> Result<Arc<Expr>, ParseError> {
        let open = self.index;
        self.index += 1;
        self.enter_nested()?;

        let body = self.parse_sequence()?;

        if !self.eat(b'}') {
            let found = self.current_char();
            let mut err = self.error_here(ParseErrorKind::UnclosedBox { found });
            if found.is_none() {
                err.span = Span::combine(&Span::new(open, open + 1), &err.span);
            }
            return Err(err);
        }
        self.exit_nested();

        Ok(Arc::new(Expr::BoxLiteral(Some(body))))
    }
}
