// Source positions shared by the parser and diagnostics.

use core::ops::Range;

/// Byte range into the parsed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }

    /// A span covering the single character starting at `pos`.
    ///
    /// `source` is needed to find the width of multi-byte characters.
    pub fn char_at(source: &str, pos: usize) -> Self {
        let width = source[pos..].chars().next().map_or(0, char::len_utf8);
        Self(pos..pos + width)
    }

    pub fn combine(a: &Span, b: &Span) -> Span {
        Span::new(a.0.start, b.0.end)
    }
}
