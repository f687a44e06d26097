//! Source locations for graph elements and diagnostics.
//!
//! A [`Span`] is a half-open byte range into the document text. [`Spanned`]
//! attaches a span to any value without making the span part of the value's
//! identity: two `Spanned` values compare equal when their inner values do.

use std::{fmt, ops::Range};

/// A half-open byte range `start..end` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The byte range covered by this span.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

/// A 1-based line and column position in the source text.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    /// Locate a byte offset in `source`.
    ///
    /// Offsets past the end of the source are clamped to the end; offsets that
    /// fall inside a multi-byte character resolve to that character.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;

        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A value together with the source span it was read from.
///
/// Equality ignores the span, so documents parsed from differently formatted
/// but equivalent sources compare equal.
#[derive(Debug, Clone, Default)]
pub struct Spanned<T> {
    value: T,
    span: Span,
}

impl<T> Spanned<T> {
    /// Create a new spanned value from a value and span information
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Convert from one spanned type to another using the provided function
    ///
    /// This maintains the same span information while transforming the value.
    pub fn map<F, U>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    /// Get a reference to the underlying value
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Get a mutable reference to the underlying value
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Consume the Spanned wrapper and return just the inner value
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> std::ops::Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> std::ops::DerefMut for Spanned<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

// PartialEq compares only the inner values, ignoring span information
impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic_functionality() {
        let span = Span::new(5..10);
        assert_eq!(span.start(), 5);
        assert_eq!(span.end(), 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_empty() {
        let span = Span::new(5..5);
        assert_eq!(span.len(), 0);
        assert!(span.is_empty());
    }

    #[test]
    fn test_span_union() {
        let union = Span::new(15..20).union(Span::new(5..10));
        assert_eq!(union.start(), 5);
        assert_eq!(union.end(), 20);
    }

    #[test]
    fn test_spanned_equality_ignores_span() {
        let a = Spanned::new("n1", Span::new(0..4));
        let b = Spanned::new("n1", Span::new(30..34));
        assert_eq!(a, b);
        assert_ne!(a, Spanned::new("n2", Span::new(0..4)));
    }

    #[test]
    fn test_spanned_map_keeps_span() {
        let spanned = Spanned::new(3, Span::new(2..3)).map(|n| n * 2);
        assert_eq!(*spanned.inner(), 6);
        assert_eq!(spanned.span(), Span::new(2..3));
    }

    #[test]
    fn test_source_position_first_line() {
        let pos = SourcePosition::locate("{\"id\": 1}", 2);
        assert_eq!(pos, SourcePosition { line: 1, column: 3 });
    }

    #[test]
    fn test_source_position_later_line() {
        let source = "{\n  \"id\": \"a\",\n  x: 1\n}";
        let offset = source.find('x').unwrap();
        let pos = SourcePosition::locate(source, offset);
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.to_string(), "3:3");
    }

    #[test]
    fn test_source_position_counts_characters() {
        let source = "'ä' x";
        let offset = source.find('x').unwrap();
        assert_eq!(SourcePosition::locate(source, offset).column, 5);
    }

    #[test]
    fn test_source_position_clamps_past_end() {
        let pos = SourcePosition::locate("ab", 100);
        assert_eq!(pos, SourcePosition { line: 1, column: 3 });
    }
}
