//! Collector for accumulating diagnostics during a parse.
//!
//! The [`DiagnosticCollector`] allows the lexer, parser and resolver to
//! report multiple errors and warnings instead of failing on the first one.

use crate::error::{Diagnostic, DiagnosticKind};

/// A collector for accumulating diagnostics.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If it is an error, the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Emit every diagnostic in `diagnostics`, in order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// Whether any emitted diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Whether any emitted error is lexical or syntactic.
    pub fn has_structural_errors(&self) -> bool {
        self.diagnostics.iter().any(|diagnostic| {
            diagnostic.severity().is_error()
                && matches!(
                    diagnostic.kind(),
                    Some(DiagnosticKind::Lexical | DiagnosticKind::Syntax | DiagnosticKind::Fatal)
                )
        })
    }

    /// Order diagnostics by the start of their primary span.
    ///
    /// The sort is stable; diagnostics without a span keep their place
    /// relative to each other and go first.
    pub fn sort_by_position(&mut self) {
        self.diagnostics
            .sort_by_key(|diagnostic| diagnostic.primary_span().map(|span| span.start()));
    }

    /// Finish collection and return every diagnostic, warnings included.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Span, error::ErrorCode};

    #[test]
    fn test_collector_new_is_empty() {
        let collector = DiagnosticCollector::new();
        assert!(!collector.has_errors());
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_warning_is_not_an_error() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning("test warning"));

        assert!(!collector.has_errors());
        assert_eq!(collector.finish().len(), 1);
    }

    #[test]
    fn test_collector_structural_errors() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error("unknown").with_code(ErrorCode::E200));
        assert!(collector.has_errors());
        assert!(!collector.has_structural_errors());

        collector.emit(Diagnostic::error("unexpected").with_code(ErrorCode::E100));
        assert!(collector.has_structural_errors());
    }

    #[test]
    fn test_collector_sort_by_position() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error("late").with_label(Span::new(30..31), "here"));
        collector.emit(Diagnostic::error("early").with_label(Span::new(3..4), "here"));
        collector.sort_by_position();

        let diagnostics = collector.finish();
        assert_eq!(diagnostics[0].message(), "early");
        assert_eq!(diagnostics[1].message(), "late");
    }
}
