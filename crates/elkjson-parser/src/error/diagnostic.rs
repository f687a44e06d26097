//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, multiple labeled source spans, and help text.

use std::fmt;

use crate::{
    SourcePosition, Span,
    error::{DiagnosticKind, Severity, error_code::ErrorCode, label::Label},
};

/// A rich diagnostic message with source location information.
///
/// Diagnostics carry:
/// - A severity level
/// - An optional error code, which also determines the [`DiagnosticKind`]
/// - A primary message describing the issue
/// - One or more labeled source spans
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E100]: expected `,` or `}`, found string `"y"`
///   --> graph.json:1:16
///    |
///  1 | { "x": 1 "y": 2 }
///    |          ^^^ unexpected token
///    |
///    = help: separate members with `,`
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use elkjson_parser::error::{Diagnostic, ErrorCode};
    /// # use elkjson_parser::Span;
    ///
    /// let diag = Diagnostic::error("unknown identifier `n9`")
    ///     .with_code(ErrorCode::E200)
    ///     .with_label(Span::new(40..44), "no node or port has this identifier")
    ///     .with_help("declare a node or port with `\"id\": \"n9\"`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The phase that produced this diagnostic, derived from its code.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        self.code.map(|code| code.kind())
    }

    /// Whether this diagnostic ended the parse.
    pub fn is_fatal(&self) -> bool {
        self.kind() == Some(DiagnosticKind::Fatal)
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Line and column of the primary label in `source`.
    pub fn position(&self, source: &str) -> Option<SourcePosition> {
        self.primary_span()
            .map(|span| SourcePosition::locate(source, span.start()))
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.kind().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_kind_follows_code() {
        let diag = Diagnostic::error("incomplete").with_code(ErrorCode::E101);

        assert_eq!(diag.kind(), Some(DiagnosticKind::Fatal));
        assert!(diag.is_fatal());
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::warning("duplicate identifier")
            .with_secondary_label(Span::new(5..9), "first declared here")
            .with_label(Span::new(20..24), "duplicate declaration");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_secondary());
        assert_eq!(diag.primary_span(), Some(Span::new(20..24)));
    }

    #[test]
    fn test_diagnostic_position() {
        let source = "{\n  \"id\": 5\n}";
        let start = source.find('5').unwrap();
        let diag = Diagnostic::error("bad id").with_label(Span::new(start..start + 1), "here");

        assert_eq!(
            diag.position(source),
            Some(SourcePosition { line: 2, column: 9 })
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("unknown identifier `x`").with_code(ErrorCode::E200);
        assert_eq!(diag.to_string(), "error[E200]: unknown identifier `x`");

        let diag = Diagnostic::warning("something odd");
        assert_eq!(diag.to_string(), "warning: something odd");
    }
}
