//! Phase classification of diagnostics.

use std::fmt;

/// Which stage of the pipeline produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A malformed token. The lexer emits an error token and carries on.
    Lexical,
    /// A token that fits no alternative of the current production.
    Syntax,
    /// An edge endpoint or identifier problem found after parsing.
    Resolution,
    /// An error that ends the parse of the document.
    Fatal,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "lexical"),
            DiagnosticKind::Syntax => write!(f, "syntax"),
            DiagnosticKind::Resolution => write!(f, "resolution"),
            DiagnosticKind::Fatal => write!(f, "fatal"),
        }
    }
}
