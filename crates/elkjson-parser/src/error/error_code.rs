//! Error codes for the ELK JSON diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Reference resolution errors

use std::fmt;

use crate::error::DiagnosticKind;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed before the end of
    /// the input.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that cannot start any token.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\b`, `\t`, `\n`, `\f`, `\r`, `\"`, `\'`, `\\`, `\/`
    /// and `\uXXXX`.
    E003,

    /// Invalid unicode escape format.
    ///
    /// A `\u` escape must be followed by exactly four hexadecimal digits.
    E004,

    /// Invalid unicode codepoint.
    ///
    /// The escape denotes an unpaired surrogate.
    E005,

    /// Unterminated block comment.
    ///
    /// A `/*` comment was never closed with `*/`.
    E006,

    /// Integer literal out of range.
    ///
    /// The integer does not fit in a signed 64-bit value.
    E007,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Incomplete input.
    ///
    /// The input ended inside an unterminated structure.
    E101,

    /// Invalid value for a structural key.
    ///
    /// The value has the wrong kind, e.g. a number for `id`.
    E102,

    /// Nesting too deep.
    ///
    /// Objects and arrays are nested deeper than the configured limit.
    E103,

    /// Key not allowed on this element.
    ///
    /// A structural key was used on an element that does not support it,
    /// e.g. `children` inside a port.
    E104,

    /// Invalid layout option value.
    ///
    /// Layout option values must be strings, numbers or booleans.
    E105,

    /// Trailing content.
    ///
    /// Tokens follow the closing brace of the graph.
    E106,

    // =========================================================================
    // Resolution Errors (E2xx)
    // =========================================================================
    /// Unknown identifier.
    ///
    /// An edge endpoint names no node or port in the document.
    E200,

    /// Empty endpoint identifier.
    ///
    /// An edge endpoint is an empty or blank string.
    E201,

    /// Duplicate identifier.
    ///
    /// Two nodes or ports share the same identifier.
    E202,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            // Resolution errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E005 => "invalid unicode codepoint",
            ErrorCode::E006 => "unterminated block comment",
            ErrorCode::E007 => "integer out of range",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "invalid value",
            ErrorCode::E103 => "nesting too deep",
            ErrorCode::E104 => "key not allowed here",
            ErrorCode::E105 => "invalid layout option value",
            ErrorCode::E106 => "trailing content",
            // Resolution errors
            ErrorCode::E200 => "unknown identifier",
            ErrorCode::E201 => "empty identifier",
            ErrorCode::E202 => "duplicate identifier",
        }
    }

    /// The phase this code belongs to.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ErrorCode::E101 | ErrorCode::E103 => DiagnosticKind::Fatal,
            ErrorCode::E001
            | ErrorCode::E002
            | ErrorCode::E003
            | ErrorCode::E004
            | ErrorCode::E005
            | ErrorCode::E006
            | ErrorCode::E007 => DiagnosticKind::Lexical,
            ErrorCode::E100
            | ErrorCode::E102
            | ErrorCode::E104
            | ErrorCode::E105
            | ErrorCode::E106 => DiagnosticKind::Syntax,
            ErrorCode::E200 | ErrorCode::E201 | ErrorCode::E202 => DiagnosticKind::Resolution,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
