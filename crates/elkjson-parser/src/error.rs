//! Error and diagnostic system for the ELK JSON parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels and a phase classification ([`DiagnosticKind`])
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. A parse always returns its diagnostics next to
//! the (possibly partial) document; [`ParseError`] wraps them for callers that
//! prefer a `Result`.
//!
//! # Example
//!
//! ```
//! # use elkjson_parser::error::{Diagnostic, DiagnosticKind, ErrorCode};
//! # use elkjson_parser::Span;
//!
//! let span = Span::new(100..104);
//! let original_span = Span::new(50..54);
//!
//! let diag = Diagnostic::warning("identifier `n1` is declared more than once")
//!     .with_code(ErrorCode::E202)
//!     .with_label(span, "duplicate declaration")
//!     .with_secondary_label(original_span, "first declared here");
//!
//! assert_eq!(diag.kind(), Some(DiagnosticKind::Resolution));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod kind;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use kind::DiagnosticKind;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
