//! Parser for the ELK JSON graph text format.
//!
//! A document is a JSON-like description of one root node with nested
//! children, ports, labels, edges and layout options. Parsing runs in three
//! phases:
//!
//! 1. [`lexer`] turns the text into tokens, reporting malformed tokens as
//!    error tokens instead of stopping.
//! 2. The recursive-descent parser builds an [`elkjson_core::model::Document`],
//!    recording edge endpoints as unresolved identifier text. Reserved keys
//!    are accepted in double-quoted, single-quoted and bare spelling; any
//!    other key is kept as a generic JSON member.
//! 3. [`resolve`] links every endpoint to the node or port with that
//!    identifier anywhere in the document.
//!
//! Problems in any phase become [`Diagnostic`](error::Diagnostic)s. With
//! recovery enabled (the default) a single call reports every independent
//! error and still returns the document.
//!
//! # Example
//!
//! ```
//! use elkjson_core::model::{Endpoint, GraphElement, ShapeRef};
//!
//! let source = r#"{
//!     id: "root",
//!     children: [ { id: "n1" }, { 'id': 'n2' } ],
//!     edges: [ { "sources": ["n1"], "targets": ["n2"] } ],
//! }"#;
//!
//! let output = elkjson_parser::parse(source);
//! assert!(output.diagnostics().is_empty());
//!
//! let doc = output.document().unwrap();
//! let edge = doc.node(doc.root()).contained_edges()[0];
//! let Endpoint::Resolved(ShapeRef::Node(target)) = *doc.edge(edge).targets()[0] else {
//!     panic!("target should resolve to a node");
//! };
//! assert_eq!(doc.node(target).identifier(), Some("n2"));
//! ```

pub mod config;
pub mod error;
pub mod keys;
pub mod lexer;
pub mod tokens;

mod builder;
mod parser;
mod resolve;

#[cfg(test)]
mod parser_tests;

use log::{debug, info};

use elkjson_core::model::Document;

pub use config::ParseOptions;
pub use elkjson_core::span::{SourcePosition, Span, Spanned};
pub use resolve::resolve;

use crate::{
    config::RecoveryMode,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    tokens::Token,
};

/// The result of a parse: the document, if one could be built, and every
/// diagnostic in source order.
///
/// A document may come with errors. Check [`has_errors`](Self::has_errors)
/// even when [`document`](Self::document) is `Some`.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    document: Option<Document>,
    diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// The parsed document. `None` after a fatal error, or after any lexical
    /// or syntax error when recovery is disabled.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn into_document(self) -> Option<Document> {
        self.document
    }

    /// Lexical and syntax diagnostics in source order, followed by
    /// resolution diagnostics in document order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity().is_error())
    }

    /// Split into the document and the diagnostics.
    pub fn into_parts(self) -> (Option<Document>, Vec<Diagnostic>) {
        (self.document, self.diagnostics)
    }

    /// The document if the parse produced no errors. Warnings are dropped.
    pub fn into_result(self) -> Result<Document, ParseError> {
        if self.has_errors() {
            return Err(ParseError::new(self.diagnostics));
        }
        match self.document {
            Some(document) => Ok(document),
            None => Err(ParseError::new(self.diagnostics)),
        }
    }
}

/// Parse a document with default options.
pub fn parse(source: &str) -> ParseOutput {
    parse_with(source, &ParseOptions::default())
}

/// Parse a document.
///
/// Lexical diagnostics are reported for every malformed token. Unexpected
/// characters are dropped from the token stream before parsing; other error
/// tokens stay, so the parser synchronises around them without reporting
/// them a second time.
pub fn parse_with(source: &str, options: &ParseOptions) -> ParseOutput {
    let tokens = lexer::tokenize(source);

    let mut collector = DiagnosticCollector::new();
    collector.extend(lexer::lexical_diagnostics(&tokens));

    let tokens: Vec<_> = tokens
        .into_iter()
        .filter(|positioned| {
            !matches!(&positioned.token, Token::Error(error) if error.code() == ErrorCode::E002)
        })
        .collect();

    let output = parser::parse_tokens(&tokens, source.len(), options);
    collector.extend(output.diagnostics);
    collector.sort_by_position();

    let aborted = options.recovery() == RecoveryMode::Abort && collector.has_structural_errors();
    let mut document = output.document.filter(|_| !aborted);

    if let Some(document) = document.as_mut() {
        collector.extend(resolve(document, &options.resolve_options()));
    }

    let has_errors = collector.has_errors();
    let diagnostics = collector.finish();
    match &document {
        Some(document) => info!(
            nodes = document.node_count(),
            ports = document.port_count(),
            edges = document.edge_count(),
            labels = document.label_count(),
            diagnostics = diagnostics.len(),
            has_errors;
            "Parsed document"
        ),
        None => debug!(diagnostics = diagnostics.len(); "Parse produced no document"),
    }

    ParseOutput {
        document,
        diagnostics,
    }
}
