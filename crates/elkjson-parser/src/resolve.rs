//! Deferred resolution of edge endpoints.
//!
//! Endpoints are recorded as identifier text while parsing. Once the whole
//! document is built, [`resolve`] collects every node and port identifier
//! into one global table and links each endpoint to the shape it names.
//! Forward references need no special handling.

use indexmap::{IndexMap, map::Entry};
use log::debug;

use elkjson_core::model::{Document, EdgeId, Endpoint, ShapeRef};

use crate::{
    Span,
    config::{DuplicateIdPolicy, ResolveOptions},
    error::{Diagnostic, ErrorCode},
};

/// Resolve every endpoint of `doc` against the node and port identifiers of
/// the whole document.
///
/// Shapes are registered in declaration order and the first declaration of
/// an identifier wins; later ones are reported according to
/// [`ResolveOptions::duplicate_ids`]. Blank identifiers are never
/// registered. An endpoint with an empty identifier or an identifier that
/// names no shape stays [`Endpoint::Unresolved`] and yields one error.
///
/// Returns the resolution diagnostics in document order. Resolving an
/// already resolved document is a no-op apart from duplicate reports.
pub fn resolve(doc: &mut Document, options: &ResolveOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let shapes = shape_table(doc, options.duplicate_ids(), &mut diagnostics);

    let edges: Vec<EdgeId> = doc.edges().map(|(id, _)| id).collect();
    let mut resolved = 0usize;
    for edge in edges {
        for endpoint in doc.edge_mut(edge).endpoints_mut() {
            let span = endpoint.span();
            let Endpoint::Unresolved(identifier) = endpoint.inner() else {
                continue;
            };

            if identifier.trim().is_empty() {
                diagnostics.push(empty_identifier(span));
                continue;
            }
            match shapes.get(identifier.as_str()) {
                Some((shape, _)) => {
                    *endpoint.inner_mut() = Endpoint::Resolved(*shape);
                    resolved += 1;
                }
                None => diagnostics.push(unknown_identifier(identifier, span)),
            }
        }
    }

    debug!(
        shapes = shapes.len(),
        resolved,
        diagnostics = diagnostics.len();
        "Resolved edge endpoints"
    );
    diagnostics
}

/// Map each identifier to its first declaring shape and where it was written.
fn shape_table(
    doc: &Document,
    policy: DuplicateIdPolicy,
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexMap<String, (ShapeRef, Span)> {
    let mut shapes: IndexMap<String, (ShapeRef, Span)> = IndexMap::new();

    for shape in doc.shapes_in_declaration_order() {
        let element = doc.element(shape.into());
        let Some(identifier) = element.identifier() else {
            continue;
        };
        if identifier.trim().is_empty() {
            continue;
        }
        let span = element
            .identifier_span()
            .unwrap_or_else(|| doc.span(shape.into()));

        match shapes.entry(identifier.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert((shape, span));
            }
            Entry::Occupied(entry) => {
                let (_, first) = *entry.get();
                if let Some(diagnostic) = duplicate_identifier(policy, identifier, span, first) {
                    diagnostics.push(diagnostic);
                }
            }
        }
    }
    shapes
}

fn duplicate_identifier(
    policy: DuplicateIdPolicy,
    identifier: &str,
    span: Span,
    first: Span,
) -> Option<Diagnostic> {
    let message = format!("identifier `{identifier}` is declared more than once");
    let diagnostic = match policy {
        DuplicateIdPolicy::Ignore => return None,
        DuplicateIdPolicy::Warn => Diagnostic::warning(message),
        DuplicateIdPolicy::Error => Diagnostic::error(message),
    };
    Some(
        diagnostic
            .with_code(ErrorCode::E202)
            .with_label(span, "duplicate declaration")
            .with_secondary_label(first, "first declared here")
            .with_help("edges referring to this identifier connect to the first declaration"),
    )
}

fn empty_identifier(span: Span) -> Diagnostic {
    Diagnostic::error("edge endpoint has an empty identifier")
        .with_code(ErrorCode::E201)
        .with_label(span, "empty identifier")
        .with_help("name the `id` of a node or port")
}

fn unknown_identifier(identifier: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!("unknown identifier `{identifier}`"))
        .with_code(ErrorCode::E200)
        .with_label(span, "no node or port has this identifier")
        .with_help(format!("declare a node or port with `\"id\": \"{identifier}\"`"))
}
