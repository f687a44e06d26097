//! Identifier normalisation for graph elements.
//!
//! [`IdentifierGenerator`] rewrites the identifiers of a [`Document`] in up
//! to three passes, each enabled on the builder:
//!
//! - **validate** replaces every character that may not appear in a bare
//!   identifier (`[A-Za-z_][A-Za-z0-9_]*`) with `_`.
//! - **generate** gives every element without an identifier a fresh one:
//!   `G1` for the root, `N<n>`, `P<n>`, `E<n>` and `L<n>` for nodes, ports,
//!   edges and labels. Identifiers already present in the document are
//!   skipped.
//! - **unique** renames later duplicates by appending `_g` and a four digit
//!   counter.
//!
//! # Example
//!
//! ```
//! # use elkjson_core::{identifier::IdentifierGenerator, model::{Document, GraphElement}, span::Span};
//! let mut doc = Document::new();
//! let node = doc.add_node(doc.root(), Span::default());
//!
//! IdentifierGenerator::for_document(&mut doc).generate().execute();
//!
//! assert_eq!(doc.node(doc.root()).identifier(), Some("G1"));
//! assert_eq!(doc.node(node).identifier(), Some("N1"));
//! ```

use std::collections::HashSet;

use log::debug;

use crate::model::{Document, ElementKind, ElementRef, GraphElement, NodeId};

/// Per-kind counters for generated identifiers.
#[derive(Debug, Default)]
struct Counters {
    nodes: usize,
    ports: usize,
    labels: usize,
    edges: usize,
}

impl Counters {
    /// The next candidate identifier for an element of `kind`.
    fn next(&mut self, kind: ElementKind) -> String {
        let (prefix, counter) = match kind {
            ElementKind::Node => ("N", &mut self.nodes),
            ElementKind::Port => ("P", &mut self.ports),
            ElementKind::Label => ("L", &mut self.labels),
            ElementKind::Edge => ("E", &mut self.edges),
        };
        *counter += 1;
        format!("{prefix}{counter}")
    }
}

/// Builder that normalises the identifiers of one document.
#[derive(Debug)]
pub struct IdentifierGenerator<'a> {
    doc: &'a mut Document,
    validate: bool,
    generate: bool,
    unique: bool,
}

impl<'a> IdentifierGenerator<'a> {
    pub fn for_document(doc: &'a mut Document) -> Self {
        Self {
            doc,
            validate: false,
            generate: false,
            unique: false,
        }
    }

    /// Replace characters that are not valid in bare identifiers.
    pub fn validate(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Give every element without an identifier a generated one.
    pub fn generate(mut self) -> Self {
        self.generate = true;
        self
    }

    /// Rename duplicate identifiers until every identifier is unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Run the enabled passes. Returns how many identifiers were changed.
    pub fn execute(self) -> usize {
        let order = tree_order(self.doc);
        let mut changed = 0;

        if self.validate {
            changed += validate_identifiers(self.doc, &order);
        }
        if self.generate {
            changed += generate_identifiers(self.doc, &order);
        }
        if self.unique {
            changed += make_unique(self.doc, &order);
        }

        debug!(changed; "Identifier normalisation finished");
        changed
    }
}

/// Replace every character outside `[A-Za-z_][A-Za-z0-9_]*` with `_`.
///
/// Returns `None` if the identifier is already valid or empty.
pub fn sanitize(identifier: &str) -> Option<String> {
    let mut valid = true;
    let sanitized: String = identifier
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_ascii_alphabetic() || c == '_' || (i > 0 && c.is_ascii_digit()) {
                c
            } else {
                valid = false;
                '_'
            }
        })
        .collect();

    (!valid).then_some(sanitized)
}

fn has_identifier(element: &dyn GraphElement) -> bool {
    element
        .identifier()
        .is_some_and(|identifier| !identifier.trim().is_empty())
}

fn validate_identifiers(doc: &mut Document, order: &[ElementRef]) -> usize {
    let mut changed = 0;
    for element in order {
        let element = doc.element_mut(*element);
        if let Some(valid) = element.identifier().and_then(sanitize) {
            element.set_identifier(Some(valid));
            changed += 1;
        }
    }
    changed
}

fn generate_identifiers(doc: &mut Document, order: &[ElementRef]) -> usize {
    let existing: HashSet<String> = order
        .iter()
        .filter_map(|element| doc.element(*element).identifier())
        .filter(|identifier| !identifier.trim().is_empty())
        .map(str::to_string)
        .collect();
    let mut counters = Counters::default();
    let root = ElementRef::Node(doc.root());
    let mut changed = 0;

    for element in order {
        if has_identifier(doc.element(*element)) {
            continue;
        }

        let identifier = if *element == root {
            "G1".to_string()
        } else {
            let kind = element.kind();
            loop {
                let candidate = counters.next(kind);
                if !existing.contains(&candidate) {
                    break candidate;
                }
            }
        };
        doc.element_mut(*element).set_identifier(Some(identifier));
        changed += 1;
    }
    changed
}

fn make_unique(doc: &mut Document, order: &[ElementRef]) -> usize {
    let mut known: HashSet<String> = HashSet::new();
    let mut counter = 0u32;
    let mut changed = 0;

    for element in order {
        let Some(mut identifier) = doc.element(*element).identifier().map(str::to_string) else {
            continue;
        };
        if !known.contains(&identifier) {
            known.insert(identifier);
            continue;
        }

        while known.contains(&identifier) {
            counter = (counter + 1) % 10_000;
            identifier = format!("{identifier}_g{counter:04}");
        }
        known.insert(identifier.clone());
        doc.element_mut(*element).set_identifier(Some(identifier));
        changed += 1;
    }
    changed
}

/// Elements in containment order: a node, its labels, its ports, its
/// contained edges, then its children. Labels follow their owner directly.
fn tree_order(doc: &Document) -> Vec<ElementRef> {
    fn push_labeled(doc: &Document, element: ElementRef, out: &mut Vec<ElementRef>) {
        out.push(element);
        for label in doc.element(element).labels() {
            push_labeled(doc, ElementRef::Label(*label), out);
        }
    }

    fn push_node(doc: &Document, id: NodeId, out: &mut Vec<ElementRef>) {
        let node = doc.node(id);
        push_labeled(doc, ElementRef::Node(id), out);
        for port in node.ports() {
            push_labeled(doc, ElementRef::Port(*port), out);
        }
        for edge in node.contained_edges() {
            push_labeled(doc, ElementRef::Edge(*edge), out);
        }
        for child in node.children() {
            push_node(doc, *child, out);
        }
    }

    let mut order = Vec::new();
    push_node(doc, doc.root(), &mut order);
    order
}
