//! Model construction driven by parser actions.
//!
//! The parser calls into [`ModelBuilder`] as productions complete. Elements
//! are allocated when their opening brace is read and attached to their
//! owner immediately, so document order is insertion order. Edge endpoints
//! are recorded as unresolved identifier text; linking them to shapes is the
//! job of [`resolve`](crate::resolve).

use log::trace;

use elkjson_core::{
    model::{Document, EdgeId, ElementRef, Endpoint, LabelId, NodeId, PortId},
    value::{JsonMember, Property},
};

use crate::{
    Span, Spanned,
    keys::ReservedKey,
};

/// Builds a [`Document`] one element at a time.
#[derive(Debug, Default)]
pub(crate) struct ModelBuilder {
    doc: Document,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> NodeId {
        self.doc.root()
    }

    // ============================================================================
    // Element creation
    // ============================================================================

    pub fn open_node(&mut self, parent: NodeId, span: Span) -> NodeId {
        let id = self.doc.add_node(parent, span);
        trace!(node:% = id, parent:% = parent; "Opened node");
        id
    }

    pub fn open_port(&mut self, node: NodeId, span: Span) -> PortId {
        let id = self.doc.add_port(node, span);
        trace!(port:% = id, node:% = node; "Opened port");
        id
    }

    pub fn open_label(&mut self, owner: ElementRef, span: Span) -> LabelId {
        let id = self.doc.add_label(owner, span);
        trace!(label:% = id, owner:% = owner; "Opened label");
        id
    }

    pub fn open_edge(&mut self, node: NodeId, span: Span) -> EdgeId {
        let id = self.doc.add_edge(node, span);
        trace!(edge:% = id, node:% = node; "Opened edge");
        id
    }

    /// Record the full extent of an element once its closing token is read.
    pub fn close(&mut self, element: ElementRef, span: Span) {
        self.doc.set_span(element, span);
        trace!(element:% = element; "Closed element");
    }

    // ============================================================================
    // Attributes
    // ============================================================================

    /// Set the identifier. A repeated `id` key replaces the earlier value.
    pub fn set_identifier(&mut self, element: ElementRef, identifier: Spanned<String>) {
        self.doc.element_mut(element).set_spanned_identifier(identifier);
    }

    /// Set one geometry component of a shape. Edges have no geometry.
    pub fn set_geometry(&mut self, element: ElementRef, key: ReservedKey, value: f64) {
        let geometry = match element {
            ElementRef::Node(id) => self.doc.node_mut(id).geometry_mut(),
            ElementRef::Port(id) => self.doc.port_mut(id).geometry_mut(),
            ElementRef::Label(id) => self.doc.label_mut(id).geometry_mut(),
            ElementRef::Edge(_) => return,
        };
        let slot = match key {
            ReservedKey::X => &mut geometry.x,
            ReservedKey::Y => &mut geometry.y,
            ReservedKey::Width => &mut geometry.width,
            ReservedKey::Height => &mut geometry.height,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn set_text(&mut self, label: LabelId, text: String) {
        self.doc.label_mut(label).set_text(Some(text));
    }

    pub fn add_property(&mut self, element: ElementRef, property: Property) {
        trace!(element:% = element, key = property.key(); "Added layout option");
        self.doc.element_mut(element).add_property(property);
    }

    pub fn add_member(&mut self, element: ElementRef, member: JsonMember) {
        trace!(element:% = element, key = member.key(); "Added generic member");
        self.doc.element_mut(element).add_member(member);
    }

    /// Record an endpoint of `edge` as unresolved identifier text.
    pub fn add_endpoint(&mut self, edge: EdgeId, key: ReservedKey, identifier: Spanned<String>) {
        let endpoint = identifier.map(Endpoint::Unresolved);
        let edge = self.doc.edge_mut(edge);
        match key {
            ReservedKey::Sources => edge.add_source(endpoint),
            ReservedKey::Targets => edge.add_target(endpoint),
            _ => {}
        }
    }

    pub fn finish(self) -> Document {
        self.doc
    }
}
