//! The in-memory graph model.
//!
//! A [`Document`] owns every element of one parsed graph in flat arenas. The
//! tree structure (a node's children, ports, labels and contained edges) is
//! expressed with typed indices ([`NodeId`], [`PortId`], [`LabelId`],
//! [`EdgeId`]), and so are cross-tree edge endpoints once they are resolved
//! ([`ShapeRef`]). No element ever holds a pointer to another.
//!
//! Elements are created through the `add_*` methods, which allocate the new
//! element and append it to its parent's ordered list in one step, so
//! document order is preserved by construction.
//!
//! Every element carries the source [`Span`] it was read from. Spans are not
//! part of element equality: two documents parsed from differently formatted
//! texts describing the same graph compare equal.

use std::fmt;

use crate::{
    span::{Span, Spanned},
    value::{JsonMember, Property},
};

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// The position of the element in its arena.
            pub fn index(self) -> usize {
                self.0 as usize
            }

            fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).expect("graph element arena exceeds u32::MAX entries"))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

element_id!(
    /// Index of a [`Node`] in its [`Document`].
    NodeId,
    "node"
);
element_id!(
    /// Index of a [`Port`] in its [`Document`].
    PortId,
    "port"
);
element_id!(
    /// Index of a [`Label`] in its [`Document`].
    LabelId,
    "label"
);
element_id!(
    /// Index of an [`Edge`] in its [`Document`].
    EdgeId,
    "edge"
);

/// A reference to any graph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(NodeId),
    Port(PortId),
    Label(LabelId),
    Edge(EdgeId),
}

impl ElementRef {
    pub fn kind(self) -> ElementKind {
        match self {
            ElementRef::Node(_) => ElementKind::Node,
            ElementRef::Port(_) => ElementKind::Port,
            ElementRef::Label(_) => ElementKind::Label,
            ElementRef::Edge(_) => ElementKind::Edge,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Node(id) => id.fmt(f),
            ElementRef::Port(id) => id.fmt(f),
            ElementRef::Label(id) => id.fmt(f),
            ElementRef::Edge(id) => id.fmt(f),
        }
    }
}

/// The four kinds of graph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Port,
    Label,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Node => "node",
            ElementKind::Port => "port",
            ElementKind::Label => "label",
            ElementKind::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// A connectable shape: anything an edge endpoint may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRef {
    Node(NodeId),
    Port(PortId),
}

impl From<NodeId> for ShapeRef {
    fn from(id: NodeId) -> Self {
        ShapeRef::Node(id)
    }
}

impl From<PortId> for ShapeRef {
    fn from(id: PortId) -> Self {
        ShapeRef::Port(id)
    }
}

impl From<ShapeRef> for ElementRef {
    fn from(shape: ShapeRef) -> Self {
        match shape {
            ShapeRef::Node(id) => ElementRef::Node(id),
            ShapeRef::Port(id) => ElementRef::Port(id),
        }
    }
}

impl From<NodeId> for ElementRef {
    fn from(id: NodeId) -> Self {
        ElementRef::Node(id)
    }
}

impl From<PortId> for ElementRef {
    fn from(id: PortId) -> Self {
        ElementRef::Port(id)
    }
}

impl From<LabelId> for ElementRef {
    fn from(id: LabelId) -> Self {
        ElementRef::Label(id)
    }
}

impl From<EdgeId> for ElementRef {
    fn from(id: EdgeId) -> Self {
        ElementRef::Edge(id)
    }
}

/// Position and size of a shape. Every component is optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Attributes shared by every graph element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    identifier: Option<Spanned<String>>,
    labels: Vec<LabelId>,
    properties: Vec<Property>,
    members: Vec<JsonMember>,
}

/// Common accessors of nodes, ports, labels and edges.
pub trait GraphElement {
    fn data(&self) -> &ElementData;

    fn data_mut(&mut self) -> &mut ElementData;

    /// The element's identifier, if one was given.
    fn identifier(&self) -> Option<&str> {
        self.data().identifier.as_ref().map(|identifier| identifier.as_str())
    }

    /// Where the identifier value was written, if it came from source text.
    fn identifier_span(&self) -> Option<Span> {
        self.data()
            .identifier
            .as_ref()
            .map(Spanned::span)
            .filter(|span| !span.is_empty())
    }

    /// Replace the identifier, keeping the recorded source span.
    fn set_identifier(&mut self, identifier: Option<String>) {
        let data = self.data_mut();
        let span = data
            .identifier
            .as_ref()
            .map(Spanned::span)
            .unwrap_or_default();
        data.identifier = identifier.map(|identifier| Spanned::new(identifier, span));
    }

    fn set_spanned_identifier(&mut self, identifier: Spanned<String>) {
        self.data_mut().identifier = Some(identifier);
    }

    /// Labels attached to this element, in document order.
    fn labels(&self) -> &[LabelId] {
        &self.data().labels
    }

    /// Layout options, in document order.
    fn properties(&self) -> &[Property] {
        &self.data().properties
    }

    /// Look up a layout option by key. The last occurrence wins.
    fn property(&self, key: &str) -> Option<&Property> {
        self.data()
            .properties
            .iter()
            .rev()
            .find(|property| property.key() == key)
    }

    fn add_property(&mut self, property: Property) {
        self.data_mut().properties.push(property);
    }

    /// Members under keys that carry no structural meaning, kept verbatim.
    fn members(&self) -> &[JsonMember] {
        &self.data().members
    }

    fn add_member(&mut self, member: JsonMember) {
        self.data_mut().members.push(member);
    }
}

macro_rules! impl_graph_element {
    ($($ty:ty),+) => {
        $(
            impl GraphElement for $ty {
                fn data(&self) -> &ElementData {
                    &self.data
                }

                fn data_mut(&mut self) -> &mut ElementData {
                    &mut self.data
                }
            }
        )+
    };
}

impl_graph_element!(Node, Port, Label, Edge);

/// A graph node. The document root is a node without a parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    data: ElementData,
    parent: Option<NodeId>,
    geometry: Geometry,
    children: Vec<NodeId>,
    ports: Vec<PortId>,
    edges: Vec<EdgeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }

    /// Edges declared inside this node.
    pub fn contained_edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// A port on the border of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    data: ElementData,
    parent: NodeId,
    geometry: Geometry,
}

impl Port {
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }
}

/// A text label on a node, port, edge or another label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    data: ElementData,
    owner: ElementRef,
    geometry: Geometry,
    text: Option<String>,
}

impl Label {
    /// The element this label is attached to.
    pub fn owner(&self) -> ElementRef {
        self.owner
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }
}

/// One end of an edge.
///
/// Before resolution an endpoint is the identifier text found in the
/// document; resolution replaces it with the shape it names. An endpoint
/// whose identifier names no shape stays [`Endpoint::Unresolved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unresolved(String),
    Resolved(ShapeRef),
}

impl Endpoint {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Endpoint::Resolved(_))
    }

    /// The referenced shape, if resolved.
    pub fn shape(&self) -> Option<ShapeRef> {
        match self {
            Endpoint::Resolved(shape) => Some(*shape),
            Endpoint::Unresolved(_) => None,
        }
    }
}

/// An edge between connectable shapes. Edges may have several sources and
/// targets (hyperedges).
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    data: ElementData,
    containing_node: NodeId,
    sources: Vec<Spanned<Endpoint>>,
    targets: Vec<Spanned<Endpoint>>,
}

impl Edge {
    /// The node this edge is declared in.
    pub fn containing_node(&self) -> NodeId {
        self.containing_node
    }

    pub fn sources(&self) -> &[Spanned<Endpoint>] {
        &self.sources
    }

    pub fn targets(&self) -> &[Spanned<Endpoint>] {
        &self.targets
    }

    pub fn add_source(&mut self, endpoint: Spanned<Endpoint>) {
        self.sources.push(endpoint);
    }

    pub fn add_target(&mut self, endpoint: Spanned<Endpoint>) {
        self.targets.push(endpoint);
    }

    /// Mutable access to all endpoints, sources first.
    pub fn endpoints_mut(&mut self) -> impl Iterator<Item = &mut Spanned<Endpoint>> {
        self.sources.iter_mut().chain(self.targets.iter_mut())
    }

    /// Shapes of all resolved sources, in order.
    pub fn source_shapes(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.sources.iter().filter_map(|endpoint| endpoint.shape())
    }

    /// Shapes of all resolved targets, in order.
    pub fn target_shapes(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.targets.iter().filter_map(|endpoint| endpoint.shape())
    }
}

/// A parsed graph: the root node and everything it transitively owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Spanned<Node>>,
    ports: Vec<Spanned<Port>>,
    labels: Vec<Spanned<Label>>,
    edges: Vec<Spanned<Edge>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only an empty root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Spanned::new(Node::default(), Span::default())],
            ports: Vec::new(),
            labels: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// The root node of the graph.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a node as the last child of `parent`.
    pub fn add_node(&mut self, parent: NodeId, span: Span) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let node = Node {
            parent: Some(parent),
            ..Node::default()
        };
        self.nodes.push(Spanned::new(node, span));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Create a port as the last port of `node`.
    pub fn add_port(&mut self, node: NodeId, span: Span) -> PortId {
        let id = PortId::from_index(self.ports.len());
        let port = Port {
            data: ElementData::default(),
            parent: node,
            geometry: Geometry::default(),
        };
        self.ports.push(Spanned::new(port, span));
        self.nodes[node.index()].ports.push(id);
        id
    }

    /// Create a label as the last label of `owner`.
    pub fn add_label(&mut self, owner: ElementRef, span: Span) -> LabelId {
        let id = LabelId::from_index(self.labels.len());
        let label = Label {
            data: ElementData::default(),
            owner,
            geometry: Geometry::default(),
            text: None,
        };
        self.labels.push(Spanned::new(label, span));
        self.element_mut(owner).data_mut().labels.push(id);
        id
    }

    /// Create an edge as the last edge contained in `node`.
    pub fn add_edge(&mut self, node: NodeId, span: Span) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len());
        let edge = Edge {
            data: ElementData::default(),
            containing_node: node,
            sources: Vec::new(),
            targets: Vec::new(),
        };
        self.edges.push(Spanned::new(edge, span));
        self.nodes[node.index()].edges.push(id);
        id
    }

    /// Move an edge into the contained-edges list of another node.
    pub fn move_edge(&mut self, edge: EdgeId, node: NodeId) {
        let previous = self.edges[edge.index()].containing_node;
        if previous == node {
            return;
        }
        self.nodes[previous.index()].edges.retain(|e| *e != edge);
        self.nodes[node.index()].edges.push(edge);
        self.edges[edge.index()].containing_node = node;
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.index()]
    }

    pub fn port_mut(&mut self, id: PortId) -> &mut Port {
        &mut self.ports[id.index()]
    }

    pub fn label(&self, id: LabelId) -> &Label {
        &self.labels[id.index()]
    }

    pub fn label_mut(&mut self, id: LabelId) -> &mut Label {
        &mut self.labels[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }

    /// Any element, through its common attributes.
    pub fn element(&self, element: ElementRef) -> &dyn GraphElement {
        match element {
            ElementRef::Node(id) => self.node(id),
            ElementRef::Port(id) => self.port(id),
            ElementRef::Label(id) => self.label(id),
            ElementRef::Edge(id) => self.edge(id),
        }
    }

    pub fn element_mut(&mut self, element: ElementRef) -> &mut dyn GraphElement {
        match element {
            ElementRef::Node(id) => self.node_mut(id),
            ElementRef::Port(id) => self.port_mut(id),
            ElementRef::Label(id) => self.label_mut(id),
            ElementRef::Edge(id) => self.edge_mut(id),
        }
    }

    /// The source span an element was read from.
    pub fn span(&self, element: ElementRef) -> Span {
        match element {
            ElementRef::Node(id) => self.nodes[id.index()].span(),
            ElementRef::Port(id) => self.ports[id.index()].span(),
            ElementRef::Label(id) => self.labels[id.index()].span(),
            ElementRef::Edge(id) => self.edges[id.index()].span(),
        }
    }

    /// Replace the recorded span of an element.
    pub fn set_span(&mut self, element: ElementRef, span: Span) {
        match element {
            ElementRef::Node(id) => self.nodes[id.index()].set_span(span),
            ElementRef::Port(id) => self.ports[id.index()].set_span(span),
            ElementRef::Label(id) => self.labels[id.index()].set_span(span),
            ElementRef::Edge(id) => self.edges[id.index()].set_span(span),
        }
    }

    /// The identifier of a connectable shape.
    pub fn shape_identifier(&self, shape: ShapeRef) -> Option<&str> {
        self.element(shape.into()).identifier()
    }

    /// The identifier an endpoint refers to: the unresolved text, or the
    /// identifier of the resolved shape.
    pub fn endpoint_identifier<'a>(&'a self, endpoint: &'a Endpoint) -> Option<&'a str> {
        match endpoint {
            Endpoint::Unresolved(text) => Some(text),
            Endpoint::Resolved(shape) => self.shape_identifier(*shape),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::from_index(i), node.inner()))
    }

    pub fn ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports
            .iter()
            .enumerate()
            .map(|(i, port)| (PortId::from_index(i), port.inner()))
    }

    pub fn labels(&self) -> impl Iterator<Item = (LabelId, &Label)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (LabelId::from_index(i), label.inner()))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (EdgeId::from_index(i), edge.inner()))
    }

    /// Every element of the document: nodes, ports, labels, then edges.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef> + '_ {
        let nodes = (0..self.nodes.len()).map(|i| ElementRef::Node(NodeId::from_index(i)));
        let ports = (0..self.ports.len()).map(|i| ElementRef::Port(PortId::from_index(i)));
        let labels = (0..self.labels.len()).map(|i| ElementRef::Label(LabelId::from_index(i)));
        let edges = (0..self.edges.len()).map(|i| ElementRef::Edge(EdgeId::from_index(i)));
        nodes.chain(ports).chain(labels).chain(edges)
    }

    /// Every connectable shape in declaration order, by where its object
    /// starts in the source.
    ///
    /// Shapes with the same start, such as elements built without source
    /// text, keep tree order: a node, then its ports, then its children.
    pub fn shapes_in_declaration_order(&self) -> Vec<ShapeRef> {
        let mut shapes = Vec::with_capacity(self.nodes.len() + self.ports.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            shapes.push(ShapeRef::Node(id));
            shapes.extend(node.ports().iter().copied().map(ShapeRef::Port));
            stack.extend(node.children().iter().rev().copied());
        }
        shapes.sort_by_key(|shape| self.span((*shape).into()).start());
        shapes
    }

    /// Every node below `node` in pre-order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.node(node).children().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.node(id).children().iter().rev().copied());
        }
        result
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All endpoints that did not resolve to a shape.
    pub fn unresolved_endpoints(&self) -> impl Iterator<Item = (EdgeId, &Spanned<Endpoint>)> {
        self.edges().flat_map(|(id, edge)| {
            edge.sources()
                .iter()
                .chain(edge.targets())
                .filter(|endpoint| !endpoint.is_resolved())
                .map(move |endpoint| (id, endpoint))
        })
    }
}
