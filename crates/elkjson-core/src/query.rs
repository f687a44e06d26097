//! Structural queries over a [`Document`].
//!
//! These answer the questions downstream layout code asks about a graph:
//! which node a port belongs to, where an edge should live in the hierarchy,
//! which edges touch a node. Only resolved endpoints take part; unresolved
//! ones are invisible here and are reported by the resolver instead.

use log::debug;

use crate::{
    error::{GraphError, Result},
    model::{Document, EdgeId, ElementRef, LabelId, NodeId, PortId, ShapeRef},
};

/// The node a shape represents: the node itself, or the node owning a port.
pub fn shape_node(doc: &Document, shape: ShapeRef) -> NodeId {
    match shape {
        ShapeRef::Node(id) => id,
        ShapeRef::Port(id) => doc.port(id).parent(),
    }
}

/// The port a shape is, if it is one.
pub fn shape_port(shape: ShapeRef) -> Option<PortId> {
    match shape {
        ShapeRef::Port(id) => Some(id),
        ShapeRef::Node(_) => None,
    }
}

/// `node` followed by all of its ancestors up to the root.
pub fn ancestors(doc: &Document, node: NodeId) -> Vec<NodeId> {
    let mut chain = vec![node];
    let mut current = node;
    while let Some(parent) = doc.node(current).parent() {
        chain.push(parent);
        current = parent;
    }
    chain
}

/// Whether `ancestor` is a proper ancestor of `child`.
pub fn is_descendant(doc: &Document, child: NodeId, ancestor: NodeId) -> bool {
    let mut current = child;
    while let Some(parent) = doc.node(current).parent() {
        if parent == ancestor {
            return true;
        }
        current = parent;
    }
    false
}

/// The deepest node that is `first` or `second` or an ancestor of both.
pub fn lowest_common_ancestor(doc: &Document, first: NodeId, second: NodeId) -> Option<NodeId> {
    let first_chain = ancestors(doc, first);
    let second_chain = ancestors(doc, second);

    first_chain
        .iter()
        .rev()
        .zip(second_chain.iter().rev())
        .take_while(|(a, b)| a == b)
        .last()
        .map(|(a, _)| *a)
}

/// The node whose graph an element is part of.
///
/// For a node this is its parent, for an edge its containing node. Ports and
/// labels answer for the element they belong to. The root has no containing
/// graph.
pub fn containing_graph(doc: &Document, element: ElementRef) -> Option<NodeId> {
    match element {
        ElementRef::Node(id) => doc.node(id).parent(),
        ElementRef::Edge(id) => Some(doc.edge(id).containing_node()),
        ElementRef::Port(id) => doc.node(doc.port(id).parent()).parent(),
        ElementRef::Label(id) => containing_graph(doc, doc.label(id).owner()),
    }
}

/// The first non-label element above a label.
pub fn element_labeled_by(doc: &Document, label: LabelId) -> ElementRef {
    let mut owner = doc.label(label).owner();
    while let ElementRef::Label(id) = owner {
        owner = doc.label(id).owner();
    }
    owner
}

/// Edges with `shape` among their resolved targets.
pub fn incoming_edges(doc: &Document, shape: ShapeRef) -> Vec<EdgeId> {
    doc.edges()
        .filter(|(_, edge)| edge.target_shapes().any(|target| target == shape))
        .map(|(id, _)| id)
        .collect()
}

/// Edges with `shape` among their resolved sources.
pub fn outgoing_edges(doc: &Document, shape: ShapeRef) -> Vec<EdgeId> {
    doc.edges()
        .filter(|(_, edge)| edge.source_shapes().any(|source| source == shape))
        .map(|(id, _)| id)
        .collect()
}

/// Incoming edges of a node and of all its ports.
pub fn all_incoming_edges(doc: &Document, node: NodeId) -> Vec<EdgeId> {
    let mut edges = incoming_edges(doc, ShapeRef::Node(node));
    for port in doc.node(node).ports() {
        edges.extend(incoming_edges(doc, ShapeRef::Port(*port)));
    }
    edges
}

/// Outgoing edges of a node and of all its ports.
pub fn all_outgoing_edges(doc: &Document, node: NodeId) -> Vec<EdgeId> {
    let mut edges = outgoing_edges(doc, ShapeRef::Node(node));
    for port in doc.node(node).ports() {
        edges.extend(outgoing_edges(doc, ShapeRef::Port(*port)));
    }
    edges
}

/// Outgoing then incoming edges of a node and its ports.
pub fn incident_edges(doc: &Document, node: NodeId) -> Vec<EdgeId> {
    let mut edges = all_outgoing_edges(doc, node);
    edges.extend(all_incoming_edges(doc, node));
    edges
}

/// Resolved sources followed by resolved targets.
pub fn incident_shapes(doc: &Document, edge: EdgeId) -> Vec<ShapeRef> {
    let edge = doc.edge(edge);
    edge.source_shapes().chain(edge.target_shapes()).collect()
}

/// Whether the edge has at least one resolved source and one resolved target.
pub fn is_connected(doc: &Document, edge: EdgeId) -> bool {
    let edge = doc.edge(edge);
    edge.source_shapes().next().is_some() && edge.target_shapes().next().is_some()
}

/// Whether the edge has more than one source or more than one target.
pub fn is_hyperedge(doc: &Document, edge: EdgeId) -> bool {
    let edge = doc.edge(edge);
    edge.sources().len() > 1 || edge.targets().len() > 1
}

/// Whether all incident shapes belong to the same node.
///
/// An edge without resolved endpoints counts as a self loop.
pub fn is_selfloop(doc: &Document, edge: EdgeId) -> bool {
    let mut nodes = incident_shapes(doc, edge)
        .into_iter()
        .map(|shape| shape_node(doc, shape));
    match nodes.next() {
        Some(first) => nodes.all(|node| node == first),
        None => true,
    }
}

/// Whether the incident shapes sit on different hierarchy levels.
pub fn is_hierarchical(doc: &Document, edge: EdgeId) -> bool {
    let mut parents = incident_shapes(doc, edge)
        .into_iter()
        .map(|shape| doc.node(shape_node(doc, shape)).parent());
    match parents.next() {
        Some(first) => parents.any(|parent| parent != first),
        None => false,
    }
}

/// The node of a simple edge's only source.
pub fn source_node(doc: &Document, edge: EdgeId) -> Result<NodeId> {
    simple_endpoints(doc, edge).map(|(source, _)| shape_node(doc, source))
}

/// The node of a simple edge's only target.
pub fn target_node(doc: &Document, edge: EdgeId) -> Result<NodeId> {
    simple_endpoints(doc, edge).map(|(_, target)| shape_node(doc, target))
}

/// The port of a simple edge's only source, if it is a port.
pub fn source_port(doc: &Document, edge: EdgeId) -> Result<Option<PortId>> {
    simple_endpoints(doc, edge).map(|(source, _)| shape_port(source))
}

/// The port of a simple edge's only target, if it is a port.
pub fn target_port(doc: &Document, edge: EdgeId) -> Result<Option<PortId>> {
    simple_endpoints(doc, edge).map(|(_, target)| shape_port(target))
}

fn simple_endpoints(doc: &Document, id: EdgeId) -> Result<(ShapeRef, ShapeRef)> {
    let edge = doc.edge(id);
    let (source, target) = match (edge.sources(), edge.targets()) {
        ([source], [target]) => (source, target),
        _ => return Err(GraphError::NotSimpleEdge(id)),
    };
    match (source.shape(), target.shape()) {
        (Some(source), Some(target)) => Ok((source, target)),
        _ => Err(GraphError::UnresolvedEndpoint(id)),
    }
}

/// The node an edge should be contained in given its endpoints.
///
/// This is the lowest node whose graph holds all incident shapes: the common
/// parent of sibling endpoints, the endpoint node itself when the other
/// endpoint is one of its children, and the lowest common ancestor in
/// general. Endpoints directly below the root, or the root itself, lead to
/// the root.
pub fn find_best_edge_containment(doc: &Document, edge: EdgeId) -> Result<NodeId> {
    let record = doc.edge(edge);
    if record.sources().iter().chain(record.targets()).any(|e| !e.is_resolved()) {
        return Err(GraphError::UnresolvedEndpoint(edge));
    }

    let shapes = incident_shapes(doc, edge);
    let parent_or_root = |node: NodeId| doc.node(node).parent().unwrap_or(doc.root());

    match shapes.as_slice() {
        [] => Err(GraphError::NoIncidentShapes(edge)),
        [only] => Ok(parent_or_root(shape_node(doc, *only))),
        [source, target] if record.sources().len() == 1 => {
            let source = shape_node(doc, *source);
            let target = shape_node(doc, *target);
            let source_parent = doc.node(source).parent();
            let target_parent = doc.node(target).parent();

            if source_parent == target_parent {
                Ok(parent_or_root(source))
            } else if target_parent == Some(source) {
                Ok(source)
            } else if source_parent == Some(target) {
                Ok(target)
            } else {
                Ok(common_container(doc, &shapes))
            }
        }
        _ => Ok(common_container(doc, &shapes)),
    }
}

fn common_container(doc: &Document, shapes: &[ShapeRef]) -> NodeId {
    let mut nodes = shapes.iter().map(|shape| shape_node(doc, *shape));
    let Some(first) = nodes.next() else {
        return doc.root();
    };

    let mut ancestor = first;
    for node in nodes {
        if node == ancestor || is_descendant(doc, node, ancestor) {
            continue;
        }
        let node_parent = doc.node(node).parent();
        ancestor = if node_parent.is_some() && node_parent == doc.node(ancestor).parent() {
            node_parent.unwrap_or(doc.root())
        } else {
            lowest_common_ancestor(doc, ancestor, node).unwrap_or(doc.root())
        };
    }
    ancestor
}

/// Move an edge into the node returned by [`find_best_edge_containment`].
pub fn update_containment(doc: &mut Document, edge: EdgeId) -> Result<NodeId> {
    let container = find_best_edge_containment(doc, edge)?;
    let previous = doc.edge(edge).containing_node();
    if previous != container {
        debug!(edge:% = edge, from:% = previous, to:% = container; "Moving edge");
        doc.move_edge(edge, container);
    }
    Ok(container)
}
