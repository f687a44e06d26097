use float_cmp::assert_approx_eq;

use elkjson_core::{
    model::{Document, ElementRef, Endpoint, GraphElement, NodeId, ShapeRef},
    value::{JsonValue, Number},
};

use crate::{
    ParseOutput, Span, parse, parse_with,
    config::{ParseOptions, RecoveryMode},
    error::{DiagnosticKind, ErrorCode},
};

fn codes(output: &ParseOutput) -> Vec<ErrorCode> {
    output
        .diagnostics()
        .iter()
        .filter_map(|diagnostic| diagnostic.code())
        .collect()
}

fn parse_ok(source: &str) -> Document {
    let output = parse(source);
    assert!(
        output.diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        output.diagnostics()
    );
    output.into_document().expect("document expected")
}

fn child(doc: &Document, index: usize) -> NodeId {
    doc.node(doc.root()).children()[index]
}

fn abort() -> ParseOptions {
    ParseOptions::default().with_recovery(RecoveryMode::Abort)
}

// ============================================================================
// Elements
// ============================================================================

#[test]
fn test_empty_root() {
    let doc = parse_ok("{}");
    assert_eq!(doc.node_count(), 1);
    assert_eq!(doc.node(doc.root()).identifier(), None);
    assert_eq!(doc.span(ElementRef::Node(doc.root())), Span::new(0..2));
}

#[test]
fn test_node_geometry() {
    let doc = parse_ok(r#"{ "children": [ { "id": "n", x: 1, 'y': 2.5, width: -3e1, height: 4 } ] }"#);
    let node = doc.node(child(&doc, 0));
    let geometry = node.geometry();

    assert_eq!(node.identifier(), Some("n"));
    assert_approx_eq!(f64, geometry.x.unwrap(), 1.0);
    assert_approx_eq!(f64, geometry.y.unwrap(), 2.5);
    assert_approx_eq!(f64, geometry.width.unwrap(), -30.0);
    assert_approx_eq!(f64, geometry.height.unwrap(), 4.0);
}

#[test]
fn test_nested_children_keep_order() {
    let doc = parse_ok(
        r#"{ children: [
            { id: "a", children: [ { id: "a1" }, { id: "a2" } ] },
            { id: "b" },
        ] }"#,
    );
    let a = child(&doc, 0);
    let names: Vec<_> = doc
        .node(a)
        .children()
        .iter()
        .map(|id| doc.node(*id).identifier().unwrap())
        .collect();

    assert_eq!(names, vec!["a1", "a2"]);
    assert_eq!(doc.node(child(&doc, 1)).identifier(), Some("b"));
    assert_eq!(doc.node(a).parent(), Some(doc.root()));
}

#[test]
fn test_ports_labels_and_nested_labels() {
    let doc = parse_ok(
        r#"{
            ports: [ { id: "p", width: 5, labels: [ { text: "port label" } ] } ],
            labels: [ { id: "l", text: "outer", labels: [ { text: "inner" } ] } ],
        }"#,
    );
    let root = doc.node(doc.root());
    let port = doc.port(root.ports()[0]);
    let port_label = doc.label(port.labels()[0]);
    let outer = doc.label(root.labels()[0]);
    let inner = doc.label(outer.labels()[0]);

    assert_eq!(port.identifier(), Some("p"));
    assert_eq!(port_label.text(), Some("port label"));
    assert_eq!(outer.text(), Some("outer"));
    assert_eq!(inner.text(), Some("inner"));
    assert_eq!(inner.owner(), ElementRef::Label(root.labels()[0]));
}

#[test]
fn test_edges_are_contained_in_declaring_node() {
    let doc = parse_ok(
        r#"{ children: [
            { id: "a", children: [ { id: "x" } ], edges: [ { id: "inner", sources: ["x"], targets: ["x"] } ] },
        ], edges: [ { id: "outer", sources: ["a"], targets: ["x"] } ] }"#,
    );
    let a = child(&doc, 0);
    let inner = doc.node(a).contained_edges()[0];
    let outer = doc.node(doc.root()).contained_edges()[0];

    assert_eq!(doc.edge(inner).identifier(), Some("inner"));
    assert_eq!(doc.edge(inner).containing_node(), a);
    assert_eq!(doc.edge(outer).identifier(), Some("outer"));
}

#[test]
fn test_hyperedge_endpoints_keep_order() {
    let doc = parse_ok(
        r#"{ children: [ {id: "a"}, {id: "b"}, {id: "c"} ],
             edges: [ { sources: ["a", "b"], targets: ["c", "a",] } ] }"#,
    );
    let edge = doc.edge(doc.node(doc.root()).contained_edges()[0]);
    let names = |endpoints: &[elkjson_core::span::Spanned<Endpoint>]| -> Vec<String> {
        endpoints
            .iter()
            .map(|endpoint| doc.endpoint_identifier(endpoint).unwrap().to_string())
            .collect()
    };

    assert_eq!(names(edge.sources()), vec!["a", "b"]);
    assert_eq!(names(edge.targets()), vec!["c", "a"]);
}

#[test]
fn test_empty_element_objects() {
    let doc = parse_ok(r#"{ ports: [{}], labels: [{}], edges: [{}], children: [{}] }"#);
    assert_eq!(doc.port_count(), 1);
    assert_eq!(doc.label_count(), 1);
    assert_eq!(doc.edge_count(), 1);
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn test_lone_comma_is_an_empty_list() {
    let doc = parse_ok(r#"{ , }"#);
    assert_eq!(doc.node_count(), 1);

    let doc = parse_ok(r#"{ children: [ , ], layoutOptions: { , } }"#);
    assert!(doc.node(doc.root()).children().is_empty());
    assert!(doc.node(doc.root()).properties().is_empty());
}

#[test]
fn test_comments_anywhere() {
    let doc = parse_ok(
        "// graph\n{ /* the id */ id: \"g\", // trailing\n children: [ /* none */ ] }",
    );
    assert_eq!(doc.node(doc.root()).identifier(), Some("g"));
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn test_repeated_keys() {
    let doc = parse_ok(
        r#"{ id: "first", id: "second", x: 1, x: 2,
             children: [ {id: "a"} ], "children": [ {id: "b"} ],
             layoutOptions: { k: 1 }, properties: { k: 2 } }"#,
    );
    let root = doc.node(doc.root());

    assert_eq!(root.identifier(), Some("second"));
    assert_approx_eq!(f64, root.geometry().x.unwrap(), 2.0);
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.properties().len(), 2);
    assert_eq!(
        root.property("k").unwrap().value(),
        &JsonValue::Number(Number::Int(2))
    );
}

#[test]
fn test_escaped_key_is_generic_member() {
    let doc = parse_ok(r#"{ ^children: [1, 2], ^id: "kept" }"#);
    let root = doc.node(doc.root());

    assert!(root.children().is_empty());
    assert_eq!(root.identifier(), None);
    assert_eq!(root.members()[0].key(), "children");
    assert_eq!(root.members()[1].key(), "id");
    assert_eq!(root.members()[1].value().as_str(), Some("kept"));
}

#[test]
fn test_reserved_names_are_plain_keys_inside_generic_json() {
    let doc = parse_ok(r#"{ meta: { children: 1, "id": { x: null } } }"#);
    let member = &doc.node(doc.root()).members()[0];

    assert_eq!(member.key(), "meta");
    assert_eq!(
        member.value().get("children"),
        Some(&JsonValue::Number(Number::Int(1)))
    );
    assert_eq!(
        member.value().get("id").and_then(|id| id.get("x")),
        Some(&JsonValue::Null)
    );
}

#[test]
fn test_layout_options_keys_and_values() {
    let doc = parse_ok(
        r#"{ layoutOptions: { "elk.direction": "DOWN", spacing: 3, 'ratio': 3.0, children: true } }"#,
    );
    let root = doc.node(doc.root());
    let keys: Vec<_> = root.properties().iter().map(|p| p.key()).collect();

    assert_eq!(keys, vec!["elk.direction", "spacing", "ratio", "children"]);
    assert_eq!(root.properties()[1].value(), &JsonValue::Number(Number::Int(3)));
    assert_eq!(root.properties()[2].value(), &JsonValue::Number(Number::Float(3.0)));
    assert_ne!(root.properties()[1].value(), root.properties()[2].value());
    assert_eq!(root.properties()[3].value(), &JsonValue::Bool(true));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_reserved_key_on_wrong_element() {
    let output = parse(r#"{ edges: [ { children: [ {} ], id: "e" } ] }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E104]);
    let doc = output.document().unwrap();
    let edge = doc.edge(doc.node(doc.root()).contained_edges()[0]);
    assert_eq!(edge.identifier(), Some("e"));
    assert_eq!(doc.node_count(), 1);
    assert!(
        output.diagnostics()[0]
            .help()
            .unwrap()
            .contains("`sources`")
    );
}

#[test]
fn test_text_only_on_labels() {
    let output = parse(r#"{ text: "no" }"#);
    assert_eq!(codes(&output), vec![ErrorCode::E104]);
    assert_eq!(output.diagnostics()[0].primary_span(), Some(Span::new(2..6)));
}

#[test]
fn test_wrong_value_kind() {
    let output = parse(r#"{ id: 7, x: "wide", children: {}, ports: [ { id: "p" } ] }"#);

    assert_eq!(
        codes(&output),
        vec![ErrorCode::E102, ErrorCode::E102, ErrorCode::E102]
    );
    let doc = output.document().unwrap();
    assert_eq!(doc.node(doc.root()).identifier(), None);
    assert_eq!(doc.port_count(), 1);
    assert_eq!(output.diagnostics()[0].primary_span(), Some(Span::new(6..7)));
    assert_eq!(
        output.diagnostics()[0].kind(),
        Some(DiagnosticKind::Syntax)
    );
}

#[test]
fn test_endpoint_must_be_string() {
    let output = parse(r#"{ children: [ { id: "a" } ], edges: [ { sources: [1, "a"] } ] }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E102]);
    let doc = output.document().unwrap();
    let edge = doc.edge(doc.node(doc.root()).contained_edges()[0]);
    assert_eq!(edge.sources().len(), 1);
    assert!(edge.sources()[0].is_resolved());
}

#[test]
fn test_structured_property_value() {
    let output = parse(r#"{ layoutOptions: { a: [1], b: null, c: 1 } }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E105, ErrorCode::E105]);
    let doc = output.document().unwrap();
    let keys: Vec<_> = doc
        .node(doc.root())
        .properties()
        .iter()
        .map(|p| p.key())
        .collect();
    assert_eq!(keys, vec!["c"]);
}

#[test]
fn test_missing_comma_recovers() {
    let output = parse(r#"{ "id": "a" "x": 1, "y": 2 }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E100]);
    let diagnostic = &output.diagnostics()[0];
    assert_eq!(diagnostic.message(), "expected `,` or `}`, found string `\"x\"`");
    assert_eq!(diagnostic.primary_span(), Some(Span::new(12..15)));
    assert!(diagnostic.help().is_some());

    let doc = output.document().unwrap();
    let root = doc.node(doc.root());
    assert_eq!(root.identifier(), Some("a"));
    assert_eq!(root.geometry().x, None);
    assert_approx_eq!(f64, root.geometry().y.unwrap(), 2.0);
}

#[test]
fn test_two_malformed_ports() {
    let output = parse(
        r#"{ "id": "n", "ports": [ { "id": "p1" "x": 1 }, { "id": "p2", "y": }, { "id": "p3" } ] }"#,
    );

    assert_eq!(codes(&output), vec![ErrorCode::E100, ErrorCode::E100]);
    let doc = output.document().unwrap();
    let root = doc.node(doc.root());
    let ports: Vec<_> = root
        .ports()
        .iter()
        .map(|port| doc.port(*port).identifier().unwrap())
        .collect();
    assert_eq!(root.identifier(), Some("n"));
    assert_eq!(ports, vec!["p1", "p2", "p3"]);
}

#[test]
fn test_recovery_skips_nested_brackets() {
    let output = parse(r#"{ children: [ { id: "a" x: [1, {y: 2}] }, { id: "b" } ] }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E100]);
    assert_eq!(output.document().unwrap().node_count(), 3);
}

#[test]
fn test_recovery_leaves_enclosing_closer() {
    let output = parse(r#"{ children: [ { id: "a", ], id: "root" }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E100]);
    let doc = output.document().unwrap();
    assert_eq!(doc.node(doc.root()).identifier(), Some("root"));
    assert_eq!(doc.node(child(&doc, 0)).identifier(), Some("a"));
}

#[test]
fn test_stray_closer_is_skipped() {
    let output = parse(r#"{ id: "a" ], x: 1 }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E100]);
    let doc = output.document().unwrap();
    assert_approx_eq!(f64, doc.node(doc.root()).geometry().x.unwrap(), 1.0);
}

#[test]
fn test_unexpected_end_is_fatal() {
    let source = r#"{ "children": [ { "id": "a" "#;
    let output = parse(source);

    assert_eq!(codes(&output), vec![ErrorCode::E101]);
    assert!(output.document().is_none());
    let diagnostic = &output.diagnostics()[0];
    assert!(diagnostic.is_fatal());
    assert_eq!(
        diagnostic.primary_span(),
        Some(Span::new(source.len()..source.len()))
    );
    assert_eq!(diagnostic.labels()[1].span(), Span::new(16..17));
}

#[test]
fn test_syntax_error_then_end_of_input() {
    let output = parse(r#"{ "id": "a" : "#);

    assert_eq!(codes(&output), vec![ErrorCode::E100, ErrorCode::E101]);
    assert!(output.document().is_none());
}

#[test]
fn test_nesting_limit() {
    let options = ParseOptions::default().with_max_depth(3);

    let output = parse_with(r#"{ a: [ { } ] }"#, &options);
    assert!(output.diagnostics().is_empty());

    let output = parse_with(r#"{ a: [ { b: [] } ] }"#, &options);
    assert_eq!(codes(&output), vec![ErrorCode::E103]);
    assert!(output.document().is_none());
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let depth = 100;
    let source = format!("{{ a: {}{} }}", "[".repeat(depth), "]".repeat(depth));
    let output = parse(&source);
    assert!(output.diagnostics().is_empty());
}

#[test]
fn test_trailing_content() {
    let output = parse(r#"{ id: "a" } { id: "b" }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E106]);
    assert_eq!(output.diagnostics()[0].primary_span(), Some(Span::new(12..23)));
    let doc = output.document().unwrap();
    assert_eq!(doc.node(doc.root()).identifier(), Some("a"));
}

#[test]
fn test_root_must_be_object() {
    let output = parse(r#"[ { id: "a" } ]"#);
    assert_eq!(codes(&output), vec![ErrorCode::E100]);
    assert_eq!(output.document().unwrap().node_count(), 1);

    let output = parse("  // nothing\n");
    assert_eq!(codes(&output), vec![ErrorCode::E100]);
}

#[test]
fn test_lexical_errors_are_reported_once() {
    let output = parse("{ id: \"a\" @ , x: 'bad \\q', y: 2 }");

    assert_eq!(codes(&output), vec![ErrorCode::E002, ErrorCode::E003]);
    let doc = output.document().unwrap();
    let root = doc.node(doc.root());
    assert_eq!(root.identifier(), Some("a"));
    assert_eq!(root.geometry().x, None);
    assert_approx_eq!(f64, root.geometry().y.unwrap(), 2.0);
}

#[test]
fn test_unterminated_string_recovers_on_next_line() {
    let output = parse("{ id: \"a,\n  x: 1 }");

    assert_eq!(codes(&output), vec![ErrorCode::E001]);
    assert!(output.document().is_some());
}

#[test]
fn test_diagnostics_sorted_by_position() {
    let output = parse(r#"{ x: "a", @ y: "b", edges: [ { targets: ["ghost"] } ] }"#);

    assert_eq!(
        codes(&output),
        vec![ErrorCode::E102, ErrorCode::E002, ErrorCode::E102, ErrorCode::E200]
    );
    let starts: Vec<_> = output.diagnostics()[..3]
        .iter()
        .map(|diagnostic| diagnostic.primary_span().unwrap().start())
        .collect();
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
}

// ============================================================================
// Recovery modes
// ============================================================================

#[test]
fn test_abort_stops_at_first_error() {
    let output = parse_with(r#"{ "id": "a" "x": 1, y: }"#, &abort());

    assert_eq!(codes(&output), vec![ErrorCode::E100]);
    assert!(output.document().is_none());
}

#[test]
fn test_abort_on_wrong_value_kind() {
    let output = parse_with(r#"{ id: 1, x: "a" }"#, &abort());

    assert_eq!(codes(&output), vec![ErrorCode::E102]);
    assert!(output.document().is_none());
}

#[test]
fn test_abort_on_lexical_error() {
    let output = parse_with("{ id: \"a\" @ }", &abort());

    assert_eq!(codes(&output), vec![ErrorCode::E002]);
    assert!(output.document().is_none());
}

#[test]
fn test_abort_keeps_resolution_errors() {
    let output = parse_with(r#"{ edges: [ { targets: ["ghost"] } ] }"#, &abort());

    assert_eq!(codes(&output), vec![ErrorCode::E200]);
    let doc = output.document().unwrap();
    assert_eq!(doc.unresolved_endpoints().count(), 1);
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_endpoints_resolve_to_ports_and_nodes() {
    let doc = parse_ok(
        r#"{"id":"n1","ports":[{"id":"p1"}],"edges":[{"sources":["p1"],"targets":["n1"]}]}"#,
    );
    let root = doc.node(doc.root());
    let edge = doc.edge(root.contained_edges()[0]);

    assert_eq!(*edge.sources()[0], Endpoint::Resolved(ShapeRef::Port(root.ports()[0])));
    assert_eq!(*edge.targets()[0], Endpoint::Resolved(ShapeRef::Node(doc.root())));
}

#[test]
fn test_endpoint_spans_point_at_strings() {
    let source = r#"{ edges: [ { targets: ["nowhere"] } ] }"#;
    let output = parse(source);
    let start = source.find("\"nowhere\"").unwrap();

    assert_eq!(codes(&output), vec![ErrorCode::E200]);
    assert_eq!(
        output.diagnostics()[0].primary_span(),
        Some(Span::new(start..start + 9))
    );
}

#[test]
fn test_duplicate_identifier_warning() {
    let output = parse(r#"{ children: [ { id: "a" }, { id: "a" } ], edges: [ { sources: ["a"] } ] }"#);

    assert_eq!(codes(&output), vec![ErrorCode::E202]);
    assert!(!output.has_errors());
    let diagnostic = &output.diagnostics()[0];
    assert_eq!(diagnostic.primary_span(), Some(Span::new(33..36)));
    assert_eq!(diagnostic.labels()[1].span(), Span::new(20..23));

    let doc = output.into_result().unwrap();
    let edge = doc.edge(doc.node(doc.root()).contained_edges()[0]);
    assert_eq!(edge.sources()[0].shape(), Some(ShapeRef::Node(child(&doc, 0))));
}
