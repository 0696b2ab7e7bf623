//! Basic engine tests for the xrust adapter.

use dom_engine_traits::{DomEngine, Error, NodeKind, ParserOptions, SerializeConfig, XPathSupport};
use xrust_adapter::XrustEngine;

const CATALOG: &str =
    r#"<catalog><item id="1">first</item><item id="2">second</item></catalog>"#;

fn engine() -> XrustEngine {
    XrustEngine::new(ParserOptions::default())
}

#[test]
fn parse_and_walk() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();

    assert_eq!(engine.node_kind(&doc), NodeKind::Document);
    let root = engine.document_element(&doc).unwrap();
    assert_eq!(engine.node_kind(&root), NodeKind::Element);
    assert_eq!(engine.node_name(&root).as_deref(), Some("catalog"));
    assert_eq!(engine.children(&root).len(), 2);
}

#[test]
fn parse_rejects_malformed_markup() {
    let mut engine = engine();
    assert!(matches!(
        engine.parse_str("<a><b></a>"),
        Err(Error::Parse(_))
    ));
}

#[test]
fn snapshot_returns_elements_in_document_order() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();

    let nodes = engine.evaluate_snapshot(&doc, "/catalog/item").unwrap();
    assert_eq!(nodes.len(), 2);
    for node in &nodes {
        assert_eq!(engine.node_kind(node), NodeKind::Element);
        assert_eq!(engine.node_name(node).as_deref(), Some("item"));
    }
    assert_eq!(engine.node_text(&nodes[0]).as_deref(), Some("first"));
    assert_eq!(engine.node_text(&nodes[1]).as_deref(), Some("second"));
}

#[test]
fn snapshot_of_missing_nodes_is_empty() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();
    let nodes = engine.evaluate_snapshot(&doc, "/catalog/missing").unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn snapshot_can_hold_text_nodes() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();
    let nodes = engine
        .evaluate_snapshot(&doc, "/catalog/item/text()")
        .unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(engine.node_kind(&nodes[0]), NodeKind::Text);
}

#[test]
fn bad_expression_fails_compilation() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();
    assert!(matches!(
        engine.evaluate_snapshot(&doc, "/catalog["),
        Err(Error::Expression(_))
    ));
}

#[test]
fn atomic_results_are_rejected() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();
    assert!(matches!(
        engine.evaluate_snapshot(&doc, "count(/catalog/item)"),
        Err(Error::Evaluation(_))
    ));
}

#[test]
fn serialize_produces_markup() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();
    let out = engine.serialize(&doc, &SerializeConfig::default()).unwrap();
    assert!(out.contains("<catalog>"));
    assert!(out.contains("first"));
}

#[test]
fn detach_removes_root_from_document() {
    let mut engine = engine();
    let doc = engine.parse_str(CATALOG).unwrap();
    let root = engine.document_element(&doc).unwrap();

    engine.detach(&root).unwrap();
    assert!(engine.parent(&root).is_none());
    assert!(engine.document_element(&doc).is_none());

    // the detached subtree is intact and still queryable
    let nodes = engine.evaluate_snapshot(&root, "item").unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn fragment_stages_parsed_children() {
    let mut engine = engine();
    let doc = engine.new_document();
    let frag = engine.new_fragment(&doc).unwrap();
    engine
        .parse_into_fragment(&frag, "<wrapper><a/></wrapper>")
        .unwrap();
    let children = engine.children(&frag);
    assert_eq!(children.len(), 1);
    assert_eq!(engine.node_name(&children[0]).as_deref(), Some("wrapper"));
}
