//! Query evaluator.
//!
//! Snapshot evaluation with the strict result policy of the original
//! harness: an empty snapshot and a snapshot containing anything but
//! element nodes are both hard errors, not values. That policy is kept
//! as a literal contract; callers wanting lenient behavior can go to
//! the engine's snapshot directly.

use dom_engine_traits::{DomEngine, Error as EngineError, NodeKind, XPathSupport};

use crate::config::ContextStrategy;
use crate::error::QueryError;

/// Detach the document element from `doc` and verify the detachment
/// took: an element still reporting a parent afterwards is an engine
/// defect, not a condition to continue under.
pub fn detach_root<E: DomEngine>(engine: &mut E, doc: &E::Node) -> Result<E::Node, QueryError> {
    let root = engine
        .document_element(doc)
        .ok_or_else(|| QueryError::EngineFailure("document has no document element".to_string()))?;
    engine
        .detach(&root)
        .map_err(|e| QueryError::EngineFailure(e.to_string()))?;
    if engine.parent(&root).is_some() {
        return Err(QueryError::EngineFailure(
            "detached element still reports a parent".to_string(),
        ));
    }
    Ok(root)
}

/// Produce the evaluation context node for `doc` per the selected
/// strategy.
pub fn prepare_context<E: DomEngine>(
    engine: &mut E,
    doc: &E::Node,
    strategy: ContextStrategy,
) -> Result<E::Node, QueryError> {
    match strategy {
        ContextStrategy::DocumentElement => engine.document_element(doc).ok_or_else(|| {
            QueryError::EngineFailure("document has no document element".to_string())
        }),
        ContextStrategy::DetachedRoot => detach_root(engine, doc),
        ContextStrategy::DetachedFragment => {
            let root = detach_root(engine, doc)?;
            let fragment = engine
                .new_fragment(doc)
                .map_err(|e| QueryError::EngineFailure(e.to_string()))?;
            engine
                .append_child(&fragment, &root)
                .map_err(|e| QueryError::EngineFailure(e.to_string()))?;
            Ok(fragment)
        }
    }
}

/// Evaluate `expr` against `context` and return the matching elements
/// in document order.
///
/// The snapshot length equals the returned count; there is no partial
/// return on failure.
pub fn evaluate_elements<E: XPathSupport>(
    engine: &mut E,
    context: &E::Node,
    expr: &str,
) -> Result<Vec<E::Node>, QueryError> {
    let snapshot = engine.evaluate_snapshot(context, expr).map_err(|e| match e {
        EngineError::Expression(msg) => QueryError::InvalidExpression(msg),
        other => QueryError::EngineFailure(other.to_string()),
    })?;
    if snapshot.is_empty() {
        return Err(QueryError::NoMatch);
    }
    for node in &snapshot {
        let kind = engine.node_kind(node);
        if kind != NodeKind::Element {
            return Err(QueryError::NonElementResult(kind));
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_engine_traits::ParserOptions;
    use xrust_adapter::XrustEngine;

    const DOC: &str = r#"<root><a>1</a><a>2</a><t>x</t></root>"#;

    fn parsed(engine: &mut XrustEngine) -> <XrustEngine as DomEngine>::Node {
        engine.parse_str(DOC).unwrap()
    }

    #[test]
    fn matching_elements_come_back_ordered() {
        let mut engine = XrustEngine::new(ParserOptions::default());
        let doc = parsed(&mut engine);
        let context = prepare_context(&mut engine, &doc, ContextStrategy::DocumentElement).unwrap();

        let nodes = evaluate_elements(&mut engine, &context, "a").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(engine.node_text(&nodes[0]).as_deref(), Some("1"));
        assert_eq!(engine.node_text(&nodes[1]).as_deref(), Some("2"));
    }

    #[test]
    fn empty_snapshot_is_no_match() {
        let mut engine = XrustEngine::new(ParserOptions::default());
        let doc = parsed(&mut engine);
        let err = evaluate_elements(&mut engine, &doc, "/root/missing").unwrap_err();
        assert!(matches!(err, QueryError::NoMatch));
    }

    #[test]
    fn non_element_match_is_rejected() {
        let mut engine = XrustEngine::new(ParserOptions::default());
        let doc = parsed(&mut engine);
        let err = evaluate_elements(&mut engine, &doc, "/root/t/text()").unwrap_err();
        assert!(matches!(
            err,
            QueryError::NonElementResult(NodeKind::Text)
        ));
    }

    #[test]
    fn bad_expression_is_invalid() {
        let mut engine = XrustEngine::new(ParserOptions::default());
        let doc = parsed(&mut engine);
        let err = evaluate_elements(&mut engine, &doc, "/root[").unwrap_err();
        assert!(matches!(err, QueryError::InvalidExpression(_)));
    }

    #[test]
    fn detached_root_still_answers_queries() {
        let mut engine = XrustEngine::new(ParserOptions::default());
        let doc = parsed(&mut engine);
        let root = prepare_context(&mut engine, &doc, ContextStrategy::DetachedRoot).unwrap();

        assert!(engine.parent(&root).is_none());
        let nodes = evaluate_elements(&mut engine, &root, "a").unwrap();
        assert_eq!(nodes.len(), 2);
    }
}
