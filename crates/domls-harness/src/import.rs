//! Fragment importer.
//!
//! Merges freshly parsed XML into an existing document by way of a
//! staging fragment. Two strategies exist and must produce identical
//! fragments for the same source:
//!
//! - [`ImportStrategy::ContextParse`] parses the source straight into a
//!   fragment of the destination, "append as children" style.
//! - [`ImportStrategy::Manual`] parses the source into a temporary
//!   document, deep-imports its top-level children into the destination
//!   one by one and appends the copies to a fragment. The temporary
//!   document is discarded with its original nodes.

use dom_engine_traits::{DomEngine, Error as EngineError, NodeKind};

use crate::error::ImportError;

/// How source content gets into the destination document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStrategy {
    ContextParse,
    Manual,
}

/// Deep-import every child of `source_root` into `dest_doc`, in
/// document order, returning the destination-owned copies. A failing
/// import aborts the remaining siblings.
pub fn import_children<E: DomEngine>(
    engine: &mut E,
    source_root: &E::Node,
    dest_doc: &E::Node,
) -> Result<Vec<E::Node>, ImportError> {
    let mut imported = Vec::new();
    for child in engine.children(source_root) {
        match engine.import_node(dest_doc, &child) {
            Ok(copy) => imported.push(copy),
            Err(e) => {
                return Err(ImportError::PartialImportFailure {
                    imported: imported.len(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(imported)
}

/// Parse `source_xml` and stage its top-level nodes in a fragment of
/// `dest_doc`, using the given strategy.
pub fn import_fragment<E: DomEngine>(
    engine: &mut E,
    dest_doc: &E::Node,
    source_xml: &str,
    strategy: ImportStrategy,
) -> Result<E::Node, ImportError> {
    if engine.node_kind(dest_doc) != NodeKind::Document {
        return Err(ImportError::NullDestination);
    }
    let fragment = engine
        .new_fragment(dest_doc)
        .map_err(|e| engine_abort(0, e))?;
    match strategy {
        ImportStrategy::ContextParse => {
            engine
                .parse_into_fragment(&fragment, source_xml)
                .map_err(|e| match e {
                    EngineError::Parse(msg) => ImportError::MalformedSource(msg),
                    other => engine_abort(0, other),
                })?;
        }
        ImportStrategy::Manual => {
            let temp = engine.parse_str(source_xml).map_err(|e| match e {
                EngineError::Parse(msg) => ImportError::MalformedSource(msg),
                other => engine_abort(0, other),
            })?;
            let copies = import_children(engine, &temp, dest_doc)?;
            for (done, copy) in copies.iter().enumerate() {
                engine
                    .append_child(&fragment, copy)
                    .map_err(|e| engine_abort(done, e))?;
            }
        }
    }
    Ok(fragment)
}

fn engine_abort(imported: usize, e: EngineError) -> ImportError {
    ImportError::PartialImportFailure {
        imported,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_engine_traits::{structurally_equal, ParserOptions};
    use quickxml_adapter::QuickXmlEngine;

    const SOURCE: &str = r#"<list n="3"><x>one</x><!--two--><x a="b">three</x></list>"#;

    #[test]
    fn strategies_agree() {
        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let dest = engine.new_document();

        let by_context =
            import_fragment(&mut engine, &dest, SOURCE, ImportStrategy::ContextParse).unwrap();
        let by_manual =
            import_fragment(&mut engine, &dest, SOURCE, ImportStrategy::Manual).unwrap();

        assert!(structurally_equal(&engine, &by_context, &by_manual));
        assert_eq!(engine.children(&by_context).len(), 1);
    }

    #[test]
    fn non_document_destination_is_rejected() {
        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let doc = engine.parse_str("<root/>").unwrap();
        let root = engine.document_element(&doc).unwrap();

        let err =
            import_fragment(&mut engine, &root, SOURCE, ImportStrategy::Manual).unwrap_err();
        assert!(matches!(err, ImportError::NullDestination));
    }

    #[test]
    fn malformed_source_is_reported() {
        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let dest = engine.new_document();
        for strategy in [ImportStrategy::ContextParse, ImportStrategy::Manual] {
            let err = import_fragment(&mut engine, &dest, "<a><b>", strategy).unwrap_err();
            assert!(matches!(err, ImportError::MalformedSource(_)));
        }
    }

    #[test]
    fn imported_children_are_copies() {
        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let source = engine.parse_str(SOURCE).unwrap();
        let dest = engine.new_document();

        let copies = import_children(&mut engine, &source, &dest).unwrap();
        assert_eq!(copies.len(), 1);

        let source_root = engine.document_element(&source).unwrap();
        assert!(structurally_equal(&engine, &source_root, &copies[0]));
        // the source tree is untouched
        assert_eq!(engine.parent(&source_root), Some(source));
        assert!(engine.parent(&copies[0]).is_none());
    }
}
