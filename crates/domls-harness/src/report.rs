//! Result reporter.
//!
//! Serializes query matches to a caller-supplied sink. Failures while
//! serializing a node do not abort the batch on their own; they are
//! routed through an error callback which decides whether to continue
//! (true) or abort (false), the DOM error-handler protocol.

use std::io::Write;

use dom_engine_traits::{DomEngine, SerializeConfig};

use crate::error::SerializationError;

/// How bad a serialization problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        })
    }
}

/// Serialize `nodes` to `sink`, one line each. Returns the number of
/// nodes written. Only UTF-8 output is supported; anything else is an
/// engine-level failure up front.
pub fn report_nodes<E: DomEngine, W: Write>(
    engine: &E,
    nodes: &[E::Node],
    sink: &mut W,
    config: &SerializeConfig,
    on_error: &mut dyn FnMut(Severity, &str) -> bool,
) -> Result<usize, SerializationError> {
    if !config.encoding.eq_ignore_ascii_case("utf-8") {
        return Err(SerializationError::EngineFailure(format!(
            "unsupported output encoding: {}",
            config.encoding
        )));
    }
    let mut written = 0;
    for node in nodes {
        let text = match engine.serialize(node, config) {
            Ok(text) => text,
            Err(e) => {
                let message = e.to_string();
                if on_error(Severity::Error, &message) {
                    continue;
                }
                return Err(SerializationError::EngineFailure(message));
            }
        };
        if let Err(e) = writeln!(sink, "{text}") {
            let message = e.to_string();
            if on_error(Severity::Fatal, &message) {
                continue;
            }
            return Err(SerializationError::EngineFailure(message));
        }
        written += 1;
    }
    Ok(written)
}

/// Default error handler: log to stderr, keep going on anything short
/// of fatal.
pub fn stderr_error_handler(severity: Severity, message: &str) -> bool {
    eprintln!("serialization {severity}: {message}");
    !matches!(severity, Severity::Fatal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_engine_traits::{Error, NodeKind, ParserOptions, Result as EngineResult};
    use quickxml_adapter::QuickXmlEngine;

    #[test]
    fn writes_each_node_on_its_own_line() {
        let mut engine = QuickXmlEngine::new(ParserOptions::default());
        let doc = engine.parse_str("<root><a/><a>x</a></root>").unwrap();
        let root = engine.document_element(&doc).unwrap();
        let nodes = engine.children(&root);

        let mut sink = Vec::new();
        let mut handler = |_: Severity, _: &str| true;
        let written = report_nodes(
            &engine,
            &nodes,
            &mut sink,
            &SerializeConfig::default(),
            &mut handler,
        )
        .unwrap();

        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(sink).unwrap(), "<a/>\n<a>x</a>\n");
    }

    #[test]
    fn rejects_non_utf8_encoding() {
        let engine = QuickXmlEngine::new(ParserOptions::default());
        let config = SerializeConfig {
            encoding: "ISO-8859-1".to_string(),
            pretty: false,
        };
        let mut sink = Vec::new();
        let mut handler = |_: Severity, _: &str| true;
        let err = report_nodes(&engine, &[], &mut sink, &config, &mut handler).unwrap_err();
        assert!(matches!(err, SerializationError::EngineFailure(_)));
    }

    /// Engine whose serializer always fails, for exercising the
    /// error-handler protocol.
    struct BrokenSerializer;

    impl DomEngine for BrokenSerializer {
        type Node = ();

        fn engine_name(&self) -> &'static str {
            "broken"
        }
        fn parse_str(&mut self, _: &str) -> EngineResult<()> {
            Ok(())
        }
        fn new_document(&mut self) -> Self::Node {}
        fn new_fragment(&mut self, _: &Self::Node) -> EngineResult<()> {
            Ok(())
        }
        fn parse_into_fragment(&mut self, _: &Self::Node, _: &str) -> EngineResult<()> {
            Ok(())
        }
        fn import_node(&mut self, _: &Self::Node, _: &Self::Node) -> EngineResult<()> {
            Ok(())
        }
        fn append_child(&mut self, _: &Self::Node, _: &Self::Node) -> EngineResult<()> {
            Ok(())
        }
        fn detach(&mut self, _: &Self::Node) -> EngineResult<()> {
            Ok(())
        }
        fn document_element(&self, _: &Self::Node) -> Option<Self::Node> {
            None
        }
        fn parent(&self, _: &Self::Node) -> Option<Self::Node> {
            None
        }
        fn children(&self, _: &Self::Node) -> Vec<Self::Node> {
            Vec::new()
        }
        fn node_kind(&self, _: &Self::Node) -> NodeKind {
            NodeKind::Element
        }
        fn node_name(&self, _: &Self::Node) -> Option<String> {
            None
        }
        fn node_text(&self, _: &Self::Node) -> Option<String> {
            None
        }
        fn attributes(&self, _: &Self::Node) -> Vec<(String, String)> {
            Vec::new()
        }
        fn serialize(&self, _: &Self::Node, _: &SerializeConfig) -> EngineResult<String> {
            Err(Error::serialize("writer exploded"))
        }
    }

    #[test]
    fn handler_true_skips_the_node() {
        let engine = BrokenSerializer;
        let nodes = [(), ()];
        let mut sink = Vec::new();
        let mut calls = 0;
        let mut handler = |severity: Severity, _: &str| {
            assert_eq!(severity, Severity::Error);
            calls += 1;
            true
        };
        let written = report_nodes(
            &engine,
            &nodes,
            &mut sink,
            &SerializeConfig::default(),
            &mut handler,
        )
        .unwrap();
        assert_eq!(written, 0);
        assert_eq!(calls, 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn handler_false_aborts() {
        let engine = BrokenSerializer;
        let nodes = [(), ()];
        let mut sink = Vec::new();
        let mut calls = 0;
        let mut handler = |_: Severity, _: &str| {
            calls += 1;
            false
        };
        let err = report_nodes(
            &engine,
            &nodes,
            &mut sink,
            &SerializeConfig::default(),
            &mut handler,
        )
        .unwrap_err();
        assert!(matches!(err, SerializationError::EngineFailure(_)));
        assert_eq!(calls, 1);
    }
}
