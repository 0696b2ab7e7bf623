//! DOM tree abstraction trait

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Type of DOM node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Document node
    Document,
    /// Document fragment node
    DocumentFragment,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node
    Text,
    /// CDATA section node
    CData,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Namespace node
    Namespace,
}

impl NodeKind {
    /// Human-readable name of the node kind, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "document node",
            NodeKind::DocumentFragment => "document fragment node",
            NodeKind::Element => "element node",
            NodeKind::Attribute => "attribute node",
            NodeKind::Text => "text node",
            NodeKind::CData => "CDATA section node",
            NodeKind::Comment => "comment node",
            NodeKind::ProcessingInstruction => "processing instruction node",
            NodeKind::Namespace => "namespace node",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser configuration, set when an engine is constructed.
///
/// Mirrors the usual LS parser switches: namespace awareness and
/// validate-if-a-schema-is-present. Engines that cannot validate accept
/// the flag and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Track namespace declarations while parsing
    pub namespace_aware: bool,
    /// Validate when a schema is available to the engine
    pub validate_if_schema: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            namespace_aware: true,
            validate_if_schema: false,
        }
    }
}

/// Serializer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Output encoding; only UTF-8 is supported by the bundled engines
    pub encoding: String,
    /// Indent output. Engines that cannot indent fall back to plain output.
    pub pretty: bool,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            pretty: false,
        }
    }
}

/// Trait for DOM engine implementations.
///
/// This trait abstracts over different tree representations, so engines
/// with different internal storage can be used interchangeably. A `Node`
/// is a cheap handle; all access goes through the engine that produced
/// it. Handles must never be mixed between engine instances.
///
/// Ownership: every node belongs to the engine that created it and is
/// reclaimed when the engine is dropped. "Document ownership" in the DOM
/// sense is expressed by the tree a node is linked into.
pub trait DomEngine {
    /// Handle to a node in this engine's storage
    type Node: Clone;

    /// Short name of the engine, used in logs and reports
    fn engine_name(&self) -> &'static str;

    /// Parse a complete XML document; returns the document node.
    /// No document is produced on failure.
    fn parse_str(&mut self, xml: &str) -> Result<Self::Node>;

    /// Create a new, empty document.
    fn new_document(&mut self) -> Self::Node;

    /// Create an empty fragment owned by `doc`. A fragment is a staging
    /// container; it never appears in the document tree itself.
    fn new_fragment(&mut self, doc: &Self::Node) -> Result<Self::Node>;

    /// Parse `xml` directly into `fragment`, appending the source's
    /// top-level nodes as children ("append as children" semantics).
    fn parse_into_fragment(&mut self, fragment: &Self::Node, xml: &str) -> Result<()>;

    /// Deep-copy `node` (and its subtree) so the copy is owned by
    /// `dest_doc`. The copy is returned unattached; the source is left
    /// untouched and is never linked into the destination tree.
    fn import_node(&mut self, dest_doc: &Self::Node, node: &Self::Node) -> Result<Self::Node>;

    /// Append `child` to `parent`, moving it from any previous parent.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Remove `node` from its parent's child sequence, leaving it
    /// parentless but still holding its own subtree. Fails if the node
    /// has no parent.
    fn detach(&mut self, node: &Self::Node) -> Result<()>;

    /// The document element (root element) of a document, if any.
    fn document_element(&self, doc: &Self::Node) -> Option<Self::Node>;

    /// Parent of a node, if it has one.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Children of a node, in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Kind of a node.
    fn node_kind(&self, node: &Self::Node) -> NodeKind;

    /// Qualified name of a node (elements, processing instructions).
    fn node_name(&self, node: &Self::Node) -> Option<String>;

    /// Text value of a node. For elements this is the concatenated
    /// descendant text.
    fn node_text(&self, node: &Self::Node) -> Option<String>;

    /// Attributes of an element as (name, value) pairs.
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    /// Namespace bindings visible at `node` as (prefix, uri) pairs.
    /// Engines that do not track bindings report none.
    fn namespaces_in_scope(&self, node: &Self::Node) -> Vec<(String, String)> {
        let _ = node;
        Vec::new()
    }

    /// Serialize a node to its textual form.
    fn serialize(&self, node: &Self::Node, config: &SerializeConfig) -> Result<String>;
}

/// Compare two subtrees of the same engine for structural equality:
/// same kinds, names, attribute sets, character data and child order.
/// Node identity is ignored, so copies compare equal to their originals.
pub fn structurally_equal<E: DomEngine>(engine: &E, a: &E::Node, b: &E::Node) -> bool {
    let kind = engine.node_kind(a);
    if kind != engine.node_kind(b) {
        return false;
    }
    if engine.node_name(a) != engine.node_name(b) {
        return false;
    }
    match kind {
        NodeKind::Text
        | NodeKind::CData
        | NodeKind::Comment
        | NodeKind::ProcessingInstruction => {
            return engine.node_text(a) == engine.node_text(b);
        }
        NodeKind::Element => {
            let mut attrs_a = engine.attributes(a);
            let mut attrs_b = engine.attributes(b);
            attrs_a.sort();
            attrs_b.sort();
            if attrs_a != attrs_b {
                return false;
            }
        }
        _ => {}
    }
    let children_a = engine.children(a);
    let children_b = engine.children(b);
    if children_a.len() != children_b.len() {
        return false;
    }
    children_a
        .iter()
        .zip(children_b.iter())
        .all(|(ca, cb)| structurally_equal(engine, ca, cb))
}
