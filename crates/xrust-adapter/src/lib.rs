//! DOM engine adapter backed by xrust.
//!
//! xrust brings its own tree (`smite::RNode`) and an XPath ~1.0
//! evaluator, so this adapter is a thin mapping from the engine traits
//! onto `RNode` operations. Fragments are modeled as detached document
//! nodes used purely as staging containers, which is how xrust itself
//! stages parse results.
//!
//! Not supported here: indented serialization (requests for it fall
//! back to plain output) and schema validation.

use xrust::item::{Item as XrustItem, Node, NodeType as XrustNodeType};
use xrust::parser::xml::parse as parse_xml;
use xrust::parser::xpath::parse as parse_xpath;
use xrust::transform::context::{ContextBuilder, StaticContextBuilder};
use xrust::trees::smite::RNode;
use xrust::xdmerror::{Error as XrustError, ErrorKind};

use dom_engine_traits::{
    DomEngine, Error, NodeKind, ParserOptions, Result, SerializeConfig, XPathSupport,
};

/// DOM engine over xrust's `RNode` tree.
pub struct XrustEngine {
    _options: ParserOptions,
}

impl XrustEngine {
    pub fn new(options: ParserOptions) -> Self {
        // xrust's parser is namespace aware and non-validating; both
        // flags are accepted for interface parity.
        Self { _options: options }
    }
}

impl Default for XrustEngine {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

fn map_kind(t: XrustNodeType) -> NodeKind {
    match t {
        XrustNodeType::Document => NodeKind::Document,
        XrustNodeType::Element => NodeKind::Element,
        XrustNodeType::Text => NodeKind::Text,
        XrustNodeType::Attribute => NodeKind::Attribute,
        XrustNodeType::Comment => NodeKind::Comment,
        XrustNodeType::ProcessingInstruction => NodeKind::ProcessingInstruction,
        XrustNodeType::Namespace => NodeKind::Namespace,
        _ => NodeKind::Text, // Unknown/Reference
    }
}

impl DomEngine for XrustEngine {
    type Node = RNode;

    fn engine_name(&self) -> &'static str {
        "xrust"
    }

    fn parse_str(&mut self, xml: &str) -> Result<Self::Node> {
        let doc = RNode::new_document();
        parse_xml(doc.clone(), xml, None).map_err(|e| Error::parse(e.to_string()))?;
        Ok(doc)
    }

    fn new_document(&mut self) -> Self::Node {
        RNode::new_document()
    }

    fn new_fragment(&mut self, doc: &Self::Node) -> Result<Self::Node> {
        if doc.node_type() != XrustNodeType::Document {
            return Err(Error::node_access(
                "fragments can only be created from a document",
            ));
        }
        // xrust has no fragment node type; a detached document node
        // plays that role.
        Ok(RNode::new_document())
    }

    fn parse_into_fragment(&mut self, fragment: &Self::Node, xml: &str) -> Result<()> {
        if fragment.node_type() != XrustNodeType::Document {
            return Err(Error::node_access("parse context is not a fragment"));
        }
        parse_xml(fragment.clone(), xml, None).map_err(|e| Error::parse(e.to_string()))?;
        Ok(())
    }

    fn import_node(&mut self, dest_doc: &Self::Node, node: &Self::Node) -> Result<Self::Node> {
        if dest_doc.node_type() != XrustNodeType::Document {
            return Err(Error::node_access("import destination is not a document"));
        }
        node.deep_copy()
            .map_err(|e| Error::node_access(e.to_string()))
    }

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()> {
        let mut parent = parent.clone();
        parent
            .push(child.clone())
            .map_err(|e| Error::node_access(e.to_string()))
    }

    fn detach(&mut self, node: &Self::Node) -> Result<()> {
        if node.ancestor_iter().next().is_none() {
            return Err(Error::node_access("node has no parent"));
        }
        let mut node = node.clone();
        node.pop().map_err(|e| Error::node_access(e.to_string()))
    }

    fn document_element(&self, doc: &Self::Node) -> Option<Self::Node> {
        doc.child_iter()
            .find(|c| c.node_type() == XrustNodeType::Element)
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node> {
        node.ancestor_iter().next()
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        node.child_iter().collect()
    }

    fn node_kind(&self, node: &Self::Node) -> NodeKind {
        map_kind(node.node_type())
    }

    fn node_name(&self, node: &Self::Node) -> Option<String> {
        let local = node.name().localname_to_string();
        if local.is_empty() {
            None
        } else {
            Some(local)
        }
    }

    fn node_text(&self, node: &Self::Node) -> Option<String> {
        Some(node.to_string())
    }

    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)> {
        if node.node_type() != XrustNodeType::Element {
            return Vec::new();
        }
        node.attribute_iter()
            .map(|a| (a.name().localname_to_string(), a.to_string()))
            .collect()
    }

    fn serialize(&self, node: &Self::Node, _config: &SerializeConfig) -> Result<String> {
        // xrust's serializer has no indent switch; pretty requests get
        // plain output.
        Ok(node.to_xml())
    }
}

impl XPathSupport for XrustEngine {
    fn evaluate_snapshot(&mut self, context: &Self::Node, expr: &str) -> Result<Vec<Self::Node>> {
        let transform =
            parse_xpath::<RNode>(expr, None).map_err(|e| Error::Expression(e.to_string()))?;

        let evaluation = ContextBuilder::new()
            .context(vec![XrustItem::Node(context.clone())])
            .build();

        let mut static_context = StaticContextBuilder::new()
            .message(|_| Ok(()))
            .fetcher(|_| Err(XrustError::new(ErrorKind::NotImplemented, "not implemented")))
            .parser(|_| Err(XrustError::new(ErrorKind::NotImplemented, "not implemented")))
            .build();

        let sequence = evaluation
            .dispatch(&mut static_context, &transform)
            .map_err(|e| Error::Evaluation(e.to_string()))?;

        let mut nodes = Vec::with_capacity(sequence.len());
        for item in &sequence {
            match item {
                XrustItem::Node(n) => nodes.push(n.clone()),
                _ => {
                    return Err(Error::Evaluation(
                        "expression did not produce a node sequence".to_string(),
                    ));
                }
            }
        }
        Ok(nodes)
    }

    fn xpath_version(&self) -> &'static str {
        "1.0"
    }
}
