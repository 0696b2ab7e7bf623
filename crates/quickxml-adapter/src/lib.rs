//! DOM engine adapter backed by quick-xml.
//!
//! quick-xml is an event parser, not a tree library, so this adapter
//! builds its own tree: an arena of nodes indexed by [`NodeRef`]
//! handles. The arena lives inside the engine and is reclaimed when the
//! engine is dropped.
//!
//! This engine has no XPath feature set; [`XPathSupport`] is implemented
//! but refuses every evaluation.

use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use dom_engine_traits::{
    DomEngine, Error, NodeKind, ParserOptions, Result, SerializeConfig, XPathSupport,
};

/// Handle to a node in a [`QuickXmlEngine`] arena.
///
/// Handles are plain indices: cheap to copy and only meaningful to the
/// engine that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(usize);

#[derive(Debug, Clone)]
enum Payload {
    Document,
    Fragment,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        ns_decls: Vec<(String, String)>,
    },
    Text(String),
    CData(String),
    Comment(String),
    Pi {
        target: String,
        data: String,
    },
}

impl Payload {
    fn kind(&self) -> NodeKind {
        match self {
            Payload::Document => NodeKind::Document,
            Payload::Fragment => NodeKind::DocumentFragment,
            Payload::Element { .. } => NodeKind::Element,
            Payload::Text(_) => NodeKind::Text,
            Payload::CData(_) => NodeKind::CData,
            Payload::Comment(_) => NodeKind::Comment,
            Payload::Pi { .. } => NodeKind::ProcessingInstruction,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    payload: Payload,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
}

/// DOM engine over an in-memory arena, parsed with quick-xml.
#[derive(Debug)]
pub struct QuickXmlEngine {
    nodes: Vec<NodeData>,
    namespace_aware: bool,
}

impl Default for QuickXmlEngine {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl QuickXmlEngine {
    pub fn new(options: ParserOptions) -> Self {
        // validate_if_schema is accepted and ignored: quick-xml is a
        // non-validating parser.
        Self {
            nodes: Vec::new(),
            namespace_aware: options.namespace_aware,
        }
    }

    fn alloc(&mut self, payload: Payload) -> NodeRef {
        let id = NodeRef(self.nodes.len());
        self.nodes.push(NodeData {
            payload,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn data(&self, node: NodeRef) -> &NodeData {
        &self.nodes[node.0]
    }

    fn attach(&mut self, parent: NodeRef, child: NodeRef) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn has_element_child(&self, node: NodeRef) -> bool {
        self.data(node)
            .children
            .iter()
            .any(|c| self.data(*c).payload.kind() == NodeKind::Element)
    }

    fn element_from_start(&mut self, e: &BytesStart<'_>) -> Result<NodeRef> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        let mut ns_decls = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| Error::parse(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| Error::parse(err.to_string()))?
                .into_owned();
            if self.namespace_aware {
                if key == "xmlns" {
                    ns_decls.push((String::new(), value.clone()));
                } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                    ns_decls.push((prefix.to_string(), value.clone()));
                }
            }
            attributes.push((key, value));
        }
        Ok(self.alloc(Payload::Element {
            name,
            attributes,
            ns_decls,
        }))
    }

    /// Parse `xml` and append its top-level nodes to `container`.
    ///
    /// When the container is a document, well-formedness rules for the
    /// top level apply: exactly one element, no character data. A
    /// fragment container accepts any number of top-level nodes.
    fn parse_into_container(&mut self, container: NodeRef, xml: &str) -> Result<()> {
        let is_document = self.data(container).payload.kind() == NodeKind::Document;
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<NodeRef> = Vec::new();
        loop {
            let event = reader
                .read_event()
                .map_err(|err| Error::parse(err.to_string()))?;
            match event {
                Event::Start(e) => {
                    let node = self.element_from_start(&e)?;
                    self.place(container, is_document, &stack, node)?;
                    stack.push(node);
                }
                Event::Empty(e) => {
                    let node = self.element_from_start(&e)?;
                    self.place(container, is_document, &stack, node)?;
                }
                Event::End(_) => {
                    // mismatched tags are caught by the reader itself
                    if stack.pop().is_none() {
                        return Err(Error::parse("unmatched end tag"));
                    }
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::parse(err.to_string()))?
                        .into_owned();
                    if stack.is_empty() {
                        // inter-node whitespace at the top level is not content
                        if text.trim().is_empty() {
                            continue;
                        }
                        if is_document {
                            return Err(Error::parse(
                                "character data outside the document element",
                            ));
                        }
                    }
                    let node = self.alloc(Payload::Text(text));
                    self.place(container, is_document, &stack, node)?;
                }
                Event::CData(e) => {
                    if stack.is_empty() && is_document {
                        return Err(Error::parse(
                            "CDATA section outside the document element",
                        ));
                    }
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    let node = self.alloc(Payload::CData(text));
                    self.place(container, is_document, &stack, node)?;
                }
                Event::Comment(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    let node = self.alloc(Payload::Comment(text));
                    self.place(container, is_document, &stack, node)?;
                }
                Event::PI(e) => {
                    let target = String::from_utf8_lossy(e.target()).into_owned();
                    let data = String::from_utf8_lossy(e.content())
                        .trim_start()
                        .to_string();
                    let node = self.alloc(Payload::Pi { target, data });
                    self.place(container, is_document, &stack, node)?;
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
                _ => {}
            }
        }
        if !stack.is_empty() {
            return Err(Error::parse(format!(
                "unexpected end of input with {} unclosed element(s)",
                stack.len()
            )));
        }
        if is_document && !self.has_element_child(container) {
            return Err(Error::parse("missing document element"));
        }
        Ok(())
    }

    fn place(
        &mut self,
        container: NodeRef,
        is_document: bool,
        stack: &[NodeRef],
        node: NodeRef,
    ) -> Result<()> {
        match stack.last() {
            Some(open) => {
                self.attach(*open, node);
            }
            None => {
                if is_document
                    && self.data(node).payload.kind() == NodeKind::Element
                    && self.has_element_child(container)
                {
                    return Err(Error::parse("multiple document elements"));
                }
                self.attach(container, node);
            }
        }
        Ok(())
    }

    fn copy_subtree(&mut self, node: NodeRef) -> NodeRef {
        let mut payload = self.data(node).payload.clone();
        // a copied fragment degrades to a fragment of the destination
        if let Payload::Document = payload {
            payload = Payload::Fragment;
        }
        let children = self.data(node).children.clone();
        let copy = self.alloc(payload);
        for child in children {
            let child_copy = self.copy_subtree(child);
            self.attach(copy, child_copy);
        }
        copy
    }

    fn collect_text(&self, node: NodeRef, out: &mut String) {
        match &self.data(node).payload {
            Payload::Text(t) | Payload::CData(t) => out.push_str(t),
            _ => {
                for child in &self.data(node).children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, node: NodeRef) -> Result<()> {
        let map = |err: std::io::Error| Error::serialize(err.to_string());
        match &self.data(node).payload {
            Payload::Document | Payload::Fragment => {
                for child in &self.data(node).children {
                    self.write_node(writer, *child)?;
                }
            }
            Payload::Element {
                name, attributes, ..
            } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                let children = &self.data(node).children;
                if children.is_empty() {
                    writer.write_event(Event::Empty(start)).map_err(map)?;
                } else {
                    writer.write_event(Event::Start(start)).map_err(map)?;
                    for child in children {
                        self.write_node(writer, *child)?;
                    }
                    writer
                        .write_event(Event::End(BytesEnd::new(name.as_str())))
                        .map_err(map)?;
                }
            }
            Payload::Text(t) => {
                writer
                    .write_event(Event::Text(BytesText::new(t)))
                    .map_err(map)?;
            }
            Payload::CData(t) => {
                writer
                    .write_event(Event::CData(BytesCData::new(t.as_str())))
                    .map_err(map)?;
            }
            Payload::Comment(t) => {
                writer
                    .write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
                    .map_err(map)?;
            }
            Payload::Pi { target, data } => {
                let content = if data.is_empty() {
                    target.clone()
                } else {
                    format!("{target} {data}")
                };
                writer
                    .write_event(Event::PI(BytesPI::new(content.as_str())))
                    .map_err(map)?;
            }
        }
        Ok(())
    }
}

impl DomEngine for QuickXmlEngine {
    type Node = NodeRef;

    fn engine_name(&self) -> &'static str {
        "quick-xml"
    }

    fn parse_str(&mut self, xml: &str) -> Result<Self::Node> {
        let doc = self.alloc(Payload::Document);
        self.parse_into_container(doc, xml)?;
        Ok(doc)
    }

    fn new_document(&mut self) -> Self::Node {
        self.alloc(Payload::Document)
    }

    fn new_fragment(&mut self, doc: &Self::Node) -> Result<Self::Node> {
        if self.data(*doc).payload.kind() != NodeKind::Document {
            return Err(Error::node_access(
                "fragments can only be created from a document",
            ));
        }
        Ok(self.alloc(Payload::Fragment))
    }

    fn parse_into_fragment(&mut self, fragment: &Self::Node, xml: &str) -> Result<()> {
        if self.data(*fragment).payload.kind() != NodeKind::DocumentFragment {
            return Err(Error::node_access("parse context is not a fragment"));
        }
        self.parse_into_container(*fragment, xml)
    }

    fn import_node(&mut self, dest_doc: &Self::Node, node: &Self::Node) -> Result<Self::Node> {
        if self.data(*dest_doc).payload.kind() != NodeKind::Document {
            return Err(Error::node_access("import destination is not a document"));
        }
        Ok(self.copy_subtree(*node))
    }

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()> {
        let parent_kind = self.data(*parent).payload.kind();
        match parent_kind {
            NodeKind::Document | NodeKind::DocumentFragment | NodeKind::Element => {}
            other => {
                return Err(Error::node_access(format!("cannot append to a {other}")));
            }
        }
        let child_kind = self.data(*child).payload.kind();
        if matches!(child_kind, NodeKind::Document | NodeKind::DocumentFragment) {
            return Err(Error::node_access(format!("cannot append a {child_kind}")));
        }
        if parent_kind == NodeKind::Document
            && child_kind == NodeKind::Element
            && self.has_element_child(*parent)
        {
            return Err(Error::node_access(
                "document already has a document element",
            ));
        }
        if let Some(old) = self.data(*child).parent {
            self.nodes[old.0].children.retain(|c| c != child);
        }
        self.attach(*parent, *child);
        Ok(())
    }

    fn detach(&mut self, node: &Self::Node) -> Result<()> {
        let Some(parent) = self.data(*node).parent else {
            return Err(Error::node_access("node has no parent"));
        };
        self.nodes[parent.0].children.retain(|c| c != node);
        self.nodes[node.0].parent = None;
        Ok(())
    }

    fn document_element(&self, doc: &Self::Node) -> Option<Self::Node> {
        self.data(*doc)
            .children
            .iter()
            .copied()
            .find(|c| self.data(*c).payload.kind() == NodeKind::Element)
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node> {
        self.data(*node).parent
    }

    fn children(&self, node: &Self::Node) -> Vec<Self::Node> {
        self.data(*node).children.clone()
    }

    fn node_kind(&self, node: &Self::Node) -> NodeKind {
        self.data(*node).payload.kind()
    }

    fn node_name(&self, node: &Self::Node) -> Option<String> {
        match &self.data(*node).payload {
            Payload::Element { name, .. } => Some(name.clone()),
            Payload::Pi { target, .. } => Some(target.clone()),
            _ => None,
        }
    }

    fn node_text(&self, node: &Self::Node) -> Option<String> {
        match &self.data(*node).payload {
            Payload::Text(t) | Payload::CData(t) | Payload::Comment(t) => Some(t.clone()),
            Payload::Pi { data, .. } => Some(data.clone()),
            Payload::Document | Payload::Fragment | Payload::Element { .. } => {
                let mut out = String::new();
                self.collect_text(*node, &mut out);
                Some(out)
            }
        }
    }

    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)> {
        match &self.data(*node).payload {
            Payload::Element { attributes, .. } => attributes.clone(),
            _ => Vec::new(),
        }
    }

    fn namespaces_in_scope(&self, node: &Self::Node) -> Vec<(String, String)> {
        let mut bindings: Vec<(String, String)> = Vec::new();
        let mut current = Some(*node);
        while let Some(n) = current {
            if let Payload::Element { ns_decls, .. } = &self.data(n).payload {
                for (prefix, uri) in ns_decls {
                    // inner declarations shadow outer ones
                    if !bindings.iter().any(|(p, _)| p == prefix) {
                        bindings.push((prefix.clone(), uri.clone()));
                    }
                }
            }
            current = self.data(n).parent;
        }
        bindings
    }

    fn serialize(&self, node: &Self::Node, config: &SerializeConfig) -> Result<String> {
        let mut writer = if config.pretty {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        self.write_node(&mut writer, *node)?;
        String::from_utf8(writer.into_inner()).map_err(|err| Error::serialize(err.to_string()))
    }
}

impl XPathSupport for QuickXmlEngine {
    fn evaluate_snapshot(&mut self, _context: &Self::Node, _expr: &str) -> Result<Vec<Self::Node>> {
        Err(Error::unsupported(
            "XPath evaluation is not available in the quick-xml engine",
        ))
    }

    fn xpath_version(&self) -> &'static str {
        "none"
    }
}
