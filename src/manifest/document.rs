//! In-memory XML document with stable node identity
//!
//! This module provides:
//! - An arena of nodes addressed by `NodeId`, built from quick-xml events
//! - Namespace resolution of element names (`xmlns` / `xmlns:prefix`)
//! - Attribute and text access with escaping handled at the boundary
//! - Serialization that keeps declarations, comments, whitespace and CDATA
//!
//! Text and attribute values are stored in their escaped source form so
//! untouched content is written back exactly as it was read.

use crate::error::ManifestError;
use quick_xml::escape::{escape, partial_escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;

const BOM: char = '\u{feff}';
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Index of a node inside an [`XmlDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Namespace-qualified element name used for lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedName<'a> {
    /// Namespace URI, `None` for names in no namespace
    pub namespace: Option<&'a str>,
    /// Name without prefix
    pub local_name: &'a str,
}

impl<'a> ExpandedName<'a> {
    /// A name in no namespace
    pub fn local(local_name: &'a str) -> Self {
        Self {
            namespace: None,
            local_name,
        }
    }

    /// A name in the given namespace
    pub fn qualified(namespace: &'a str, local_name: &'a str) -> Self {
        Self {
            namespace: Some(namespace),
            local_name,
        }
    }
}

impl fmt::Display for ExpandedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// An attribute as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name including any prefix
    pub name: String,
    /// Escaped value, without quotes
    pub raw_value: String,
}

/// Element data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Name as written, including any prefix
    pub name: String,
    /// Resolved namespace URI
    pub namespace: Option<String>,
    /// Name without prefix
    pub local_name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Whether the source used `<name/>` form
    pub self_closing: bool,
}

impl Element {
    /// Returns true if this element has the given expanded name
    pub fn is(&self, name: ExpandedName<'_>) -> bool {
        self.local_name == name.local_name && self.namespace.as_deref() == name.namespace
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(Element),
    /// Escaped character data
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// Contents of `<?xml ...?>`
    Declaration(String),
    DocType(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    root: NodeId,
    bom: bool,
}

/// In-scope namespace declarations, innermost last
#[derive(Default)]
struct NamespaceScopes {
    frames: Vec<Vec<(String, String)>>,
}

impl NamespaceScopes {
    fn push(&mut self, attributes: &[Attribute]) {
        let frame = attributes
            .iter()
            .filter_map(|attr| {
                let prefix = if attr.name == "xmlns" {
                    ""
                } else {
                    attr.name.strip_prefix("xmlns:")?
                };
                let uri = unescape(&attr.raw_value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| attr.raw_value.clone());
                Some((prefix.to_string(), uri))
            })
            .collect();
        self.frames.push(frame);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn resolve(&self, prefix: &str) -> Option<String> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE.to_string());
        }
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(p, _)| p == prefix)
            .and_then(|(_, uri)| (!uri.is_empty()).then(|| uri.clone()))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, ManifestError> {
    std::str::from_utf8(bytes)
        .map_err(|e| ManifestError::xml_structure(format!("invalid UTF-8: {}", e)))
}

impl XmlDocument {
    /// Parses a complete document
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let (body, bom) = match text.strip_prefix(BOM) {
            Some(rest) => (rest, true),
            None => (text, false),
        };

        let mut builder = Builder::default();
        let mut reader = Reader::from_str(body);

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let id = builder.open_element(&e, false)?;
                    builder.stack.push(id);
                }
                Event::Empty(e) => {
                    builder.open_element(&e, true)?;
                    builder.scopes.pop();
                }
                Event::End(e) => {
                    if builder.stack.pop().is_none() {
                        return Err(ManifestError::xml_structure(format!(
                            "unexpected closing tag </{}>",
                            utf8(e.name().as_ref())?
                        )));
                    }
                    builder.scopes.pop();
                }
                Event::Text(t) => builder.push_text(utf8(&t)?),
                Event::GeneralRef(r) => builder.push_text(&format!("&{};", utf8(&r)?)),
                Event::CData(c) => builder.push_leaf(NodeKind::CData(utf8(&c)?.to_string())),
                Event::Comment(c) => builder.push_leaf(NodeKind::Comment(utf8(&c)?.to_string())),
                Event::PI(p) => builder.push_leaf(NodeKind::ProcessingInstruction(
                    utf8(&p)?.to_string(),
                )),
                Event::Decl(d) => builder.push_leaf(NodeKind::Declaration(utf8(&d)?.to_string())),
                Event::DocType(d) => builder.push_leaf(NodeKind::DocType(utf8(&d)?.to_string())),
                Event::Eof => break,
            }
        }

        builder.finish(bom)
    }

    /// The document element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The document element, if it has the given name
    pub fn root_named(&self, name: ExpandedName<'_>) -> Option<NodeId> {
        self.element(self.root)
            .filter(|el| el.is(name))
            .map(|_| self.root)
    }

    /// Element payload, `None` for non-element nodes
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Child elements of `parent` with the given name, in document order
    pub fn elements<'a>(
        &'a self,
        parent: NodeId,
        name: ExpandedName<'a>,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(move |&child| self.element(child).is_some_and(|el| el.is(name)))
    }

    /// First child element of `parent` with the given name
    pub fn first_element(&self, parent: NodeId, name: ExpandedName<'_>) -> Option<NodeId> {
        self.elements(parent, name).next()
    }

    /// Unescaped value of an unqualified attribute
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let attr = self
            .element(id)?
            .attributes
            .iter()
            .find(|attr| attr.name == name)?;
        Some(
            unescape(&attr.raw_value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| attr.raw_value.clone()),
        )
    }

    /// Sets an attribute value, appending the attribute if it is missing
    ///
    /// Returns false when `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        let raw_value = escape(value).into_owned();
        match el.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.raw_value = raw_value,
            None => el.attributes.push(Attribute {
                name: name.to_string(),
                raw_value,
            }),
        }
        true
    }

    /// Concatenated, unescaped text of all descendants
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(raw) => match unescape(raw) {
                Ok(text) => out.push_str(&text),
                Err(_) => out.push_str(raw),
            },
            NodeKind::CData(data) => out.push_str(data),
            NodeKind::Element(_) => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// Replaces all children of an element with a single text node
    ///
    /// Returns false when `id` is not an element.
    pub fn set_text(&mut self, id: NodeId, value: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        let detached = std::mem::take(&mut self.nodes[id.0].children);
        for child in detached {
            self.nodes[child.0].parent = None;
        }
        let text = self.alloc(NodeKind::Text(partial_escape(value).into_owned()), Some(id));
        self.nodes[id.0].children.push(text);
        true
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Serializes the whole document
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        for &id in &self.top_level {
            self.write_node(id, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for attr in &el.attributes {
                    let quote = if attr.raw_value.contains('"') { '\'' } else { '"' };
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push('=');
                    out.push(quote);
                    out.push_str(&attr.raw_value);
                    out.push(quote);
                }
                if node.children.is_empty() && el.self_closing {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for &child in &node.children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
            NodeKind::Text(raw) => out.push_str(raw),
            NodeKind::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::ProcessingInstruction(content) | NodeKind::Declaration(content) => {
                out.push_str("<?");
                out.push_str(content);
                out.push_str("?>");
            }
            NodeKind::DocType(content) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(content);
                out.push('>');
            }
        }
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string())
    }
}

/// Accumulates nodes while events are read
#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    stack: Vec<NodeId>,
    scopes: NamespaceScopes,
}

impl Builder {
    fn attach(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    /// Adds an element and pushes its namespace scope
    fn open_element(
        &mut self,
        start: &BytesStart<'_>,
        self_closing: bool,
    ) -> Result<NodeId, ManifestError> {
        let name = utf8(start.name().as_ref())?.to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            attributes.push(Attribute {
                name: utf8(attr.key.as_ref())?.to_string(),
                raw_value: utf8(&attr.value)?.to_string(),
            });
        }

        self.scopes.push(&attributes);
        let (prefix, local_name) = match name.split_once(':') {
            Some((prefix, local)) => (prefix, local.to_string()),
            None => ("", name.clone()),
        };
        let namespace = self.scopes.resolve(prefix);

        Ok(self.attach(NodeKind::Element(Element {
            name,
            namespace,
            local_name,
            attributes,
            self_closing,
        })))
    }

    /// Appends escaped text, merging with a preceding text node
    fn push_text(&mut self, raw: &str) {
        let siblings = match self.stack.last() {
            Some(p) => &self.nodes[p.0].children,
            None => &self.top_level,
        };
        if let Some(&last) = siblings.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(raw);
                return;
            }
        }
        self.attach(NodeKind::Text(raw.to_string()));
    }

    fn push_leaf(&mut self, kind: NodeKind) {
        self.attach(kind);
    }

    fn finish(self, bom: bool) -> Result<XmlDocument, ManifestError> {
        if let Some(&open) = self.stack.last() {
            let name = match &self.nodes[open.0].kind {
                NodeKind::Element(el) => el.name.clone(),
                _ => String::new(),
            };
            return Err(ManifestError::xml_structure(format!(
                "unclosed element <{}>",
                name
            )));
        }

        let mut roots = self
            .top_level
            .iter()
            .copied()
            .filter(|id| matches!(self.nodes[id.0].kind, NodeKind::Element(_)));
        let root = roots
            .next()
            .ok_or_else(|| ManifestError::xml_structure("no root element"))?;
        if roots.next().is_some() {
            return Err(ManifestError::xml_structure("multiple root elements"));
        }

        Ok(XmlDocument {
            nodes: self.nodes,
            top_level: self.top_level,
            root,
            bom,
        })
    }
}
