//! A small mutable XML element tree built on quick-xml.
//!
//! Slides are edited structurally (shapes deep-copied, placeholders removed,
//! runs rewritten), which streaming events cannot express. The tree keeps
//! text and attribute values in their escaped source form so that untouched
//! content is written back byte-for-byte; accessors unescape on read and
//! setters escape on write.
//!
//! Elements are addressed by local name (the part after the namespace
//! prefix). New elements are created with the conventional `p:`/`a:`/`r:`
//! prefixes used by every PresentationML producer.

use crate::common::xml::escape::{escape_xml, unescape_xml};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as FmtWrite;
use thiserror::Error;

/// The standard declaration written at the top of every OOXML part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Errors raised while building an element tree.
#[derive(Error, Debug)]
pub enum XmlTreeError {
    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("Unbalanced XML: {0}")]
    Unbalanced(String),

    #[error("Document has no root element")]
    NoRoot,
}

pub type Result<T> = std::result::Result<T, XmlTreeError>;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with attributes and children
    Element(XmlElement),
    /// Character data, kept escaped
    Text(String),
    /// Comments and CDATA sections, kept verbatim
    Raw(String),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified name, e.g. `p:sp`
    name: String,
    /// Attributes as (qualified name, escaped value), in source order
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

/// Return the local part of a qualified name.
#[inline]
pub fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

impl XmlElement {
    /// Create an empty element.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute (the value is escaped).
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Parse a standalone element, e.g. a shape template.
    ///
    /// Namespace prefixes are not resolved, so fragments do not need to
    /// declare them.
    pub fn parse_fragment(xml: &str) -> Result<Self> {
        XmlDocument::parse(xml.as_bytes()).map(XmlDocument::into_root)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Check the local name of this element.
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Get an attribute by qualified name, unescaped.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| unescape_xml(v))
    }

    /// Iterate attributes as (qualified name, unescaped value).
    pub fn attributes(&self) -> impl Iterator<Item = (&str, String)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), unescape_xml(v)))
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let escaped = escape_xml(value);
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = escaped,
            None => self.attributes.push((name.to_string(), escaped)),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| k != name);
        before != self.attributes.len()
    }

    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Iterate child elements.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate child elements mutably.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.is(local))
    }

    /// First child element with the given local name, mutably.
    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|el| el.is(local))
    }

    /// Child elements with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |el| el.is(local))
    }

    /// Child elements with the given local name, mutably.
    pub fn children_named_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |el| el.is(local))
    }

    /// Follow a path of local names through first matching children.
    pub fn descend(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, local| el.child(local))
    }

    /// Mutable variant of [`descend`](Self::descend).
    pub fn descend_mut(&mut self, path: &[&str]) -> Option<&mut XmlElement> {
        let mut current = self;
        for local in path {
            current = current.child_mut(local)?;
        }
        Some(current)
    }

    /// First descendant (depth-first, excluding `self`) with the given local name.
    pub fn find(&self, local: &str) -> Option<&XmlElement> {
        for el in self.elements() {
            if el.is(local) {
                return Some(el);
            }
            if let Some(found) = el.find(local) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given local name, in document order.
    pub fn find_all<'a>(&'a self, local: &str, out: &mut Vec<&'a XmlElement>) {
        for el in self.elements() {
            if el.is(local) {
                out.push(el);
            }
            el.find_all(local, out);
        }
    }

    /// Visit `self` and every descendant element mutably, depth-first.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut XmlElement)) {
        visit(self);
        for el in self.elements_mut() {
            el.walk_mut(visit);
        }
    }

    /// Visit `self` and every descendant element, depth-first.
    pub fn walk(&self, visit: &mut dyn FnMut(&XmlElement)) {
        visit(self);
        for el in self.elements() {
            el.walk(visit);
        }
    }

    /// Append a child element.
    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Insert `child` before the first child element whose local name is in
    /// `successors`, or append it when none is present.
    ///
    /// Returns the index of the inserted node among all children.
    pub fn insert_before(&mut self, child: XmlElement, successors: &[&str]) -> usize {
        let pos = self
            .children
            .iter()
            .position(|node| {
                matches!(node, XmlNode::Element(el) if successors.contains(&el.local_name()))
            })
            .unwrap_or(self.children.len());
        self.children.insert(pos, XmlNode::Element(child));
        pos
    }

    /// Like [`insert_before`](Self::insert_before), returning the inserted element.
    pub fn insert_before_mut(&mut self, child: XmlElement, successors: &[&str]) -> &mut XmlElement {
        let pos = self.insert_before(child, successors);
        self.element_at_mut(pos)
    }

    /// Get the first child with the given local name, inserting a new empty
    /// element named `qname` (before `successors`) when it is missing.
    pub fn get_or_insert(&mut self, qname: &str, successors: &[&str]) -> &mut XmlElement {
        let local = local_name(qname).to_string();
        let pos = match self
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(el) if el.is(&local)))
        {
            Some(pos) => pos,
            None => self.insert_before(XmlElement::new(qname), successors),
        };
        self.element_at_mut(pos)
    }

    /// Namespace declarations on this element as (prefix, URI).
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, String)> {
        self.attributes()
            .filter_map(|(k, v)| k.strip_prefix("xmlns:").map(|prefix| (prefix, v)))
    }

    /// Prefixes this element and its descendants use without declaring them.
    ///
    /// Markup-compatibility attributes (`mc:Ignorable`, `mc:ProcessContent`,
    /// `mc:MustUnderstand`, `Requires` of `mc:Choice`) name prefixes in their
    /// values; those count as uses too.
    pub fn unbound_prefixes(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_unbound(&mut Vec::new(), &mut out);
        out
    }

    fn collect_unbound(&self, bound: &mut Vec<String>, out: &mut BTreeSet<String>) {
        let mark = bound.len();
        bound.extend(self.namespace_declarations().map(|(prefix, _)| prefix.to_string()));

        let mut used: Vec<&str> = Vec::new();
        if let Some((prefix, _)) = self.name.split_once(':') {
            used.push(prefix);
        }
        for (key, value) in &self.attributes {
            if let Some((prefix, local)) = key.split_once(':') {
                if prefix == "xmlns" {
                    continue;
                }
                used.push(prefix);
                if matches!(local, "Ignorable" | "ProcessContent" | "MustUnderstand") {
                    used.extend(value.split_whitespace().filter_map(|t| t.split(':').next()));
                }
            } else if key == "Requires" && self.is("Choice") {
                used.extend(value.split_whitespace());
            }
        }
        for prefix in used {
            if prefix != "xml" && !bound.iter().any(|b| b == prefix) {
                out.insert(prefix.to_string());
            }
        }

        for child in self.elements() {
            child.collect_unbound(bound, out);
        }
        bound.truncate(mark);
    }

    fn element_at_mut(&mut self, pos: usize) -> &mut XmlElement {
        match &mut self.children[pos] {
            XmlNode::Element(el) => el,
            // Callers only pass positions of element nodes.
            _ => unreachable!("child at {pos} is an element"),
        }
    }

    /// Remove child elements matching `pred`. Returns how many were removed.
    pub fn remove_elements(&mut self, mut pred: impl FnMut(&XmlElement) -> bool) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(el) if pred(el)));
        before - self.children.len()
    }

    /// Concatenated, unescaped text of the direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(raw) = node {
                out.push_str(&unescape_xml(raw));
            }
        }
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(escape_xml(text)));
        }
    }

    /// Append raw (already escaped) text, merging with a preceding text node.
    fn push_raw_text(&mut self, raw: &str) {
        if let Some(XmlNode::Text(prev)) = self.children.last_mut() {
            prev.push_str(raw);
        } else {
            self.children.push(XmlNode::Text(raw.to_string()));
        }
    }

    /// Serialize this element.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_xml(&mut out);
        out
    }

    /// Serialize this element into `out`.
    pub fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            // Writing into a String cannot fail.
            let _ = write!(out, r#" {}="{}""#, key, value);
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                XmlNode::Element(el) => el.write_xml(out),
                XmlNode::Text(raw) | XmlNode::Raw(raw) => out.push_str(raw),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut element = Self::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlTreeError::Parse(e.to_string()))?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let value = utf8(&attr.value)?.to_string();
            element.attributes.push((key, value));
        }
        Ok(element)
    }
}

/// A parsed XML part: an optional declaration and a root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    has_declaration: bool,
    root: XmlElement,
}

impl XmlDocument {
    /// Wrap a root element; the document is written with the standard declaration.
    pub fn new(root: XmlElement) -> Self {
        Self {
            has_declaration: true,
            root,
        }
    }

    /// Parse a document from UTF-8 bytes.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut has_declaration = false;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Decl(_)) => has_declaration = true,
                Ok(Event::Start(e)) => stack.push(XmlElement::from_start(&e)?),
                Ok(Event::Empty(e)) => {
                    let element = XmlElement::from_start(&e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                },
                Ok(Event::End(e)) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlTreeError::Unbalanced(String::from_utf8_lossy(e.name().as_ref()).into())
                    })?;
                    Self::attach(&mut stack, &mut root, element)?;
                },
                Ok(Event::Text(e)) => {
                    // Whitespace around the root element is not kept.
                    if let Some(parent) = stack.last_mut() {
                        parent.push_raw_text(utf8(&e)?);
                    }
                },
                Ok(Event::GeneralRef(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_raw_text(&format!("&{};", utf8(&e)?));
                    }
                },
                Ok(Event::CData(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = format!("<![CDATA[{}]]>", utf8(&e)?);
                        parent.children.push(XmlNode::Raw(raw));
                    }
                },
                Ok(Event::Comment(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = format!("<!--{}-->", utf8(&e)?);
                        parent.children.push(XmlNode::Raw(raw));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XmlTreeError::Parse(e.to_string())),
                _ => {},
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlTreeError::Unbalanced(format!("unclosed <{}>", open.name)));
        }
        let root = root.ok_or(XmlTreeError::NoRoot)?;
        Ok(Self {
            has_declaration,
            root,
        })
    }

    fn attach(
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(XmlNode::Element(element));
        } else if root.is_none() {
            *root = Some(element);
        } else {
            return Err(XmlTreeError::Unbalanced(format!(
                "second root element <{}>",
                element.name
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    #[inline]
    pub fn into_root(self) -> XmlElement {
        self.root
    }

    /// Namespace bindings in scope at the element reached by `path` from the
    /// root, by prefix. Declarations closer to that element win.
    pub fn namespace_scope(&self, path: &[&str]) -> BTreeMap<String, String> {
        let mut scope: BTreeMap<String, String> = BTreeMap::new();
        let mut current = Some(&self.root);
        let mut rest = path.iter();
        while let Some(el) = current {
            for (prefix, uri) in el.namespace_declarations() {
                scope.insert(prefix.to_string(), uri);
            }
            current = rest.next().and_then(|local| el.child(local));
        }
        scope
    }

    /// Find the namespace prefix bound to `uri` on the root element.
    pub fn prefix_for(&self, uri: &str) -> Option<String> {
        self.root
            .attributes
            .iter()
            .find(|(k, v)| k.starts_with("xmlns:") && v == uri)
            .map(|(k, _)| k["xmlns:".len()..].to_string())
    }

    /// Serialize the document to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(4096);
        if self.has_declaration {
            out.push_str(XML_DECLARATION);
            out.push('\n');
        }
        self.root.write_xml(&mut out);
        out.into_bytes()
    }
}

#[inline]
fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| XmlTreeError::Parse(e.to_string()))
}
