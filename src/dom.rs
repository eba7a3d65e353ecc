//! DOM capability – the neutral node tree the converter walks, the
//! injectable parser interface, and the html5ever-backed default parser.
//!
//! Conversion never touches a concrete DOM implementation directly: it only
//! sees [`DomNode`] trees obtained through [`DomParser`]. The default
//! [`Html5Parser`] runs html5ever with browser-grade recovery, so malformed
//! markup comes out repaired the way a browser would repair it.

use std::collections::HashMap;

use html5ever::tendril::TendrilSink;
use markup5ever::local_name;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

// ---------------------------------------------------------------------------
// Node tree
// ---------------------------------------------------------------------------

/// A single DOM node: an element or a raw text run.
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

/// An element with its tag name, attributes, and ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Lower-cased tag name (`p`, `ul`, `table`, …).
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    /// New element with no attributes or children.
    pub fn new(tag: &str) -> Self {
        ElementNode {
            tag: tag.to_ascii_lowercase(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute insertion, for hand-built trees.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text-child append.
    pub fn with_text(self, text: &str) -> Self {
        self.with_child(DomNode::Text(text.to_string()))
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whitespace-separated class list from the `class` attribute.
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Raw inline CSS from the `style` attribute.
    pub fn inline_style(&self) -> Option<&str> {
        self.attr("style")
    }
}

// ---------------------------------------------------------------------------
// Parser capability
// ---------------------------------------------------------------------------

/// A parsed document reduced to what conversion consumes: the children of
/// `<body>`, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlDocument {
    pub body: Vec<DomNode>,
}

/// DOM-parsing capability.
///
/// The pipeline depends on this interface only; hosts can inject their own
/// parser (tests hand-build trees through it). Parsing never fails: whatever
/// recovery the implementation applies defines the result for malformed
/// input.
pub trait DomParser {
    fn parse_document(&self, html: &str) -> HtmlDocument;
}

/// Default [`DomParser`] backed by html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Parser;

impl DomParser for Html5Parser {
    fn parse_document(&self, html: &str) -> HtmlDocument {
        let dom: RcDom =
            html5ever::parse_document(RcDom::default(), Default::default()).one(html);
        HtmlDocument {
            body: body_children(&dom.document),
        }
    }
}

/// Convenience wrapper around the default parser.
pub fn parse_html(html: &str) -> HtmlDocument {
    Html5Parser.parse_document(html)
}

// ---------------------------------------------------------------------------
// rcdom lowering
// ---------------------------------------------------------------------------

/// Children of the document's `<body>`, lowered into the neutral tree.
/// html5ever always synthesizes `html`/`body` for `text/html` input; the
/// document's own children are the fallback if a host parser does not.
fn body_children(document: &Handle) -> Vec<DomNode> {
    match find_body(document) {
        Some(body) => lower_children(&body),
        None => lower_children(document),
    }
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if name.local == local_name!("body") {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(body) = find_body(child) {
            return Some(body);
        }
    }
    None
}

fn lower_children(handle: &Handle) -> Vec<DomNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(lower_node)
        .collect()
}

/// One rcdom node → neutral node. Comments, doctypes, and processing
/// instructions disappear here.
fn lower_node(handle: &Handle) -> Option<DomNode> {
    match handle.data {
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let mut element = ElementNode::new(name.local.as_ref());
            for attr in attrs.borrow().iter() {
                element
                    .attributes
                    .insert(attr.name.local.as_ref().to_string(), attr.value.to_string());
            }
            element.children = lower_children(handle);
            Some(DomNode::Element(element))
        }
        NodeData::Text { ref contents } => Some(DomNode::Text(contents.borrow().to_string())),
        _ => None,
    }
}
