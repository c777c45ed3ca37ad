//! Minimal owned XML tree on top of `quick-xml` events.
//!
//! Start tags keep their original bytes, so attributes and namespace
//! declarations are written back exactly as read. Text is stored unescaped
//! and escaped again on output.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct XmlError(String);

impl XmlError {
    fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
    /// Declarations, comments, processing instructions and CDATA, kept verbatim.
    Other(Event<'static>),
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    start: BytesStart<'static>,
    self_closing: bool,
    pub(crate) children: Vec<Node>,
}

impl Element {
    /// New element written as `<name></name>` unless it stays empty.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
            self_closing: false,
            children: Vec::new(),
        }
    }

    /// New element written as `<name/>`.
    pub(crate) fn empty(name: &str) -> Self {
        Self {
            self_closing: true,
            ..Self::new(name)
        }
    }

    pub(crate) fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.start.push_attribute((key, value));
        self
    }

    pub(crate) fn is(&self, name: &str) -> bool {
        self.start.name().as_ref() == name.as_bytes()
    }

    /// Raw (still escaped) attribute value.
    pub(crate) fn attribute(&self, name: &str) -> Option<Vec<u8>> {
        self.start
            .try_get_attribute(name)
            .ok()
            .flatten()
            .map(|attribute| attribute.value.into_owned())
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Concatenated text of the direct text children.
    pub(crate) fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A parsed XML part: prolog nodes followed by the root element.
#[derive(Debug, Clone)]
pub(crate) struct XmlTree {
    nodes: Vec<Node>,
}

impl XmlTree {
    pub(crate) fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut open: Vec<Element> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();

        loop {
            let event = reader.read_event().map_err(XmlError::new)?;
            match event {
                Event::Start(start) => open.push(Element {
                    start: start.into_owned(),
                    self_closing: false,
                    children: Vec::new(),
                }),
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| XmlError::new("unexpected closing tag"))?;
                    attach(&mut open, &mut nodes, Node::Element(element));
                }
                Event::Empty(start) => {
                    let element = Element {
                        start: start.into_owned(),
                        self_closing: true,
                        children: Vec::new(),
                    };
                    attach(&mut open, &mut nodes, Node::Element(element));
                }
                Event::Text(text) => {
                    let raw = std::str::from_utf8(&text).map_err(XmlError::new)?;
                    let value = quick_xml::escape::unescape(raw).map_err(XmlError::new)?;
                    append_text(&mut open, &mut nodes, &value);
                }
                Event::GeneralRef(reference) => {
                    let name = std::str::from_utf8(&reference).map_err(XmlError::new)?;
                    let entity = format!("&{name};");
                    let value = quick_xml::escape::unescape(&entity).map_err(XmlError::new)?;
                    append_text(&mut open, &mut nodes, &value);
                }
                Event::Eof => break,
                other => attach(&mut open, &mut nodes, Node::Other(other.into_owned())),
            }
        }

        if let Some(element) = open.last() {
            return Err(XmlError::new(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(element.start.name().as_ref())
            )));
        }
        Ok(Self { nodes })
    }

    pub(crate) fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub(crate) fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

fn attach(open: &mut [Element], nodes: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.push(node),
        None => nodes.push(node),
    }
}

/// Merge text and entity references into a single text node.
fn append_text(open: &mut [Element], nodes: &mut Vec<Node>, value: &Cow<'_, str>) {
    let siblings = match open.last_mut() {
        Some(parent) => &mut parent.children,
        None => nodes,
    };
    if let Some(Node::Text(existing)) = siblings.last_mut() {
        existing.push_str(value);
    } else {
        siblings.push(Node::Text(value.to_string()));
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(element) => {
            if element.self_closing && element.children.is_empty() {
                emit(writer, Event::Empty(element.start.borrow()))
            } else {
                emit(writer, Event::Start(element.start.borrow()))?;
                for child in &element.children {
                    write_node(writer, child)?;
                }
                emit(writer, Event::End(element.start.to_end()))
            }
        }
        Node::Text(text) => emit(writer, Event::Text(BytesText::new(text))),
        Node::Other(event) => emit(writer, event.borrow()),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer.write_event(event).map_err(XmlError::new)
}
