//! Generic XML tree codec for descriptor documents.
//!
//! Decodes XML text into an ordered attribute/element tree and encodes it
//! back, following the usual descriptor-mapping conventions: element text
//! lands in a text slot, attributes in named slots, and child elements in
//! an ordered list that tolerates repeats. Comments, processing
//! instructions, and mixed content are not preserved.

use std::fmt;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Errors produced by the tree codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("malformed XML document: {0}")]
    Malformed(String),

    /// The document contains no root element.
    #[error("no root element found")]
    NoRoot,

    /// The document contains more than one root element.
    #[error("multiple root elements found")]
    MultipleRoots,

    /// The tree could not be written out as XML text.
    #[error("failed to encode XML document: {0}")]
    Encode(String),
}

/// An element with attributes, ordered children, and optional text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Attribute name/value pairs in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order; names may repeat.
    pub children: Vec<(String, XmlValue)>,
    /// Text content, whitespace-trimmed. Absent for childless empty elements.
    pub text: Option<String>,
}

impl XmlNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Look up the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlValue> {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn push_child(&mut self, name: impl Into<String>, value: impl Into<XmlValue>) {
        self.children.push((name.into(), value.into()));
    }

    /// Builder-style attribute insertion.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style child insertion.
    pub fn with_child(mut self, name: impl Into<String>, value: impl Into<XmlValue>) -> Self {
        self.push_child(name, value);
        self
    }

    /// Builder-style text assignment.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn is_bare_text(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// The shapes a decoded or programmatically supplied field value can take.
///
/// Field setters match on this union explicitly; there is no duck-typing
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Bare text content: an element with neither attributes nor children.
    Text(String),
    /// Numeric scalar supplied programmatically.
    Number(u64),
    /// Full element node.
    Node(XmlNode),
}

impl XmlValue {
    /// The text form, for `Text` values only.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The node form, for `Node` values only.
    pub fn as_node(&self) -> Option<&XmlNode> {
        match self {
            XmlValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Scalar rendering: text content for `Text` and `Node`, decimal for
    /// `Number`. `None` for nodes without text.
    pub fn scalar(&self) -> Option<String> {
        match self {
            XmlValue::Text(text) => Some(text.clone()),
            XmlValue::Number(number) => Some(number.to_string()),
            XmlValue::Node(node) => node.text().map(str::to_string),
        }
    }

    /// True for values that carry nothing: empty text or an empty node.
    pub fn is_empty(&self) -> bool {
        match self {
            XmlValue::Text(text) => text.is_empty(),
            XmlValue::Number(_) => false,
            XmlValue::Node(node) => {
                node.is_bare_text() && node.text.as_deref().unwrap_or("").is_empty()
            }
        }
    }
}

impl fmt::Display for XmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlValue::Text(text) => f.write_str(text),
            XmlValue::Number(number) => write!(f, "{}", number),
            XmlValue::Node(node) => write!(f, "{:?}", node),
        }
    }
}

impl From<&str> for XmlValue {
    fn from(text: &str) -> Self {
        XmlValue::Text(text.to_string())
    }
}

impl From<String> for XmlValue {
    fn from(text: String) -> Self {
        XmlValue::Text(text)
    }
}

impl From<u64> for XmlValue {
    fn from(number: u64) -> Self {
        XmlValue::Number(number)
    }
}

impl From<XmlNode> for XmlValue {
    fn from(node: XmlNode) -> Self {
        XmlValue::Node(node)
    }
}

/// Decode XML text into `(root element name, root value)`.
///
/// Elements with neither attributes nor children collapse to
/// [`XmlValue::Text`], so `<name>vol1</name>` reaches field setters as
/// plain text.
pub fn decode(xml: &str) -> Result<(String, XmlValue), XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<(String, XmlNode)> = Vec::new();
    let mut root: Option<(String, XmlValue)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        match event {
            Event::Start(start) => {
                let name = element_name(&start);
                let node = node_from_start(&start)?;
                stack.push((name, node));
            }
            Event::Empty(start) => {
                let name = element_name(&start);
                let node = node_from_start(&start)?;
                attach(&mut stack, &mut root, name, collapse(node))?;
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                append_text(&mut stack, content.trim());
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                append_text(&mut stack, content.trim());
            }
            Event::End(_) => {
                let (name, node) = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, name, collapse(node))?;
            }
            Event::Eof => break,
            // Declarations, comments, PIs, and doctypes carry no mapping data.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Malformed("unclosed element".to_string()));
    }
    root.ok_or(XmlError::NoRoot)
}

/// Encode a value tree under the given root element name, with an XML
/// declaration, no indentation.
pub fn encode(root: &str, value: &XmlValue) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    write_value(&mut writer, root, value)?;
    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Encode(e.to_string()))
}

/// Re-format an XML document with two-space indentation.
///
/// Callers that only want best-effort formatting fall back to their
/// original text when this fails.
pub fn pretty(xml: &str) -> Result<String, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    emit(&mut writer, Event::Text(BytesText::new(trimmed)))?;
                }
            }
            event => emit(&mut writer, event)?,
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Encode(e.to_string()))
}

fn element_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn node_from_start(start: &BytesStart) -> Result<XmlNode, XmlError> {
    let mut node = XmlNode::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn append_text(stack: &mut [(String, XmlNode)], content: &str) {
    if content.is_empty() {
        return;
    }
    if let Some((_, node)) = stack.last_mut() {
        match &mut node.text {
            Some(existing) => existing.push_str(content),
            None => node.text = Some(content.to_string()),
        }
    }
}

fn attach(
    stack: &mut Vec<(String, XmlNode)>,
    root: &mut Option<(String, XmlValue)>,
    name: String,
    value: XmlValue,
) -> Result<(), XmlError> {
    if let Some((_, parent)) = stack.last_mut() {
        parent.children.push((name, value));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots);
    }
    *root = Some((name, value));
    Ok(())
}

fn collapse(node: XmlNode) -> XmlValue {
    if node.is_bare_text() {
        XmlValue::Text(node.text.unwrap_or_default())
    } else {
        XmlValue::Node(node)
    }
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Encode(e.to_string()))
}

fn write_value<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &XmlValue,
) -> Result<(), XmlError> {
    match value {
        XmlValue::Text(text) => write_text_element(writer, name, text),
        XmlValue::Number(number) => write_text_element(writer, name, &number.to_string()),
        XmlValue::Node(node) => {
            let mut start = BytesStart::new(name);
            for (key, attr_value) in &node.attributes {
                start.push_attribute((key.as_str(), attr_value.as_str()));
            }
            if node.children.is_empty() && node.text.is_none() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            if let Some(text) = &node.text {
                emit(writer, Event::Text(BytesText::new(text)))?;
            }
            for (child_name, child) in &node.children {
                write_value(writer, child_name, child)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), XmlError> {
    if text.is_empty() {
        return emit(writer, Event::Empty(BytesStart::new(name)));
    }
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}
