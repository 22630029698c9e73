//! Immutable element tree
//!
//! An `XmlNode` is a value: every builder method consumes the node and
//! returns a new one, so edits never leak into trees that are still shared.

use crate::error::{XmirError, XmirResult};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;

/// Element name used by every object node
pub const OBJECT_TAG: &str = "o";

/// A labeled tree element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: Option<String>,
}

impl XmlNode {
    /// Create an element with the given tag
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an `<o base="...">` element
    pub fn object(base: impl Into<String>) -> Self {
        Self::new(OBJECT_TAG).with_attr("base", base)
    }

    /// Set an attribute, replacing an existing value in place
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    /// Remove an attribute if present
    pub fn without_attr(mut self, key: &str) -> Self {
        self.attributes.retain(|(k, _)| k != key);
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements in order
    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Replace all child elements
    pub fn replace_children(mut self, children: Vec<XmlNode>) -> Self {
        self.children = children;
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Element tag
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value by key, or a `MissingAttribute` error
    pub fn required_attribute(&self, key: &str) -> XmirResult<&str> {
        self.attribute(key).ok_or_else(|| XmirError::MissingAttribute {
            node: self.marker(),
            attribute: key.to_string(),
        })
    }

    /// All attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// The `base` attribute, the role marker of an object node
    pub fn base(&self) -> Option<&str> {
        self.attribute("base")
    }

    /// Child elements in document order
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child whose `base` matches
    pub fn child(&self, base: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.base() == Some(base))
    }

    /// Text content, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Short rendering used in error messages: tag plus base and name
    pub fn marker(&self) -> String {
        let mut out = self.name.clone();
        if let Some(base) = self.base() {
            out.push_str(&format!(" base=\"{}\"", base));
        }
        if let Some(name) = self.attribute("name") {
            out.push_str(&format!(" name=\"{}\"", name));
        }
        out
    }

    /// Parse the first root element of an XML document
    pub fn parse(xml: &str) -> XmirResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let node = Self::from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let text = text.unescape()?;
                        let merged = match current.text.take() {
                            Some(existing) => existing + &text,
                            None => text.into_owned(),
                        };
                        current.text = Some(merged);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8(data.into_inner().into_owned())?;
                        current.text = Some(current.text.take().unwrap_or_default() + &text);
                    }
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or(XmirError::Empty)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Eof => return Err(XmirError::Empty),
                _ => {}
            }
        }
    }

    fn from_start(start: &BytesStart<'_>) -> XmirResult<Self> {
        let name = String::from_utf8(start.name().as_ref().to_vec())?;
        let mut node = XmlNode::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = attr.unescape_value()?.into_owned();
            node.attributes.push((key, value));
        }
        Ok(node)
    }

    /// Serialize to compact XML, preserving attribute order
    pub fn to_xml_string(&self) -> XmirResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> XmirResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        let text = self.text.as_deref().filter(|t| !t.is_empty());
        if self.children.is_empty() && text.is_none() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| XmirError::Write(e.to_string()));
        }
        writer
            .write_event(Event::Start(start))
            .map_err(|e| XmirError::Write(e.to_string()))?;
        if let Some(text) = text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| XmirError::Write(e.to_string()))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| XmirError::Write(e.to_string()))
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_xml_string() {
            Ok(xml) => f.write_str(&xml),
            Err(_) => write!(f, "<{}>", self.marker()),
        }
    }
}
