//! Markup-tree engine: a minimal element tree over quick-xml.
//!
//! Every codec component talks to this wrapper instead of raw markup
//! text. It supports exactly what the codecs need: creating child
//! elements, attaching attributes, setting element text, querying the
//! same back, and moving whole trees to and from files.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::util::{Error, Result};

/// One element of a document tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    /// Create an element with no attributes, children, or text.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach an attribute. Values go through `ToString`, so any scalar
    /// with a canonical text form can be passed directly.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl ToString) {
        self.attributes.push((name.into(), value.to_string()));
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a new empty child and return a reference to it.
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut Element {
        self.children.push(Element::new(name));
        self.children.last_mut().unwrap()
    }

    /// Append an already-built child tree.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// All children in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Children with a given element name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child with a given element name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Check whether a child with the given name exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Set the element's text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Parse a document and return its root element.
    ///
    /// Whitespace-only text runs (indentation between elements) are
    /// dropped; any other text is kept verbatim on its parent.
    pub fn parse(input: &str) -> Result<Element> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let elem = element_from_start(&start)?;
                    attach(&mut stack, &mut root, elem)?;
                }
                Event::End(_) => {
                    let elem = stack
                        .pop()
                        .ok_or_else(|| Error::Malformed("unmatched end tag".into()))?;
                    attach(&mut stack, &mut root, elem)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::Malformed(e.to_string()))?;
                    if text.trim().is_empty() {
                        continue;
                    }
                    if let Some(parent) = stack.last_mut() {
                        append_text(parent, &text);
                    }
                }
                Event::CData(data) => {
                    let raw = data.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    if let Some(parent) = stack.last_mut() {
                        append_text(parent, &text);
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::Malformed("unclosed element".into()));
        }
        root.ok_or_else(|| Error::Malformed("document has no root element".into()))
    }

    /// Serialize the tree to a complete document with an XML declaration.
    pub fn to_document_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| Error::Malformed(e.to_string()))?;
        write_element(&mut writer, self)?;

        let mut out = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Malformed(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut elem = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Malformed(e.to_string()))?;
        elem.attributes.push((key, value.into_owned()));
    }
    Ok(elem)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, elem: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(elem);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(elem);
            Ok(())
        }
        None => Err(Error::Malformed("multiple root elements".into())),
    }
}

fn append_text(parent: &mut Element, text: &str) {
    match &mut parent.text {
        Some(existing) => existing.push_str(text),
        None => parent.text = Some(text.to_string()),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, elem: &Element) -> Result<()> {
    let mut start = BytesStart::new(elem.name.as_str());
    for (key, value) in &elem.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.children.is_empty() && elem.text.is_none() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Malformed(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Malformed(e.to_string()))?;
    if let Some(text) = &elem.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| Error::Malformed(e.to_string()))?;
    }
    for child in &elem.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(elem.name.as_str())))
        .map_err(|e| Error::Malformed(e.to_string()))?;
    Ok(())
}

/// Load and parse a document file.
pub fn load(path: &Path) -> Result<Element> {
    let text = fs::read_to_string(path).map_err(|e| Error::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    Element::parse(&text)
}

/// Serialize a tree and write it to a file.
pub fn save(root: &Element, path: &Path) -> Result<()> {
    let text = root.to_document_string()?;
    fs::write(path, text).map_err(|e| Error::Create {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_query() {
        let mut root = Element::new("map");
        root.set_attribute("width", 4u32);
        root.add_child("layer").set_attribute("name", "ground");

        assert_eq!(root.attribute("width"), Some("4"));
        assert_eq!(root.child("layer").unwrap().attribute("name"), Some("ground"));
        assert!(root.attribute("height").is_none());
    }

    #[test]
    fn test_round_trip_through_text() -> Result<()> {
        let mut root = Element::new("map");
        root.set_attribute("version", "1.0");
        let layer = root.add_child("layer");
        layer.set_attribute("name", "a<b&\"c\"");
        layer.add_child("data").set_text("1,2,3");

        let text = root.to_document_string()?;
        let parsed = Element::parse(&text)?;
        assert_eq!(parsed, root);
        Ok(())
    }

    #[test]
    fn test_multiline_text_survives() -> Result<()> {
        let mut root = Element::new("property");
        root.set_text("line one\nline two");

        let text = root.to_document_string()?;
        let parsed = Element::parse(&text)?;
        assert_eq!(parsed.text(), Some("line one\nline two"));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<a><b></a>").is_err());
        assert!(Element::parse("just text").is_err());
    }

    #[test]
    fn test_whitespace_between_elements_is_ignored() -> Result<()> {
        let parsed = Element::parse("<a>\n  <b/>\n</a>")?;
        assert_eq!(parsed.text(), None);
        assert!(parsed.has_child("b"));
        Ok(())
    }
}
