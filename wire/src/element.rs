//! FILENAME: wire/src/element.rs
//! PURPOSE: Read-only XML element tree built from a provider response.
//! CONTEXT: Responses are small documents that are queried a handful of times
//! (by relative path, attribute and joined text), so they are materialised
//! into a plain owned tree rather than walked as a stream at every lookup.

use crate::WireError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One XML element with its attributes, child elements and direct text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parses a complete document and returns its root element.
    pub fn parse(xml: &str) -> Result<Element, WireError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    let element = stack.pop().ok_or_else(|| WireError::Unbalanced(name.clone()))?;
                    if element.name != name {
                        return Err(WireError::Unbalanced(name));
                    }
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    // Indentation between child elements is not content.
                    if text.trim().is_empty() && text.contains('\n') {
                        continue;
                    }
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(WireError::MissingElement(format!("</{}>", open.name)));
        }
        root.ok_or(WireError::EmptyDocument)
    }

    fn open(start: &BytesStart) -> Result<Element, WireError> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            // Only the first top-level element is the document element.
            None if root.is_none() => *root = Some(element),
            None => {}
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like `attr`, but absence is an error naming this element.
    pub fn require_attr(&self, name: &str) -> Result<&str, WireError> {
        self.attr(name).ok_or_else(|| WireError::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Reads a required attribute as a non-negative integer.
    pub fn attr_usize(&self, name: &str) -> Result<usize, WireError> {
        let raw = self.require_attr(name)?;
        raw.trim().parse().map_err(|_| WireError::InvalidAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Text directly inside this element (child element text excluded).
    pub fn own_text(&self) -> &str {
        &self.text
    }

    /// Joined text content of this element and all its descendants,
    /// in document order.
    pub fn text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text());
        }
        out
    }

    /// Follows a relative `a/b/c` path through child elements and returns
    /// the first match. An empty path returns `self`.
    pub fn at(&self, path: &str) -> Option<&Element> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match segments.next() {
            None => Some(self),
            Some(first) => {
                let rest: Vec<&str> = segments.collect();
                let rest = rest.join("/");
                self.children
                    .iter()
                    .filter(|child| child.name == first)
                    .find_map(|child| child.at(&rest))
            }
        }
    }

    /// Like `at`, but absence is a `MissingElement` error naming the path.
    pub fn require(&self, path: &str) -> Result<&Element, WireError> {
        self.at(path)
            .ok_or_else(|| WireError::MissingElement(format!("{}/{}", self.name, path)))
    }

    /// All elements reachable through the relative path, in document order.
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut current = vec![self];
        for segment in segments {
            current = current
                .into_iter()
                .flat_map(|element| element.children.iter().filter(move |c| c.name == segment))
                .collect();
        }
        current
    }

    /// Depth-first search for the first element named `name`, starting with
    /// `self`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<res_EnumDims>
  <dimList>
    <dim id="1" name="Period"/>
    <dim id="0" name="Entity &amp; Co"/>
  </dimList>
  <mbrs>a|b||</mbrs>
</res_EnumDims>"#;

    #[test]
    fn test_parse_paths_and_attributes() {
        let doc = Element::parse(DOC).unwrap();
        assert_eq!(doc.name(), "res_EnumDims");

        let dims = doc.find_all("dimList/dim");
        assert_eq!(dims.len(), 2);
        assert_eq!(dims[0].attr("name"), Some("Period"));
        assert_eq!(dims[1].attr("name"), Some("Entity & Co"));
        assert_eq!(dims[1].attr_usize("id").unwrap(), 0);
        assert!(dims[0].attr("missing").is_none());
    }

    #[test]
    fn test_text_keeps_empty_fields() {
        let doc = Element::parse(DOC).unwrap();
        assert_eq!(doc.require("mbrs").unwrap().text(), "a|b||");
    }

    #[test]
    fn test_find_descends_from_self() {
        let doc = Element::parse(DOC).unwrap();
        assert!(doc.find("res_EnumDims").is_some());
        assert_eq!(doc.find("dim").and_then(|d| d.attr("id")), Some("1"));
        assert!(doc.find("slice").is_none());
    }

    #[test]
    fn test_require_reports_missing_path() {
        let doc = Element::parse(DOC).unwrap();
        let err = doc.require("slices/slice").unwrap_err();
        assert!(matches!(err, WireError::MissingElement(ref p) if p == "res_EnumDims/slices/slice"));
    }

    #[test]
    fn test_invalid_integer_attribute() {
        let doc = Element::parse(r#"<dim id="x"/>"#).unwrap();
        assert!(matches!(doc.attr_usize("id"), Err(WireError::InvalidAttribute { .. })));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(Element::parse(""), Err(WireError::EmptyDocument)));
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        assert!(Element::parse("<a><b></b>").is_err());
    }
}
