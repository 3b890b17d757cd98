//! FILENAME: wire/src/writer.rs
//! PURPOSE: Streaming XML builder used to compose provider requests.
//! CONTEXT: Thin layer over `quick_xml::Writer` that speaks in terms of
//! named elements with attribute maps and text, which is all the request
//! payloads need.

use crate::WireError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub fn new() -> Self {
        XmlWriter {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    /// Writer without indentation. Used where text nodes must stay byte-exact.
    pub fn compact() -> Self {
        XmlWriter {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Emits `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn declaration(&mut self) -> Result<(), WireError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), WireError> {
        self.writer.write_event(Event::Start(Self::tag(name, attrs)))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<(), WireError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Self-closing element: `<name a="b"/>`.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), WireError> {
        self.writer.write_event(Event::Empty(Self::tag(name, attrs)))?;
        Ok(())
    }

    /// Element whose only content is escaped text. Empty text still produces
    /// an open/close pair so the element reads back as present-but-empty.
    pub fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), WireError> {
        self.start(name, attrs)?;
        if !text.is_empty() {
            self.writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        self.end(name)
    }

    /// Element with nested content produced by `body`.
    pub fn element<F>(&mut self, name: &str, attrs: &[(&str, &str)], body: F) -> Result<(), WireError>
    where
        F: FnOnce(&mut XmlWriter) -> Result<(), WireError>,
    {
        self.start(name, attrs)?;
        body(self)?;
        self.end(name)
    }

    pub fn into_string(self) -> Result<String, WireError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }

    fn tag<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut tag = BytesStart::new(name);
        for &(key, value) in attrs {
            tag.push_attribute((key, value));
        }
        tag
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    #[test]
    fn test_nested_elements_round_trip() {
        let mut w = XmlWriter::new();
        w.declaration().unwrap();
        w.element("req_EnumDims", &[], |w| {
            w.text_element("sID", &[], "abc")?;
            w.empty("dim", &[("name", "Entity"), ("pov", "<E&1>")])?;
            w.text_element("alsTbl", &[], "")
        })
        .unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.starts_with("<?xml"));

        let doc = Element::parse(&xml).unwrap();
        assert_eq!(doc.name(), "req_EnumDims");
        assert_eq!(doc.require("sID").unwrap().text(), "abc");
        assert_eq!(doc.require("dim").unwrap().attr("pov"), Some("<E&1>"));
        assert_eq!(doc.require("alsTbl").unwrap().text(), "");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut w = XmlWriter::compact();
        w.text_element("mdx", &[], "a < b & c").unwrap();
        assert_eq!(w.into_string().unwrap(), "<mdx>a &lt; b &amp; c</mdx>");
    }
}
