//! FILENAME: session/src/request.rs
//! PURPOSE: Request envelope for a SmartView method call.
//! CONTEXT: Every call is an XML document whose root is `req_<Method>`; the
//! provider answers with `res_<Method>` or an `<exception>`.

use crate::SessionError;
use wire::XmlWriter;

#[derive(Debug, Clone)]
pub struct Request {
    method: &'static str,
    body: String,
}

impl Request {
    /// Builds `<?xml?><req_{method}>…</req_{method}>`, with `content`
    /// writing the children.
    pub fn build<F>(method: &'static str, content: F) -> Result<Request, SessionError>
    where
        F: FnOnce(&mut XmlWriter) -> Result<(), SessionError>,
    {
        let root = format!("req_{}", method);
        let mut w = XmlWriter::new();
        w.declaration()?;
        w.start(&root, &[])?;
        content(&mut w)?;
        w.end(&root)?;
        Ok(Request {
            method,
            body: w.into_string()?,
        })
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Root element name of a successful response.
    pub fn response_name(&self) -> String {
        format!("res_{}", self.method)
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_root_is_named_after_method() {
        let request = Request::build("Logout", |w| {
            w.text_element("sID", &[], "abc")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(request.method(), "Logout");
        assert_eq!(request.response_name(), "res_Logout");
        assert!(request.body().starts_with("<?xml"));

        let doc = wire::Element::parse(request.body()).unwrap();
        assert_eq!(doc.name(), "req_Logout");
        assert_eq!(doc.require("sID").unwrap().text(), "abc");
    }
}
