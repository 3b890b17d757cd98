//! FILENAME: wire/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in XML output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Document contains no root element")]
    EmptyDocument,

    #[error("Unbalanced XML: unexpected end tag </{0}>")]
    Unbalanced(String),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Element <{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Element <{element}> has invalid {attribute}=\"{value}\"")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
}
