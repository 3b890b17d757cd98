//! FILENAME: wire/src/lib.rs
//! SmartView wire primitives.
//!
//! Everything the grid and filter crates need from XML and from the
//! provider's flattened array encoding, without any knowledge of grids,
//! filters or sessions.
//!
//! Layers:
//! - `element`: owned element tree parsed from a response
//! - `writer`: streaming builder for requests
//! - `array`: pipe-separated arrays
//! - `provider`: provider family tag

mod error;
pub mod array;
pub mod element;
pub mod provider;
pub mod writer;

pub use array::{join_fields, split_fields, split_fields_exact, FIELD_SEPARATOR};
pub use element::Element;
pub use error::WireError;
pub use provider::ProviderKind;
pub use writer::XmlWriter;
