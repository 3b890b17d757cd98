//! FILENAME: filter-parser/src/lib.rs
//! PURPOSE: Library root for member filter handling.
//! CONTEXT: Member queries (EnumMembers) take a named filter plus
//! positional arguments. Users write filters as free-form expressions;
//! this crate turns those into the structured form the provider expects.
//!
//! PIPELINE: Expression --> Static Grammar --> Filter Catalog --> ResolvedFilter
//!
//! SUPPORTED FEATURES:
//! - Provider defaults when no expression is given
//! - HFM shorthand: Name(arg), {Member.[Filter]}, {[Filter]}, {List}
//! - Catalog matching through each filter's decompose pattern
//! - Expression composition from a filter's compose template

mod error;
pub mod dialect;
pub mod filter;


pub use dialect::{default_filter, match_catalog, resolve_filter};
pub use error::FilterError;
pub use filter::{ArgKind, Filter, FilterArg, ResolvedFilter};
