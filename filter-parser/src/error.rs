//! FILENAME: filter-parser/src/error.rs

use thiserror::Error;
use wire::WireError;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unable to parse filter expression '{0}'")]
    UnrecognisedFilterExpression(String),

    #[error("Filter '{filter}' has an invalid decompose pattern: {source}")]
    InvalidPattern {
        filter: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Wire(#[from] WireError),
}
