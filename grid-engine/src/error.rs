//! FILENAME: grid-engine/src/error.rs

use crate::axis::AxisLabel;
use thiserror::Error;
use wire::WireError;

/// A malformed axis specification. Raised while the grid is being defined,
/// before anything is sent to a provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridSpecError {
    #[error("Invalid {axis} specification: tuple has {found} member(s) but {expected} dimension(s) are placed on the axis")]
    Arity {
        axis: AxisLabel,
        found: usize,
        expected: usize,
    },

    /// A dimension may sit on one axis, once.
    #[error("Dimension '{0}' is placed on the grid axes more than once")]
    DuplicateDimension(String),
}

#[derive(Error, Debug)]
pub enum GridError {
    #[error(transparent)]
    Spec(#[from] GridSpecError),

    #[error("Cell ({row}, {col}) is outside a {row_count}x{col_count} grid")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        row_count: usize,
        col_count: usize,
    },

    #[error("Data cell ({row}, {col}) holds non-numeric value '{value}'")]
    InvalidNumber { row: usize, col: usize, value: String },

    #[error("Unknown cell type code '{0}'")]
    UnknownCellKind(String),

    #[error("Slice {field} has {found} entries, expected {expected}")]
    CellCountMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("No POV member for dimension '{0}'")]
    MissingPov(String),

    #[error("Dimension '{0}' is not a dimension of the cube")]
    UnknownDimension(String),

    #[error("Dimension id {0} is missing from the dimension list")]
    MissingDimensionId(usize),

    #[error(transparent)]
    Wire(#[from] WireError),
}

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Invalid value '{value}' for preference {preference}")]
    Invalid {
        preference: &'static str,
        value: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preferences JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
