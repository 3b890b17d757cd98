//! FILENAME: grid-engine/src/cell.rs
//! PURPOSE: Cell classification and typed cell reads.
//! CONTEXT: A grid cell travels as a raw string plus a numeric type code.
//! The code decides how the string is read back.

use serde::{Deserialize, Serialize};

/// Classification of a grid cell. Discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Member label in a row or column header.
    Member = 0,
    /// Numeric fact; empty until the provider populates it.
    Data = 2,
    /// Textual fact.
    Text = 3,
    /// Blank corner cell above the row headers and left of the column headers.
    UpperLeft = 7,
}

impl CellKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: &str) -> Option<CellKind> {
        match code.trim() {
            "0" => Some(CellKind::Member),
            "2" => Some(CellKind::Data),
            "3" => Some(CellKind::Text),
            "7" => Some(CellKind::UpperLeft),
            _ => None,
        }
    }
}

/// The value of a cell, interpreted according to its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Data cell with no value yet. Not the same as zero.
    Empty,
    Number(f64),
    /// Raw string of a member, text or upper-left cell.
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}
