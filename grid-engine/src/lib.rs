//! FILENAME: grid-engine/src/lib.rs
//! Grid subsystem for the SmartView client.
//!
//! A grid is a two-dimensional slice of a cube: some dimensions on rows,
//! some on columns, the rest fixed by a point-of-view. This crate builds
//! request grids from declarative axis specifications, reads provider
//! grids back from XML, and encodes the retrieval preferences that travel
//! with them. It performs no I/O.
//!
//! Layers:
//! - `axis`: axis specifications, their expansion and cross-joins
//! - `grid`: the flattened grid and its wire codec
//! - `cell`: cell kinds and typed cell values
//! - `pov`: point-of-view
//! - `preferences`: retrieval options

pub mod axis;
pub mod cell;
mod error;
pub mod grid;
pub mod pov;
pub mod preferences;

pub use axis::{
    cross_join, process_axis_spec, AxisDims, AxisLabel, AxisMembers, AxisSpec, GridLayout,
    MemberSet,
};
pub use cell::{CellKind, CellValue};
pub use error::{GridError, GridSpecError, PreferenceError};
pub use grid::{DimsBlock, Grid};
pub use pov::Pov;
pub use preferences::{AncestorPosition, Indent, MemberDisplay, Preferences, ZoomMode};
