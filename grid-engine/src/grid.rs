//! FILENAME: grid-engine/src/grid.rs
//! PURPOSE: The rectangular slice of a cube exchanged with the provider.
//! CONTEXT: A `Grid` is stored exactly the way it travels: row-major arrays
//! of raw strings and cell kinds, plus the placement of every cube
//! dimension (rows, columns or POV). It is built either from a declarative
//! axis specification (a request template whose data cells are still empty)
//! or from a provider response (fully populated). Grids are never edited;
//! a refresh produces a new one.
//!
//! LAYOUT: `col_dims.len()` header rows sit on top and `row_dims.len()`
//! header columns on the left. The corner they share holds upper-left
//! blanks:
//!
//! ```text
//!            | Qtr1   | Qtr2        <- column header row (one per col dim)
//!   ---------+--------+-------
//!   East     | (data) | (data)
//!   West     | (data) | (data)
//! ```

use crate::axis::{process_axis_spec, AxisLabel, AxisSpec, GridLayout};
use crate::cell::{CellKind, CellValue};
use crate::error::{GridError, GridSpecError};
use crate::pov::Pov;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use wire::{join_fields, split_fields, split_fields_exact, Element, WireError, XmlWriter};

/// Whether `to_xml` includes the per-dimension placement block. Some
/// requests leave it out because the provider already knows the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimsBlock {
    Include,
    Omit,
}

/// Serialize only. A grid is built by `define` or `from_xml`, which keep
/// `values` and `kinds` at exactly `row_count * col_count` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    row_count: usize,
    col_count: usize,
    /// Every cube dimension, indexed by the provider's dimension id.
    dimensions: Vec<String>,
    row_dims: Vec<String>,
    col_dims: Vec<String>,
    /// Members for the dimensions on neither axis.
    pov: Pov,
    values: Vec<String>,
    kinds: Vec<CellKind>,
}

/// Placement of one dimension on the wire.
enum Role<'a> {
    Row(usize),
    Col(usize),
    Pov(&'a str),
}

impl Grid {
    // ========================================================================
    // CONSTRUCTION FROM A SPECIFICATION
    // ========================================================================

    /// Builds a request template from row and column specifications.
    ///
    /// Only header cells are populated; every data cell is an empty
    /// placeholder for the provider to fill in. Axis arity is validated
    /// here, and so is placement: a dimension may appear at most once across
    /// both axes.
    pub fn define(
        dimensions: &[String],
        pov: &Pov,
        rows: &AxisSpec,
        cols: &AxisSpec,
    ) -> Result<Grid, GridSpecError> {
        let (row_dims, row_tuples) = process_axis_spec(rows, AxisLabel::Rows)?;
        let (col_dims, col_tuples) = process_axis_spec(cols, AxisLabel::Cols)?;

        let mut placed: FxHashSet<&str> = FxHashSet::default();
        if let Some(dup) = row_dims.iter().chain(&col_dims).find(|dim| !placed.insert(dim.as_str())) {
            return Err(GridSpecError::DuplicateDimension(dup.clone()));
        }

        let row_count = col_dims.len() + row_tuples.len();
        let col_count = row_dims.len() + col_tuples.len();
        let mut values = Vec::with_capacity(row_count * col_count);
        let mut kinds = Vec::with_capacity(row_count * col_count);

        for header in 0..col_dims.len() {
            for _ in 0..row_dims.len() {
                values.push(String::new());
                kinds.push(CellKind::UpperLeft);
            }
            for tuple in &col_tuples {
                values.push(tuple[header].clone());
                kinds.push(CellKind::Member);
            }
        }

        for tuple in &row_tuples {
            for member in tuple {
                values.push(member.clone());
                kinds.push(CellKind::Member);
            }
            for _ in 0..col_tuples.len() {
                values.push(String::new());
                kinds.push(CellKind::Data);
            }
        }

        let pov = pov
            .iter()
            .filter(|(dim, _)| !row_dims.iter().any(|d| d == dim) && !col_dims.iter().any(|d| d == dim))
            .collect();

        Ok(Grid {
            row_count,
            col_count,
            dimensions: dimensions.to_vec(),
            row_dims,
            col_dims,
            pov,
            values,
            kinds,
        })
    }

    /// `define` with rows and columns given together.
    pub fn define_layout(
        dimensions: &[String],
        pov: &Pov,
        layout: &GridLayout,
    ) -> Result<Grid, GridSpecError> {
        Self::define(dimensions, pov, &layout.rows, &layout.cols)
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Writes the `<grid>` element.
    pub fn write_xml(&self, w: &mut XmlWriter, dims: DimsBlock) -> Result<(), GridError> {
        w.start("grid", &[])?;
        w.empty("cube", &[])?;
        if dims == DimsBlock::Include {
            self.write_dims_xml(w)?;
        }

        let rows = self.row_count.to_string();
        let cols = self.col_count.to_string();
        // `end` is inclusive. A zero-cell grid still writes start=0 end=0;
        // readers size the slice from rows * cols, never from the range.
        let end = self.values.len().saturating_sub(1).to_string();
        let types: Vec<String> = self.kinds.iter().map(|k| k.code().to_string()).collect();

        w.start("slices", &[])?;
        w.start("slice", &[("rows", rows.as_str()), ("cols", cols.as_str())])?;
        w.start("data", &[])?;
        w.start("range", &[("start", "0"), ("end", end.as_str())])?;
        w.text_element("vals", &[], &join_fields(&self.values))?;
        w.text_element("types", &[], &join_fields(&types))?;
        w.end("range")?;
        w.end("data")?;
        w.end("slice")?;
        w.end("slices")?;
        w.end("grid")?;
        Ok(())
    }

    /// Writes the `<dims>` block on its own, one element per cube dimension
    /// in cube order.
    pub fn write_dims_xml(&self, w: &mut XmlWriter) -> Result<(), GridError> {
        let roles = self.roles()?;

        w.start("dims", &[])?;
        for (id, (name, role)) in self.dimensions.iter().zip(&roles).enumerate() {
            let id = id.to_string();
            match role {
                Role::Row(pos) => {
                    let pos = pos.to_string();
                    w.empty("dim", &[("id", id.as_str()), ("name", name.as_str()), ("row", pos.as_str())])?;
                }
                Role::Col(pos) => {
                    let pos = pos.to_string();
                    w.empty("dim", &[("id", id.as_str()), ("name", name.as_str()), ("col", pos.as_str())])?;
                }
                Role::Pov(member) => {
                    w.empty(
                        "dim",
                        &[("id", id.as_str()), ("name", name.as_str()), ("pov", *member), ("display", *member)],
                    )?;
                }
            }
        }
        w.end("dims")?;
        Ok(())
    }

    pub fn to_xml(&self, dims: DimsBlock) -> Result<String, GridError> {
        let mut w = XmlWriter::new();
        self.write_xml(&mut w, dims)?;
        Ok(w.into_string()?)
    }

    /// Resolves the placement of every cube dimension, in cube order.
    fn roles(&self) -> Result<Vec<Role<'_>>, GridError> {
        let cube: FxHashSet<&str> = self.dimensions.iter().map(String::as_str).collect();
        let mut axis: FxHashMap<&str, Role<'_>> = FxHashMap::default();
        for (pos, dim) in self.row_dims.iter().enumerate() {
            axis.insert(dim, Role::Row(pos));
        }
        for (pos, dim) in self.col_dims.iter().enumerate() {
            axis.insert(dim, Role::Col(pos));
        }
        if let Some(unknown) = axis.keys().find(|dim| !cube.contains(*dim)) {
            return Err(GridError::UnknownDimension(unknown.to_string()));
        }

        self.dimensions
            .iter()
            .map(|dim| match axis.remove(dim.as_str()) {
                Some(role) => Ok(role),
                None => self
                    .pov
                    .get(dim)
                    .map(Role::Pov)
                    .ok_or_else(|| GridError::MissingPov(dim.clone())),
            })
            .collect()
    }

    // ========================================================================
    // DESERIALIZATION
    // ========================================================================

    /// Parses a response document and builds a grid from its `<grid>`
    /// element.
    pub fn parse(xml: &str) -> Result<Grid, GridError> {
        let doc = Element::parse(xml)?;
        Self::from_xml(&doc)
    }

    /// Builds a grid from `doc` if it is a `<grid>` element, otherwise from
    /// the first `<grid>` below it.
    pub fn from_xml(doc: &Element) -> Result<Grid, GridError> {
        let grid = doc
            .find("grid")
            .ok_or_else(|| WireError::MissingElement("grid".to_string()))?;

        let dims = grid.require("dims")?.find_all("dim");
        let mut slots: Vec<Option<String>> = vec![None; dims.len()];
        let mut rows: Vec<(usize, String)> = Vec::new();
        let mut cols: Vec<(usize, String)> = Vec::new();
        let mut pov = Pov::new();

        for dim in dims {
            // Dims are not guaranteed to arrive in id order, but ids are dense
            // from zero, so every id indexes into the dim list.
            let id = dim.attr_usize("id")?;
            let name = dim.require_attr("name")?.to_string();
            let slot = slots.get_mut(id).ok_or_else(|| WireError::InvalidAttribute {
                element: format!("dim {}", name),
                attribute: "id".to_string(),
                value: id.to_string(),
            })?;
            *slot = Some(name.clone());

            if let Some(member) = dim.attr("pov") {
                pov.insert(name, member);
            } else if dim.attr("row").is_some() {
                rows.push((dim.attr_usize("row")?, name));
            } else if dim.attr("col").is_some() {
                cols.push((dim.attr_usize("col")?, name));
            } else {
                return Err(WireError::MissingAttribute {
                    element: format!("dim {}", name),
                    attribute: "pov|row|col".to_string(),
                }
                .into());
            }
        }

        let dimensions = slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| slot.ok_or(GridError::MissingDimensionId(id)))
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by_key(|(pos, _)| *pos);
        cols.sort_by_key(|(pos, _)| *pos);

        let slice = grid.require("slices/slice")?;
        let row_count = slice.attr_usize("rows")?;
        let col_count = slice.attr_usize("cols")?;
        let range = slice.require("data/range")?;
        let cells = row_count
            .checked_mul(col_count)
            .ok_or_else(|| WireError::InvalidAttribute {
                element: "slice".to_string(),
                attribute: "rows*cols".to_string(),
                value: format!("{}*{}", row_count, col_count),
            })?;

        let values = Self::read_array(range, "vals", cells)?;
        let kinds = Self::read_array(range, "types", cells)?
            .iter()
            .map(|code| CellKind::from_code(code).ok_or_else(|| GridError::UnknownCellKind(code.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Grid {
            row_count,
            col_count,
            dimensions,
            row_dims: rows.into_iter().map(|(_, name)| name).collect(),
            col_dims: cols.into_iter().map(|(_, name)| name).collect(),
            pov,
            values,
            kinds,
        })
    }

    fn read_array(range: &Element, field: &'static str, expected: usize) -> Result<Vec<String>, GridError> {
        let text = range.require(field)?.text();
        split_fields_exact(&text, expected).ok_or_else(|| GridError::CellCountMismatch {
            field,
            expected,
            found: split_fields(&text).len(),
        })
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn row_dims(&self) -> &[String] {
        &self.row_dims
    }

    pub fn col_dims(&self) -> &[String] {
        &self.col_dims
    }

    pub fn pov(&self) -> &Pov {
        &self.pov
    }

    /// Flattened raw values, row-major.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Flattened cell kinds, parallel to `values`.
    pub fn kinds(&self) -> &[CellKind] {
        &self.kinds
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.row_count || col >= self.col_count {
            return Err(GridError::IndexOutOfRange {
                row,
                col,
                row_count: self.row_count,
                col_count: self.col_count,
            });
        }
        Ok(row * self.col_count + col)
    }

    pub fn kind(&self, row: usize, col: usize) -> Result<CellKind, GridError> {
        Ok(self.kinds[self.index(row, col)?])
    }

    /// The raw wire string of a cell, whatever its kind.
    pub fn raw(&self, row: usize, col: usize) -> Result<&str, GridError> {
        Ok(&self.values[self.index(row, col)?])
    }

    /// Reads a cell according to its kind. Data cells parse as numbers
    /// (empty means no value); all other kinds return their raw string.
    pub fn cell(&self, row: usize, col: usize) -> Result<CellValue, GridError> {
        let idx = self.index(row, col)?;
        let raw = &self.values[idx];
        match self.kinds[idx] {
            CellKind::Data => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(CellValue::Empty);
                }
                trimmed
                    .parse::<f64>()
                    .map(CellValue::Number)
                    .map_err(|_| GridError::InvalidNumber {
                        row,
                        col,
                        value: raw.clone(),
                    })
            }
            CellKind::Member | CellKind::Text | CellKind::UpperLeft => Ok(CellValue::Text(raw.clone())),
        }
    }

    /// Raw values one row at a time, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        let cols = self.col_count;
        (0..self.row_count).map(move |r| &self.values[r * cols..(r + 1) * cols])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{AxisDims, AxisMembers};

    fn cube() -> Vec<String> {
        ["Year", "Measures", "Product", "Market", "Scenario"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn base_pov() -> Pov {
        [
            ("Year", "Year"),
            ("Measures", "Measures"),
            ("Product", "Product"),
            ("Market", "Market"),
            ("Scenario", "Actual"),
        ]
        .into_iter()
        .collect()
    }

    fn sample() -> Grid {
        Grid::define(
            &cube(),
            &base_pov(),
            &AxisSpec::tuples(
                ["Market", "Product"],
                vec![vec!["East", "Cola"], vec!["West", "Cola"], vec!["West", "Root Beer"]],
            ),
            &AxisSpec::members("Year", ["Qtr1", "Qtr2"]),
        )
        .unwrap()
    }

    fn assert_consistent(grid: &Grid, row_tuples: usize, col_tuples: usize) {
        assert_eq!(grid.row_count(), grid.col_dims().len() + row_tuples);
        assert_eq!(grid.col_count(), grid.row_dims().len() + col_tuples);
        assert_eq!(grid.values().len(), grid.row_count() * grid.col_count());
        assert_eq!(grid.kinds().len(), grid.values().len());
    }

    #[test]
    fn test_define_counts_and_pov() {
        let grid = sample();
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.col_count(), 4);
        assert_consistent(&grid, 3, 2);
        assert_eq!(grid.row_dims(), ["Market", "Product"]);
        assert_eq!(grid.col_dims(), ["Year"]);

        // Axis dimensions are dropped from the grid's POV.
        assert_eq!(grid.pov().len(), 2);
        assert_eq!(grid.pov().get("Scenario"), Some("Actual"));
        assert!(!grid.pov().contains("Market"));
    }

    #[test]
    fn test_define_layout() {
        let grid = sample();
        let rows: Vec<Vec<&str>> = grid
            .rows()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["", "", "Qtr1", "Qtr2"],
                vec!["East", "Cola", "", ""],
                vec!["West", "Cola", "", ""],
                vec!["West", "Root Beer", "", ""],
            ]
        );
        assert_eq!(grid.kind(0, 0).unwrap(), CellKind::UpperLeft);
        assert_eq!(grid.kind(0, 1).unwrap(), CellKind::UpperLeft);
        assert_eq!(grid.kind(0, 2).unwrap(), CellKind::Member);
        assert_eq!(grid.kind(1, 0).unwrap(), CellKind::Member);
        assert_eq!(grid.kind(3, 3).unwrap(), CellKind::Data);
        assert_eq!(grid.cell(1, 2).unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_define_counts_for_various_shapes() {
        let shapes = vec![
            (AxisSpec::single("Market", "East"), AxisSpec::single("Year", "Qtr1"), 1, 1),
            (
                AxisSpec::members("Market", ["East", "West", "South"]),
                AxisSpec::tuples(
                    ["Year", "Scenario"],
                    vec![vec!["Qtr1", "Actual"], vec!["Qtr1", "Budget"]],
                ),
                3,
                2,
            ),
            (
                AxisSpec::members("Market", Vec::<String>::new()),
                AxisSpec::members("Year", ["Qtr1"]),
                0,
                1,
            ),
        ];
        for (rows, cols, row_tuples, col_tuples) in shapes {
            let grid = Grid::define(&cube(), &base_pov(), &rows, &cols).unwrap();
            assert_consistent(&grid, row_tuples, col_tuples);
        }
    }

    #[test]
    fn test_define_multi_dimension_column_headers() {
        let grid = Grid::define(
            &cube(),
            &base_pov(),
            &AxisSpec::single("Market", "East"),
            &AxisSpec::tuples(
                ["Year", "Scenario"],
                vec![vec!["Qtr1", "Actual"], vec!["Qtr1", "Budget"]],
            ),
        )
        .unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.raw(0, 1).unwrap(), "Qtr1");
        assert_eq!(grid.raw(1, 2).unwrap(), "Budget");
        assert_eq!(grid.raw(2, 0).unwrap(), "East");
        assert_eq!(grid.kind(1, 0).unwrap(), CellKind::UpperLeft);
    }

    #[test]
    fn test_define_rejects_bad_tuple_eagerly() {
        let rows = AxisSpec {
            dims: AxisDims::Many(vec!["Market".into(), "Product".into()]),
            members: AxisMembers::Tuples(vec![vec!["East".into(), "Cola".into(), "Diet".into()]]),
        };
        let err = Grid::define(&cube(), &base_pov(), &rows, &AxisSpec::single("Year", "Qtr1"))
            .unwrap_err();
        assert_eq!(err, GridSpecError::Arity { axis: AxisLabel::Rows, found: 3, expected: 2 });
    }

    #[test]
    fn test_define_rejects_dimension_on_both_axes() {
        let err = Grid::define(
            &cube(),
            &base_pov(),
            &AxisSpec::single("Year", "Q1"),
            &AxisSpec::single("Year", "Q2"),
        )
        .unwrap_err();
        assert_eq!(err, GridSpecError::DuplicateDimension("Year".to_string()));
    }

    #[test]
    fn test_define_rejects_dimension_twice_on_one_axis() {
        let err = Grid::define(
            &cube(),
            &base_pov(),
            &AxisSpec::tuples(["Market", "Market"], vec![vec!["East", "West"]]),
            &AxisSpec::single("Year", "Qtr1"),
        )
        .unwrap_err();
        assert_eq!(err, GridSpecError::DuplicateDimension("Market".to_string()));

        let err = Grid::define(
            &cube(),
            &base_pov(),
            &AxisSpec::single("Market", "East"),
            &AxisSpec::tuples(["Year", "Scenario", "Year"], vec![vec!["Qtr1", "Actual", "Qtr2"]]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'Year'"));
    }

    #[test]
    fn test_round_trip_through_xml() {
        let grid = sample();
        let xml = grid.to_xml(DimsBlock::Include).unwrap();
        let parsed = Grid::parse(&xml).unwrap();

        assert_eq!(parsed.row_count(), grid.row_count());
        assert_eq!(parsed.col_count(), grid.col_count());
        for r in 0..grid.row_count() {
            for c in 0..grid.col_count() {
                assert_eq!(parsed.kind(r, c).unwrap(), grid.kind(r, c).unwrap());
                assert_eq!(parsed.cell(r, c).unwrap(), grid.cell(r, c).unwrap());
            }
        }
        assert_eq!(parsed.dimensions(), grid.dimensions());
        assert_eq!(parsed.row_dims(), grid.row_dims());
        assert_eq!(parsed.col_dims(), grid.col_dims());
        assert_eq!(parsed.pov().get("Scenario"), Some("Actual"));
    }

    #[test]
    fn test_to_xml_dims_block() {
        let grid = sample();
        let doc = Element::parse(&grid.to_xml(DimsBlock::Include).unwrap()).unwrap();
        assert!(doc.require("cube").is_ok());

        let dims = doc.find_all("dims/dim");
        assert_eq!(dims.len(), 5);
        assert_eq!(dims[0].attr("name"), Some("Year"));
        assert_eq!(dims[0].attr("col"), Some("0"));
        assert_eq!(dims[2].attr("row"), Some("1"));
        assert_eq!(dims[3].attr("row"), Some("0"));
        assert_eq!(dims[4].attr("pov"), Some("Actual"));
        assert_eq!(dims[4].attr("display"), Some("Actual"));

        let range = doc.require("slices/slice/data/range").unwrap();
        assert_eq!(range.attr("start"), Some("0"));
        assert_eq!(range.attr("end"), Some("15"));
        assert_eq!(range.require("types").unwrap().text(), "7|7|0|0|0|0|2|2|0|0|2|2|0|0|2|2");
        assert_eq!(range.require("vals").unwrap().text(), "||Qtr1|Qtr2|East|Cola|||West|Cola|||West|Root Beer||");

        let omitted = Element::parse(&grid.to_xml(DimsBlock::Omit).unwrap()).unwrap();
        assert!(omitted.at("dims").is_none());
        assert!(omitted.at("slices/slice").is_some());
    }

    #[test]
    fn test_to_xml_requires_pov_member() {
        let pov = Pov::new().with("Scenario", "Actual");
        let grid = Grid::define(
            &cube(),
            &pov,
            &AxisSpec::single("Market", "East"),
            &AxisSpec::single("Year", "Qtr1"),
        )
        .unwrap();
        assert!(matches!(grid.to_xml(DimsBlock::Include), Err(GridError::MissingPov(ref d)) if d == "Measures"));
        assert!(grid.to_xml(DimsBlock::Omit).is_ok());
    }

    #[test]
    fn test_to_xml_rejects_unknown_axis_dimension() {
        let grid = Grid::define(
            &cube(),
            &base_pov(),
            &AxisSpec::single("Region", "East"),
            &AxisSpec::single("Year", "Qtr1"),
        )
        .unwrap();
        assert!(matches!(grid.to_xml(DimsBlock::Include), Err(GridError::UnknownDimension(ref d)) if d == "Region"));
    }

    const RESPONSE: &str = r#"<res_Refresh>
  <grid>
    <cube/>
    <dims>
      <dim id="2" name="Scenario" pov="Actual" display="Actual"/>
      <dim id="1" name="Market" row="0"/>
      <dim id="0" name="Year" col="0"/>
    </dims>
    <slices>
      <slice rows="3" cols="3">
        <data>
          <range start="0" end="8">
            <vals>|Qtr1|Qtr2|East|42.5||West|Flat|</vals>
            <types>7|0|0|0|2|2|0|3|2</types>
          </range>
        </data>
      </slice>
    </slices>
  </grid>
</res_Refresh>"#;

    #[test]
    fn test_from_xml_orders_dims_by_id() {
        let grid = Grid::parse(RESPONSE).unwrap();
        assert_eq!(grid.dimensions(), ["Year", "Market", "Scenario"]);
        assert_eq!(grid.row_dims(), ["Market"]);
        assert_eq!(grid.col_dims(), ["Year"]);
        assert_eq!(grid.pov().get("Scenario"), Some("Actual"));
    }

    #[test]
    fn test_from_xml_cell_values() {
        let grid = Grid::parse(RESPONSE).unwrap();
        assert_eq!(grid.cell(1, 1).unwrap(), CellValue::Number(42.5));
        assert_eq!(grid.cell(1, 2).unwrap(), CellValue::Empty);
        assert_eq!(grid.cell(2, 1).unwrap(), CellValue::Text("Flat".to_string()));
        assert_eq!(grid.cell(0, 1).unwrap(), CellValue::Text("Qtr1".to_string()));
        // Trailing empty field is a real cell.
        assert_eq!(grid.raw(2, 2).unwrap(), "");
        assert_eq!(grid.cell(2, 2).unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_cell_out_of_range() {
        let grid = Grid::parse(RESPONSE).unwrap();
        assert!(matches!(grid.cell(3, 0), Err(GridError::IndexOutOfRange { row: 3, .. })));
        assert!(matches!(grid.cell(0, 3), Err(GridError::IndexOutOfRange { col: 3, .. })));
        assert!(grid.raw(9, 9).is_err());
    }

    #[test]
    fn test_non_numeric_data_is_an_error() {
        let xml = RESPONSE.replace("East|42.5|", "East|abc|");
        let grid = Grid::parse(&xml).unwrap();
        assert!(matches!(grid.cell(1, 1), Err(GridError::InvalidNumber { ref value, .. }) if value == "abc"));
    }

    #[test]
    fn test_from_xml_rejects_short_arrays() {
        let xml = RESPONSE.replace("West|Flat|", "West|Flat");
        assert!(matches!(
            Grid::parse(&xml),
            Err(GridError::CellCountMismatch { field: "vals", expected: 9, found: 8 })
        ));
    }

    #[test]
    fn test_from_xml_rejects_unknown_kind() {
        let xml = RESPONSE.replace("<types>7|", "<types>9|");
        assert!(matches!(Grid::parse(&xml), Err(GridError::UnknownCellKind(ref c)) if c == "9"));
    }

    #[test]
    fn test_from_xml_rejects_missing_elements() {
        let xml = RESPONSE.replace("<slices>", "<other>").replace("</slices>", "</other>");
        assert!(matches!(Grid::parse(&xml), Err(GridError::Wire(WireError::MissingElement(_)))));
        assert!(matches!(
            Grid::parse("<res_Refresh/>"),
            Err(GridError::Wire(WireError::MissingElement(_)))
        ));
    }

    #[test]
    fn test_empty_grid_writes_zero_range_and_reads_back() {
        let empty = AxisSpec {
            dims: AxisDims::Many(Vec::new()),
            members: AxisMembers::Tuples(Vec::new()),
        };
        let grid = Grid::define(&cube(), &base_pov(), &empty, &empty).unwrap();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.col_count(), 0);
        assert!(grid.values().is_empty());

        let xml = grid.to_xml(DimsBlock::Include).unwrap();
        let doc = Element::parse(&xml).unwrap();
        let range = doc.require("slices/slice/data/range").unwrap();
        assert_eq!(range.attr("start"), Some("0"));
        assert_eq!(range.attr("end"), Some("0"));

        let parsed = Grid::parse(&xml).unwrap();
        assert_eq!(parsed.row_count(), 0);
        assert!(parsed.values().is_empty());
        assert!(parsed.kinds().is_empty());
        assert_eq!(parsed.rows().count(), 0);
    }

    #[test]
    fn test_from_xml_rejects_out_of_range_dimension_id() {
        for id in ["18446744073709551615", "1000000000", "3"] {
            let xml = RESPONSE.replace(r#"id="1""#, &format!(r#"id="{}""#, id));
            assert!(
                matches!(
                    Grid::parse(&xml),
                    Err(GridError::Wire(WireError::InvalidAttribute { ref attribute, ref value, .. }))
                        if attribute == "id" && value == id
                ),
                "id {}",
                id
            );
        }
    }

    #[test]
    fn test_from_xml_rejects_overflowing_cell_count() {
        let xml = RESPONSE.replace(r#"rows="3" cols="3""#, r#"rows="4294967296" cols="4294967296""#);
        let err = Grid::parse(&xml).unwrap_err();
        // 2^64 cells overflows on 64-bit targets; a 32-bit usize fails
        // earlier when reading the attribute.
        assert!(matches!(err, GridError::Wire(WireError::InvalidAttribute { .. })));
    }

    #[test]
    fn test_parsed_arrays_match_dimensions() {
        let grid = Grid::parse(RESPONSE).unwrap();
        assert_eq!(grid.values().len(), grid.row_count() * grid.col_count());
        assert_eq!(grid.kinds().len(), grid.values().len());
        let rows: Vec<&[String]> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == grid.col_count()));
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["values"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_from_xml_rejects_gap_in_dimension_ids() {
        // A repeated id leaves another id in range unfilled.
        let xml = RESPONSE.replace(r#"id="1""#, r#"id="0""#);
        assert!(matches!(Grid::parse(&xml), Err(GridError::MissingDimensionId(1))));
    }
}
