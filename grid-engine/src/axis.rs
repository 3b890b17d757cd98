//! FILENAME: grid-engine/src/axis.rs
//! PURPOSE: Declarative row/column specifications and their expansion.
//! CONTEXT: A caller describes an axis as one or more dimension names plus
//! the members to show, in whichever shape is most convenient (one member,
//! a flat member list, or explicit tuples). The grid only ever deals with
//! the normalized form: an ordered dimension list and a list of tuples whose
//! arity matches it.

use crate::error::GridSpecError;
use serde::{Deserialize, Serialize};

/// Which axis a specification belongs to. Used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisLabel {
    Rows,
    Cols,
}

impl std::fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisLabel::Rows => write!(f, "rows"),
            AxisLabel::Cols => write!(f, "cols"),
        }
    }
}

// ============================================================================
// AXIS SPECIFICATION
// ============================================================================

/// The dimension(s) placed on an axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisDims {
    One(String),
    Many(Vec<String>),
}

/// The members shown on an axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisMembers {
    /// One member; a single one-element tuple.
    Single(String),
    /// One tuple of length 1 per member.
    List(Vec<String>),
    /// Explicit tuples, one member per axis dimension.
    Tuples(Vec<Vec<String>>),
}

/// Row or column specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub dims: AxisDims,
    pub members: AxisMembers,
}

impl AxisSpec {
    /// A single member of a single dimension.
    pub fn single(dimension: impl Into<String>, member: impl Into<String>) -> Self {
        AxisSpec {
            dims: AxisDims::One(dimension.into()),
            members: AxisMembers::Single(member.into()),
        }
    }

    /// A list of members of a single dimension.
    pub fn members<I, S>(dimension: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AxisSpec {
            dims: AxisDims::One(dimension.into()),
            members: AxisMembers::List(members.into_iter().map(Into::into).collect()),
        }
    }

    /// Explicit member tuples over several dimensions.
    pub fn tuples<D, S>(dimensions: D, tuples: Vec<Vec<S>>) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        S: Into<String>,
    {
        AxisSpec {
            dims: AxisDims::Many(dimensions.into_iter().map(Into::into).collect()),
            members: AxisMembers::Tuples(
                tuples
                    .into_iter()
                    .map(|t| t.into_iter().map(Into::into).collect())
                    .collect(),
            ),
        }
    }

    /// Tuple axis holding the cross-join of `sets`, one set per dimension.
    /// `None` when any set is absent.
    pub fn cross_joined<D>(dimensions: D, sets: &[Option<MemberSet>]) -> Option<Self>
    where
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let tuples = cross_join(sets)?;
        Some(AxisSpec {
            dims: AxisDims::Many(dimensions.into_iter().map(Into::into).collect()),
            members: AxisMembers::Tuples(tuples),
        })
    }
}

/// Rows and columns together, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: AxisSpec,
    pub cols: AxisSpec,
}

// ============================================================================
// EXPANSION
// ============================================================================

/// Normalizes an axis specification into `(dimension names, tuples)` and
/// checks that every tuple has one member per dimension.
pub fn process_axis_spec(
    spec: &AxisSpec,
    axis: AxisLabel,
) -> Result<(Vec<String>, Vec<Vec<String>>), GridSpecError> {
    let dims = match &spec.dims {
        AxisDims::One(dim) => vec![dim.clone()],
        AxisDims::Many(dims) => dims.clone(),
    };

    let tuples = match &spec.members {
        AxisMembers::Single(member) => vec![vec![member.clone()]],
        AxisMembers::List(members) => members.iter().map(|m| vec![m.clone()]).collect(),
        AxisMembers::Tuples(tuples) => tuples.clone(),
    };

    if let Some(bad) = tuples.iter().find(|t| t.len() != dims.len()) {
        return Err(GridSpecError::Arity {
            axis,
            found: bad.len(),
            expected: dims.len(),
        });
    }

    Ok((dims, tuples))
}

// ============================================================================
// CROSS JOIN
// ============================================================================

/// One input to a cross-join: a bare member or a list of members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSet {
    One(String),
    Many(Vec<String>),
}

impl MemberSet {
    fn as_slice(&self) -> &[String] {
        match self {
            MemberSet::One(member) => std::slice::from_ref(member),
            MemberSet::Many(members) => members,
        }
    }
}

impl From<&str> for MemberSet {
    fn from(member: &str) -> Self {
        MemberSet::One(member.to_string())
    }
}

impl From<String> for MemberSet {
    fn from(member: String) -> Self {
        MemberSet::One(member)
    }
}

impl From<Vec<&str>> for MemberSet {
    fn from(members: Vec<&str>) -> Self {
        MemberSet::Many(members.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for MemberSet {
    fn from(members: Vec<String>) -> Self {
        MemberSet::Many(members)
    }
}

/// Cartesian product of the inputs. The first input varies slowest and
/// supplies the leftmost member of each tuple.
///
/// Returns `None` if any input is absent. With no inputs at all the result
/// is an empty list of tuples.
pub fn cross_join(sets: &[Option<MemberSet>]) -> Option<Vec<Vec<String>>> {
    if sets.is_empty() {
        return Some(Vec::new());
    }
    if sets.iter().any(Option::is_none) {
        return None;
    }

    let mut product: Vec<Vec<String>> = vec![Vec::new()];
    for set in sets.iter().flatten() {
        let members = set.as_slice();
        product = product
            .iter()
            .flat_map(|prefix| {
                members.iter().map(move |member| {
                    let mut tuple = prefix.clone();
                    tuple.push(member.clone());
                    tuple
                })
            })
            .collect();
    }
    Some(product)
}
