//! Serializable catalog records for polytopes and coverage sets.
//!
//! Rationals travel as strings (`"1/2"`, `"-3"`) so the exact values survive
//! JSON, which has no rational number type. Records convert to the core
//! types with `TryFrom` and back with `From`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::{CircuitPolytope, Hop};
use crate::polytope::{ConvexPolytope, Polytope};
use crate::types::{Constraint, Point, Rational};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("not a rational number: {value:?}")]
    BadRational { value: String },
}

/// Constraint rows of one convex body, `row >= 0` and `row == 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvexPolytopeData {
    pub inequalities: Vec<Vec<String>>,
    #[serde(default)]
    pub equalities: Vec<Vec<String>>,
}

/// Union of convex bodies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolytopeData {
    pub convex_subpolytopes: Vec<ConvexPolytopeData>,
}

/// Coverage-set entry with string operation tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitPolytopeData {
    pub operations: Vec<String>,
    pub cost: f64,
    pub polytope: PolytopeData,
}

/// One decomposition step with string coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopData {
    pub source: Vec<String>,
    pub operation: String,
    pub target: Vec<String>,
}

pub fn parse_rational(value: &str) -> Result<Rational, DataError> {
    value.trim().parse().map_err(|_| DataError::BadRational {
        value: value.to_string(),
    })
}

/// Parse a coordinate vector such as `["1/2", "0", "3"]`.
pub fn parse_point<S: AsRef<str>>(values: &[S]) -> Result<Point, DataError> {
    values.iter().map(|v| parse_rational(v.as_ref())).collect()
}

fn parse_rows(rows: &[Vec<String>]) -> Result<Vec<Constraint>, DataError> {
    rows.iter().map(|row| parse_point(row.as_slice())).collect()
}

pub fn format_point(point: &[Rational]) -> Vec<String> {
    point.iter().map(ToString::to_string).collect()
}

fn format_rows(rows: &[Constraint]) -> Vec<Vec<String>> {
    rows.iter().map(|row| format_point(row)).collect()
}

impl TryFrom<&ConvexPolytopeData> for ConvexPolytope {
    type Error = DataError;

    fn try_from(data: &ConvexPolytopeData) -> Result<Self, Self::Error> {
        Ok(ConvexPolytope::new(
            parse_rows(&data.inequalities)?,
            parse_rows(&data.equalities)?,
        ))
    }
}

impl From<&ConvexPolytope> for ConvexPolytopeData {
    fn from(cp: &ConvexPolytope) -> Self {
        Self {
            inequalities: format_rows(cp.inequalities()),
            equalities: format_rows(cp.equalities()),
        }
    }
}

impl TryFrom<&PolytopeData> for Polytope {
    type Error = DataError;

    fn try_from(data: &PolytopeData) -> Result<Self, Self::Error> {
        let parts = data
            .convex_subpolytopes
            .iter()
            .map(ConvexPolytope::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polytope::new(parts))
    }
}

impl From<&Polytope> for PolytopeData {
    fn from(polytope: &Polytope) -> Self {
        Self {
            convex_subpolytopes: polytope
                .convex_subpolytopes()
                .iter()
                .map(ConvexPolytopeData::from)
                .collect(),
        }
    }
}

impl TryFrom<&CircuitPolytopeData> for CircuitPolytope<String> {
    type Error = DataError;

    fn try_from(data: &CircuitPolytopeData) -> Result<Self, Self::Error> {
        Ok(CircuitPolytope::new(
            Polytope::try_from(&data.polytope)?,
            data.operations.clone(),
            data.cost,
        ))
    }
}

impl From<&CircuitPolytope<String>> for CircuitPolytopeData {
    fn from(entry: &CircuitPolytope<String>) -> Self {
        Self {
            operations: entry.operations.clone(),
            cost: entry.cost,
            polytope: PolytopeData::from(&entry.polytope),
        }
    }
}

impl From<&Hop<String>> for HopData {
    fn from(hop: &Hop<String>) -> Self {
        Self {
            source: format_point(&hop.source),
            operation: hop.operation.clone(),
            target: format_point(&hop.target),
        }
    }
}

/// Parse a whole coverage set.
pub fn coverage_set_from_data(
    records: &[CircuitPolytopeData],
) -> Result<Vec<CircuitPolytope<String>>, DataError> {
    records.iter().map(CircuitPolytope::try_from).collect()
}
