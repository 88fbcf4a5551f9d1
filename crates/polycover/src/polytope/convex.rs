//! Single convex region given by linear constraints, with memoized geometry.

use std::fmt;
use std::sync::OnceLock;

use num_traits::{Signed, Zero};

use super::volume::PolytopeVolume;
use crate::backend::{BackendError, GeometryBackend};
use crate::types::{evaluate, Constraint, Point, Rational, Simplex};

/// Convex body `{x : ineq(x) >= 0 for all ineq, eq(x) == 0 for all eq}`.
///
/// Invariants:
/// - Constraint lists are fixed at construction; derived values live in
///   `OnceLock` cells and are filled on first request.
/// - Every operation producing a new region builds a fresh instance, so no
///   cache ever outlives the constraints it was computed from.
#[derive(Clone, Debug, Default)]
pub struct ConvexPolytope {
    inequalities: Vec<Constraint>,
    equalities: Vec<Constraint>,
    volume: OnceLock<PolytopeVolume>,
    vertices: OnceLock<Vec<Point>>,
    triangulation: OnceLock<Vec<Simplex>>,
}

/// Fill `cell` from a fallible computation; a failed computation leaves it empty.
pub(crate) fn memo<T, E>(cell: &OnceLock<T>, f: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = f()?;
    Ok(cell.get_or_init(|| value))
}

impl ConvexPolytope {
    pub fn new(inequalities: Vec<Constraint>, equalities: Vec<Constraint>) -> Self {
        Self {
            inequalities,
            equalities,
            ..Self::default()
        }
    }

    #[inline]
    pub fn from_inequalities(inequalities: Vec<Constraint>) -> Self {
        Self::new(inequalities, Vec::new())
    }

    #[inline]
    pub fn inequalities(&self) -> &[Constraint] {
        &self.inequalities
    }

    #[inline]
    pub fn equalities(&self) -> &[Constraint] {
        &self.equalities
    }

    /// Number of coordinates implied by the longest constraint row.
    pub fn ambient_dimension(&self) -> usize {
        self.inequalities
            .iter()
            .chain(&self.equalities)
            .map(|row| row.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    /// Measure of this body; an empty body measures `{0, 0}`.
    pub fn volume<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<&PolytopeVolume, BackendError> {
        memo(&self.volume, || match backend.volume(self) {
            Err(BackendError::NoFeasibleSolutions) => Ok(PolytopeVolume::zero()),
            other => other,
        })
    }

    /// Extremal vertices; empty for an empty body.
    pub fn vertices<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<&[Point], BackendError> {
        memo(&self.vertices, || match backend.vertices(self) {
            Err(BackendError::NoFeasibleSolutions) => Ok(Vec::new()),
            other => other,
        })
        .map(Vec::as_slice)
    }

    /// Simplices (indices into `vertices()`) covering this body.
    pub fn triangulation<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<&[Simplex], BackendError> {
        memo(&self.triangulation, || {
            let vertices = self.vertices(backend)?;
            if vertices.is_empty() {
                return Ok(Vec::new());
            }
            backend.triangulation(vertices)
        })
        .map(Vec::as_slice)
    }

    /// Equivalent body with irredundant constraints.
    ///
    /// An empty body cannot be reduced and reports `NoFeasibleSolutions`.
    pub fn reduce<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<ConvexPolytope, BackendError> {
        backend.reduce(self)
    }

    /// `self ∩ other`: both constraint lists, concatenated.
    pub fn intersect(&self, other: &ConvexPolytope) -> ConvexPolytope {
        ConvexPolytope::new(
            self.inequalities
                .iter()
                .chain(&other.inequalities)
                .cloned()
                .collect(),
            self.equalities
                .iter()
                .chain(&other.equalities)
                .cloned()
                .collect(),
        )
    }

    /// True when `other ⊆ self`: every vertex of `other` survives intersecting with `self`.
    pub fn contains<B: GeometryBackend + ?Sized>(
        &self,
        other: &ConvexPolytope,
        backend: &B,
    ) -> Result<bool, BackendError> {
        let cap = other.intersect(self);
        let cap_vertices = cap.vertices(backend)?;
        Ok(other
            .vertices(backend)?
            .iter()
            .all(|v| cap_vertices.contains(v)))
    }

    /// Exact point membership. A point of the wrong arity is never a member.
    pub fn has_element(&self, point: &[Rational]) -> bool {
        let arity = point.len() + 1;
        if self
            .inequalities
            .iter()
            .chain(&self.equalities)
            .any(|row| row.len() != arity)
        {
            return false;
        }
        self.inequalities
            .iter()
            .all(|row| !evaluate(row, point).is_negative())
            && self
                .equalities
                .iter()
                .all(|row| evaluate(row, point).is_zero())
    }
}

impl PartialEq for ConvexPolytope {
    fn eq(&self, other: &Self) -> bool {
        self.inequalities == other.inequalities && self.equalities == other.equalities
    }
}

impl Eq for ConvexPolytope {}

fn write_rows(f: &mut fmt::Formatter<'_>, rows: &[Constraint], relation: &str) -> fmt::Result {
    for row in rows {
        let Some((c0, rest)) = row.split_first() else {
            continue;
        };
        write!(f, "{: >5}", c0.to_string())?;
        for (index, item) in rest.iter().enumerate() {
            write!(f, " + {: >5} x{}", item.to_string(), 1 + index)?;
        }
        writeln!(f, " {relation} 0")?;
    }
    Ok(())
}

impl fmt::Display for ConvexPolytope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, &self.inequalities, ">=")?;
        write_rows(f, &self.equalities, "==")
    }
}
