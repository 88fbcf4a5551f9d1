//! Exact-rational reference backend (explicit enumeration, no tolerances).
//!
//! Model
//! - H→V by enumerating active sets: every choice of `n - rank(E)`
//!   inequalities is solved together with the equalities `E`; unique feasible
//!   solutions are vertices. Complexity `O(C(m, n))`, fine for the small
//!   regions this crate is exercised on.
//! - Lower-dimensional regions are measured in the coordinate projection picked
//!   by the pivot columns of their affine hull, so a segment reports its
//!   projected length at dimension 1 and a point reports `{0, 1}`.
//! - Triangulation is a pulling triangulation over the face lattice: cone the
//!   smallest vertex over every facet that avoids it, recursively.
//!
//! Assumptions
//! - Regions are bounded. A feasible region without vertices (an unbounded
//!   polyhedron containing a line) is indistinguishable from an empty one here.

use std::collections::BTreeSet;

use num_traits::{One, Signed, Zero};
use rand::seq::SliceRandom;
use rand::RngCore;

use super::linalg::{affine_hull, determinant, null_vector, rank, solve_affine};
use super::{BackendError, GeometryBackend};
use crate::bits::combinations;
use crate::polytope::{ConvexPolytope, PolytopeVolume};
use crate::types::{evaluate, Constraint, Point, Rational, Simplex};

/// Brute-force exact backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactBackend;

type VertexSet = BTreeSet<usize>;

impl GeometryBackend for ExactBackend {
    fn volume(&self, polytope: &ConvexPolytope) -> Result<PolytopeVolume, BackendError> {
        let vertices = polytope.vertices(self)?;
        if vertices.is_empty() {
            return Err(BackendError::NoFeasibleSolutions);
        }
        let refs: Vec<&Point> = vertices.iter().collect();
        let hull = affine_hull(&refs);
        let projected = project(vertices, &hull.coordinates);
        let facets = tight_sets(polytope.inequalities(), vertices);
        let simplices = pulling_triangulation(&projected, &facets, hull.dimension);
        Ok(PolytopeVolume::new(
            hull.dimension,
            simplex_volume_sum(&projected, &simplices, hull.dimension),
        ))
    }

    fn vertices(&self, polytope: &ConvexPolytope) -> Result<Vec<Point>, BackendError> {
        enumerate_vertices(polytope)
    }

    fn triangulation(&self, vertices: &[Point]) -> Result<Vec<Simplex>, BackendError> {
        let Some(first) = vertices.first() else {
            return Ok(Vec::new());
        };
        if let Some(bad) = vertices.iter().find(|v| v.len() != first.len()) {
            return Err(BackendError::DimensionMismatch {
                expected: first.len(),
                found: bad.len(),
            });
        }
        let refs: Vec<&Point> = vertices.iter().collect();
        let hull = affine_hull(&refs);
        let projected = project(vertices, &hull.coordinates);
        let facets = supporting_facets(&projected, hull.dimension);
        Ok(pulling_triangulation(&projected, &facets, hull.dimension))
    }

    fn reduce(&self, polytope: &ConvexPolytope) -> Result<ConvexPolytope, BackendError> {
        let n = row_dimension(polytope)?;
        let vertices = polytope.vertices(self)?;
        if vertices.is_empty() {
            return Err(BackendError::NoFeasibleSolutions);
        }
        let refs: Vec<&Point> = vertices.iter().collect();
        let hull = affine_hull(&refs);
        let tight = tight_sets(polytope.inequalities(), vertices);

        // Affine hull: given equalities plus inequalities tight everywhere,
        // filtered down to an independent set.
        let mut equalities: Vec<Constraint> = Vec::new();
        let implicit = polytope
            .inequalities()
            .iter()
            .zip(&tight)
            .filter(|(_, set)| set.len() == vertices.len())
            .map(|(row, _)| row);
        for row in polytope.equalities().iter().chain(implicit) {
            equalities.push(row.clone());
            if rank(&equalities, n + 1) < equalities.len() {
                equalities.pop();
            }
        }

        let mut seen: BTreeSet<VertexSet> = BTreeSet::new();
        let mut inequalities = Vec::new();
        for (row, set) in polytope.inequalities().iter().zip(tight) {
            if set.is_empty() || set.len() == vertices.len() {
                continue;
            }
            if subset_dimension(vertices, &set) + 1 != hull.dimension {
                continue;
            }
            if seen.insert(set) {
                inequalities.push(row.clone());
            }
        }
        Ok(ConvexPolytope::new(inequalities, equalities))
    }

    fn extract_one_vertex(
        &self,
        polytope: &ConvexPolytope,
        rng: &mut dyn RngCore,
    ) -> Result<Point, BackendError> {
        polytope
            .vertices(self)?
            .choose(rng)
            .cloned()
            .ok_or(BackendError::NoFeasibleSolutions)
    }
}

/// Common coordinate count of all rows; rows must agree.
fn row_dimension(polytope: &ConvexPolytope) -> Result<usize, BackendError> {
    let n = polytope.ambient_dimension();
    for row in polytope.inequalities().iter().chain(polytope.equalities()) {
        if row.len() != n + 1 {
            return Err(BackendError::DimensionMismatch {
                expected: n + 1,
                found: row.len(),
            });
        }
    }
    Ok(n)
}

/// H→V over active sets; sorted, deduplicated.
fn enumerate_vertices(polytope: &ConvexPolytope) -> Result<Vec<Point>, BackendError> {
    let n = row_dimension(polytope)?;
    let equalities = polytope.equalities();
    let inequalities = polytope.inequalities();
    let eq_coefficients: Vec<Vec<Rational>> =
        equalities.iter().map(|row| row[1..].to_vec()).collect();
    let needed = n - rank(&eq_coefficients, n);

    let mut found: BTreeSet<Point> = BTreeSet::new();
    for active in combinations(inequalities.len(), needed) {
        let mut rows: Vec<&[Rational]> = equalities.iter().map(Vec::as_slice).collect();
        rows.extend(active.iter().map(|&i| inequalities[i].as_slice()));
        let Some(x) = solve_affine(&rows, n) else {
            continue;
        };
        if polytope.has_element(&x) {
            found.insert(x);
        }
    }
    if found.is_empty() {
        return Err(BackendError::NoFeasibleSolutions);
    }
    Ok(found.into_iter().collect())
}

/// For each inequality, the vertices on which it is active.
fn tight_sets(inequalities: &[Constraint], vertices: &[Point]) -> Vec<VertexSet> {
    inequalities
        .iter()
        .map(|row| {
            vertices
                .iter()
                .enumerate()
                .filter(|(_, v)| evaluate(row, v).is_zero())
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}

/// Facets of a full-dimensional point set in `R^k`, from supporting
/// hyperplanes through `k` affinely independent points.
fn supporting_facets(points: &[Point], k: usize) -> Vec<VertexSet> {
    if k == 0 {
        return Vec::new();
    }
    let mut out: BTreeSet<VertexSet> = BTreeSet::new();
    for chosen in combinations(points.len(), k) {
        let base = &points[chosen[0]];
        let rows: Vec<Vec<Rational>> = chosen[1..]
            .iter()
            .map(|&i| difference(&points[i], base))
            .collect();
        let Some(normal) = null_vector(&rows, k) else {
            continue;
        };
        let offset = dot(&normal, base);
        let (mut above, mut below) = (false, false);
        let mut tight = VertexSet::new();
        for (i, p) in points.iter().enumerate() {
            let side = dot(&normal, p) - &offset;
            if side.is_positive() {
                above = true;
            } else if side.is_negative() {
                below = true;
            } else {
                tight.insert(i);
            }
        }
        if !(above && below) {
            out.insert(tight);
        }
    }
    out.into_iter().collect()
}

/// Pulling triangulation of the `dimension`-dimensional hull of `points`,
/// given tight sets covering at least all of its facets.
fn pulling_triangulation(points: &[Point], facets: &[VertexSet], dimension: usize) -> Vec<Simplex> {
    let all: VertexSet = (0..points.len()).collect();
    pull(&all, dimension, points, facets)
}

fn pull(face: &VertexSet, dimension: usize, points: &[Point], facets: &[VertexSet]) -> Vec<Simplex> {
    let Some(&apex) = face.first() else {
        return Vec::new();
    };
    if dimension == 0 {
        return vec![vec![apex]];
    }
    let mut seen: BTreeSet<VertexSet> = BTreeSet::new();
    let mut out = Vec::new();
    for facet in facets {
        let sub: VertexSet = face.intersection(facet).copied().collect();
        if sub.is_empty() || sub.len() == face.len() || sub.contains(&apex) {
            continue;
        }
        if subset_dimension(points, &sub) + 1 != dimension || !seen.insert(sub.clone()) {
            continue;
        }
        for mut simplex in pull(&sub, dimension - 1, points, facets) {
            simplex.insert(0, apex);
            out.push(simplex);
        }
    }
    out
}

fn subset_dimension(points: &[Point], subset: &VertexSet) -> usize {
    let refs: Vec<&Point> = subset.iter().map(|&i| &points[i]).collect();
    affine_hull(&refs).dimension
}

/// `Σ |det(v1 - v0, …, vk - v0)| / k!`.
fn simplex_volume_sum(points: &[Point], simplices: &[Simplex], dimension: usize) -> Rational {
    let mut total = Rational::zero();
    for simplex in simplices {
        let base = &points[simplex[0]];
        let m: Vec<Vec<Rational>> = simplex[1..]
            .iter()
            .map(|&i| difference(&points[i], base))
            .collect();
        total += determinant(m).abs();
    }
    let mut factorial = Rational::one();
    for i in 2..=dimension {
        factorial *= Rational::from_integer(i.into());
    }
    total / factorial
}

fn project(points: &[Point], coordinates: &[usize]) -> Vec<Point> {
    points
        .iter()
        .map(|p| coordinates.iter().map(|&c| p[c].clone()).collect())
        .collect()
}

fn difference(a: &[Rational], b: &[Rational]) -> Vec<Rational> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

fn dot(a: &[Rational], b: &[Rational]) -> Rational {
    a.iter().zip(b).fold(Rational::zero(), |acc, (x, y)| acc + x * y)
}
