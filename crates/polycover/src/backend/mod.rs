//! Geometry backend contract and the bundled exact implementation.
//!
//! Purpose
//! - The polytope algebra never enumerates vertices or measures regions on its
//!   own; it asks a `GeometryBackend`. Swapping in a faster solver only means
//!   implementing this trait.
//!
//! Failure model
//! - `NoFeasibleSolutions` is the expected, recoverable outcome for an empty
//!   region. `ConvexPolytope` maps it to a zero measure or an empty vertex set.
//! - `extract_one_vertex` may report `NoFeasibleSolutions` on a feasible region
//!   for numerically fragile solvers. Callers retry the whole search; the core
//!   never loops internally.
//! - Everything else is unexpected and must propagate.

mod exact;
pub(crate) mod linalg;

pub use exact::ExactBackend;

use rand::RngCore;
use thiserror::Error;

use crate::polytope::{ConvexPolytope, PolytopeVolume};
use crate::types::{Point, Simplex};

/// Errors surfaced by geometry backends.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The region is empty.
    #[error("no feasible solutions")]
    NoFeasibleSolutions,
    /// Constraint rows (or points) disagree on the ambient dimension.
    #[error("dimension mismatch: expected {expected} entries, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// The backend cannot handle this input.
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Single-region geometry consumed by the polytope algebra.
pub trait GeometryBackend {
    /// Measure of the region in its own affine dimension.
    fn volume(&self, polytope: &ConvexPolytope) -> Result<PolytopeVolume, BackendError>;

    /// Extremal points of the region.
    fn vertices(&self, polytope: &ConvexPolytope) -> Result<Vec<Point>, BackendError>;

    /// Simplicial decomposition of the hull of `vertices`, as index tuples.
    fn triangulation(&self, vertices: &[Point]) -> Result<Vec<Simplex>, BackendError>;

    /// Equivalent region with an irredundant constraint set.
    fn reduce(&self, polytope: &ConvexPolytope) -> Result<ConvexPolytope, BackendError>;

    /// Some vertex of the region, chosen with `rng`.
    fn extract_one_vertex(
        &self,
        polytope: &ConvexPolytope,
        rng: &mut dyn RngCore,
    ) -> Result<Point, BackendError>;
}
