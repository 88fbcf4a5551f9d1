//! Exact polytope algebra (convex bodies and their unions).
//!
//! Purpose
//! - Boolean algebra over unions of convex bodies given by rational linear
//!   constraints: union, intersection, inclusion–exclusion volume, redundancy
//!   elimination, containment.
//!
//! Why this design (short)
//! - Convex pieces stay in H-representation; vertices, volumes and
//!   triangulations are asked of a `GeometryBackend` and memoized per instance.
//! - Unions are plain component lists. Nothing is merged eagerly; `reduce`
//!   and `trim_polytope_set` remove redundancy on request.
//! - Exact arithmetic everywhere, so containment and volume comparisons are
//!   equality tests, never tolerances.
//!
//! Code cross-refs: `ConvexPolytope`, `Polytope`, `PolytopeVolume`,
//! `trim_polytope_set`, `crate::backend::GeometryBackend`.

mod convex;
mod trim;
mod union;
mod volume;

pub use convex::ConvexPolytope;
pub use trim::trim_polytope_set;
pub use union::Polytope;
pub use volume::{PolytopeVolume, VolumeError};

use thiserror::Error;

use crate::backend::BackendError;

/// Errors from union-level algebra.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PolytopeError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Volume(#[from] VolumeError),
}

#[cfg(test)]
mod tests;
