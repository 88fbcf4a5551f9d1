//! Exact polytope algebra and backward path decomposition.
//!
//! Layers
//! - `types`, `bits`: rational rows/points and subset enumeration.
//! - `backend`: the `GeometryBackend` contract (H→V, volume, triangulation,
//!   reduction, vertex extraction) and the exact reference implementation.
//! - `polytope`: convex bodies, finite unions, inclusion–exclusion volume,
//!   containment and redundancy trimming.
//! - `paths`: cheapest-cover selection and the backward hop search over
//!   lifted coverage sets.
//! - `data`: serde records for catalogs on disk.
//!
//! API Policy
//! - Internal crate, no stable public API; prefer clearer design over
//!   compatibility.

pub mod backend;
pub mod bits;
pub mod data;
pub mod paths;
pub mod polytope;
pub mod types;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use backend::{BackendError, ExactBackend, GeometryBackend};
pub use polytope::{ConvexPolytope, Polytope, PolytopeVolume};
pub use types::{Constraint, Point, Rational};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::backend::{BackendError, ExactBackend, GeometryBackend};
    pub use crate::paths::{
        decompose, decompose_with_defaults, CircuitPolytope, DecomposeCfg, Hop, PathError,
    };
    pub use crate::polytope::{
        trim_polytope_set, ConvexPolytope, Polytope, PolytopeError, PolytopeVolume,
    };
    pub use crate::types::{rational, Constraint, Point, Rational};
}
