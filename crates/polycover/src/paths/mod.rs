//! Backward path decomposition through a coverage set.
//!
//! Purpose
//! - Given a target point and a catalog of cost-tagged regions (each reachable
//!   from the origin by an ordered list of operations), recover a concrete
//!   chain `origin → … → target` with one operation per step.
//!
//! Model
//! - The cheapest catalog entry containing the target fixes the operation
//!   list. Each hop strips one operation: the lifted catalog holds, per
//!   operation list, regions over `(source, target)` coordinates; fixing the
//!   target leaves a region over the source, and any vertex of it is a valid
//!   predecessor.
//! - Operations may be freely permuted, so ancestors match by multiset.
//!
//! Failure and retries
//! - Vertex extraction is lightly randomized and, with inexact backends, may
//!   miss a feasible region. `decompose` fails fast with `NoBacksolution`;
//!   callers decide whether to retry with a fresh RNG.
//!
//! Code cross-refs: `crate::polytope::Polytope`, `crate::backend::GeometryBackend`.

mod search;
mod types;

pub use search::{backsolution, decompose, decompose_with_defaults, decomposition_hop, is_chain};
pub use types::{CircuitPolytope, DecomposeCfg, Hop, HopStep, PathError};
