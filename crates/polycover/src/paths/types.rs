//! Data types for the decomposition search.

use thiserror::Error;

use crate::backend::BackendError;
use crate::polytope::Polytope;
use crate::types::Point;

/// Coverage-set entry: a region reachable by `operations`, at `cost`.
#[derive(Clone, Debug)]
pub struct CircuitPolytope<Op> {
    pub polytope: Polytope,
    pub operations: Vec<Op>,
    pub cost: f64,
}

impl<Op> CircuitPolytope<Op> {
    pub fn new(polytope: Polytope, operations: Vec<Op>, cost: f64) -> Self {
        Self {
            polytope,
            operations,
            cost,
        }
    }
}

/// One step `source --operation--> target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hop<Op> {
    pub source: Point,
    pub operation: Op,
    pub target: Point,
}

/// Result of a single backward hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HopStep<Op> {
    pub hop: Hop<Op>,
    /// Source of `hop`; the next hop's target.
    pub ancestor: Point,
    /// Operations still to strip after this hop.
    pub operations_remaining: Vec<Op>,
}

/// Search configuration.
#[derive(Clone, Copy, Debug)]
pub struct DecomposeCfg {
    /// Number of source coordinates leading each lifted constraint row
    /// (after the constant term); the remaining entries multiply the target.
    pub free_coordinates: usize,
}

impl Default for DecomposeCfg {
    fn default() -> Self {
        Self {
            free_coordinates: 3,
        }
    }
}

/// Errors surfaced by the decomposition search.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// No coverage-set entry contains the target.
    #[error("{target} not contained in coverage set")]
    UnreachableTarget { target: String },
    /// No lifted ancestor produced a feasible predecessor.
    #[error("no backsolution with {remaining} operation(s) remaining")]
    NoBacksolution { remaining: usize },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PathError {
    /// Whether a fresh attempt (new randomness) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PathError::NoBacksolution { .. })
    }
}
