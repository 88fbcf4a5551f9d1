//! Cheapest-cover selection and backward hops.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::RngCore;

use super::types::{CircuitPolytope, DecomposeCfg, Hop, HopStep, PathError};
use crate::backend::{BackendError, ExactBackend, GeometryBackend};
use crate::polytope::ConvexPolytope;
use crate::types::{Constraint, Rational};

/// Decompose `target` into a hop chain starting at the origin.
///
/// Returns hops in application order: the first source is the origin, each
/// target is the next source, and the last target is `target`.
pub fn decompose<Op, B, R>(
    target: &[Rational],
    coverage_set: &[CircuitPolytope<Op>],
    lifted_coverage_set: &[CircuitPolytope<Op>],
    backend: &B,
    rng: &mut R,
    cfg: DecomposeCfg,
) -> Result<Vec<Hop<Op>>, PathError>
where
    Op: Clone + Eq + Hash + Debug,
    B: GeometryBackend + ?Sized,
    R: RngCore,
{
    for entry in coverage_set {
        for cp in entry.polytope.convex_subpolytopes() {
            check_arity(cp, 0, target.len())?;
        }
    }

    let mut working_polytope = None;
    let mut best_cost = f64::INFINITY;
    for polytope in coverage_set {
        if polytope.cost < best_cost && polytope.polytope.has_element(target) {
            working_polytope = Some(polytope);
            best_cost = polytope.cost;
        }
    }
    let Some(working_polytope) = working_polytope else {
        return Err(PathError::UnreachableTarget {
            target: format_point(target),
        });
    };
    tracing::debug!(
        cost = working_polytope.cost,
        operations = ?working_polytope.operations,
        "selected covering polytope"
    );

    let mut target = target.to_vec();
    let mut operations_remaining = working_polytope.operations.clone();
    let mut decomposition = VecDeque::with_capacity(operations_remaining.len());
    while !operations_remaining.is_empty() {
        let step = decomposition_hop(
            &target,
            &operations_remaining,
            lifted_coverage_set,
            backend,
            rng,
            cfg,
        )?;
        target = step.ancestor;
        operations_remaining = step.operations_remaining;
        decomposition.push_front(step.hop);
    }
    Ok(decomposition.into())
}

/// `decompose` with the exact backend and default configuration.
pub fn decompose_with_defaults<Op, R>(
    target: &[Rational],
    coverage_set: &[CircuitPolytope<Op>],
    lifted_coverage_set: &[CircuitPolytope<Op>],
    rng: &mut R,
) -> Result<Vec<Hop<Op>>, PathError>
where
    Op: Clone + Eq + Hash + Debug,
    R: RngCore,
{
    decompose(
        target,
        coverage_set,
        lifted_coverage_set,
        &ExactBackend,
        rng,
        DecomposeCfg::default(),
    )
}

/// Strip one operation off `working_operations`, moving `target` to a predecessor.
///
/// Ancestors are lifted entries whose operations equal `working_operations`
/// as a multiset; the hop uses the ancestor's last operation. Empty
/// backsolution pieces are skipped, any other backend failure aborts.
pub fn decomposition_hop<Op, B, R>(
    target: &[Rational],
    working_operations: &[Op],
    lifted_coverage_set: &[CircuitPolytope<Op>],
    backend: &B,
    rng: &mut R,
    cfg: DecomposeCfg,
) -> Result<HopStep<Op>, PathError>
where
    Op: Clone + Eq + Hash + Debug,
    B: GeometryBackend + ?Sized,
    R: RngCore,
{
    let wanted = multiset(working_operations);
    for ancestor in lifted_coverage_set {
        if multiset(&ancestor.operations) != wanted {
            continue;
        }
        let Some((last, rest)) = ancestor.operations.split_last() else {
            continue;
        };
        let mut pieces = ancestor
            .polytope
            .convex_subpolytopes()
            .iter()
            .map(|cp| backsolution(cp, target, cfg.free_coordinates))
            .collect::<Result<Vec<_>, _>>()?;
        pieces.shuffle(rng);
        for piece in &pieces {
            match backend.extract_one_vertex(piece, rng) {
                Ok(solution) => {
                    tracing::debug!(operation = ?last, remaining = rest.len(), "hop");
                    return Ok(HopStep {
                        hop: Hop {
                            source: solution.clone(),
                            operation: last.clone(),
                            target: target.to_vec(),
                        },
                        ancestor: solution,
                        operations_remaining: rest.to_vec(),
                    });
                }
                Err(BackendError::NoFeasibleSolutions) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
    Err(PathError::NoBacksolution {
        remaining: working_operations.len(),
    })
}

/// Fix the target coordinates of a lifted region.
///
/// A row `[c0, c1..ck, d1..dm]` over `(source, target)` becomes
/// `[c0 + Σ di·ti, c1..ck]` over the source alone, `k = free_coordinates`.
/// Rows must carry exactly `m = target.len()` target coefficients.
pub fn backsolution(
    lifted: &ConvexPolytope,
    target: &[Rational],
    free_coordinates: usize,
) -> Result<ConvexPolytope, BackendError> {
    check_arity(lifted, free_coordinates, target.len())?;
    let fold = |row: &Constraint| -> Constraint {
        let mut out: Constraint = row.iter().take(free_coordinates + 1).cloned().collect();
        if let Some(c0) = out.first_mut() {
            for (d, t) in row.iter().skip(free_coordinates + 1).zip(target) {
                *c0 += d * t;
            }
        }
        out
    };
    Ok(ConvexPolytope::new(
        lifted.inequalities().iter().map(&fold).collect(),
        lifted.equalities().iter().map(&fold).collect(),
    ))
}

/// Every row of `cp` is `[c0, leading.., point..]` for a point of `arity` coordinates.
fn check_arity(cp: &ConvexPolytope, leading: usize, arity: usize) -> Result<(), BackendError> {
    let expected = 1 + leading + arity;
    match cp
        .inequalities()
        .iter()
        .chain(cp.equalities())
        .find(|row| row.len() != expected)
    {
        Some(row) => Err(BackendError::DimensionMismatch {
            expected,
            found: row.len(),
        }),
        None => Ok(()),
    }
}

/// Consecutive hops share endpoints.
pub fn is_chain<Op>(hops: &[Hop<Op>]) -> bool {
    hops.windows(2).all(|w| w[0].target == w[1].source)
}

fn multiset<Op: Eq + Hash>(operations: &[Op]) -> HashMap<&Op, usize> {
    let mut counts = HashMap::new();
    for op in operations {
        *counts.entry(op).or_insert(0) += 1;
    }
    counts
}

fn format_point(point: &[Rational]) -> String {
    let coords: Vec<String> = point.iter().map(ToString::to_string).collect();
    format!("({})", coords.join(", "))
}
