//! Redundancy trimming for families of polytopes.

use super::union::Polytope;
use super::PolytopeError;
use crate::backend::GeometryBackend;

/// Drop every candidate that lies in the union of the remaining candidates
/// together with the `fixed_polytopes` context (which is never trimmed).
///
/// Candidates are stably sorted by volume, largest first, then tested from the
/// smallest upward so small pieces are checked against big ones first. The
/// survivors keep their post-sort order.
///
/// Containment in a non-convex union is the expensive part here; every test
/// builds a fresh union of all other candidates.
pub fn trim_polytope_set<B: GeometryBackend + ?Sized>(
    trimmable_polytopes: Vec<Polytope>,
    fixed_polytopes: Option<&[Polytope]>,
    backend: &B,
) -> Result<Vec<Polytope>, PolytopeError> {
    let mut fixed_polytope = Polytope::empty();
    for polytope in fixed_polytopes.unwrap_or_default() {
        fixed_polytope = fixed_polytope.union(polytope);
    }

    let mut keyed = Vec::with_capacity(trimmable_polytopes.len());
    for polytope in trimmable_polytopes {
        let volume = polytope.volume(backend)?.clone();
        keyed.push((volume, polytope));
    }
    // stable: equal volumes keep their input order
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    let mut trimmable: Vec<Polytope> = keyed.into_iter().map(|(_, p)| p).collect();

    for index in (0..trimmable.len()).rev() {
        let mut other_polytope = fixed_polytope.clone();
        for (subindex, polytope) in trimmable.iter().enumerate() {
            if subindex != index {
                other_polytope = other_polytope.union(polytope);
            }
        }
        if other_polytope.contains(&trimmable[index], backend)? {
            tracing::trace!(index, "trimmed redundant polytope");
            trimmable.remove(index);
        }
    }
    Ok(trimmable)
}
