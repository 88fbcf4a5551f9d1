//! Finite unions of convex bodies: inclusion–exclusion volume, reduction,
//! and containment.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use super::convex::{memo, ConvexPolytope};
use super::trim::trim_polytope_set;
use super::volume::PolytopeVolume;
use super::PolytopeError;
use crate::backend::{BackendError, GeometryBackend};
use crate::bits::bit_iteration;
use crate::types::{Constraint, Point, Rational};

/// Union of convex bodies; possibly non-convex.
///
/// Invariants:
/// - Component order is kept for display and deterministic trimming; volume
///   and containment do not depend on it.
/// - `union`/`intersect`/`reduce` build fresh instances with empty caches.
#[derive(Clone, Debug, Default)]
pub struct Polytope {
    convex_subpolytopes: Vec<ConvexPolytope>,
    volume: OnceLock<PolytopeVolume>,
    vertices: OnceLock<Vec<Vec<Point>>>,
}

impl Polytope {
    pub fn new(convex_subpolytopes: Vec<ConvexPolytope>) -> Self {
        Self {
            convex_subpolytopes,
            ..Self::default()
        }
    }

    /// Empty union (covers nothing).
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-component polytope.
    pub fn convex(inequalities: Vec<Constraint>, equalities: Vec<Constraint>) -> Self {
        Self::new(vec![ConvexPolytope::new(inequalities, equalities)])
    }

    #[inline]
    pub fn convex_subpolytopes(&self) -> &[ConvexPolytope] {
        &self.convex_subpolytopes
    }

    #[inline]
    pub fn into_convex_subpolytopes(self) -> Vec<ConvexPolytope> {
        self.convex_subpolytopes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.convex_subpolytopes.is_empty()
    }

    /// Measure of the union by inclusion–exclusion over component subsets.
    ///
    /// Subset `s` (bit `i` ⇔ component `i`) contributes `(-1)^(|s|-1)·vol(∩s)`.
    /// Two prunings keep this far below `2^n` backend calls:
    /// - a subset whose intersection drops below the top dimension becomes a
    ///   skip mask; every superset of a skip mask is ignored.
    /// - when a subset's volume equals that of a still-live parent (one bit
    ///   removed), the parent is skipped and the child is folded in right
    ///   away; at most one parent is folded per child.
    pub fn volume<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<&PolytopeVolume, PolytopeError> {
        memo(&self.volume, || self.inclusion_exclusion(backend))
    }

    fn inclusion_exclusion<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<PolytopeVolume, PolytopeError> {
        let n = self.convex_subpolytopes.len();
        let mut volume = PolytopeVolume::zero();
        let mut top_dimension = 0;
        for convex_subpolytope in &self.convex_subpolytopes {
            top_dimension = top_dimension.max(convex_subpolytope.volume(backend)?.dimension);
        }

        let mut skip_masks: Vec<usize> = Vec::new();
        // only subsets that were actually measured; most masks get pruned
        let mut previous_volumes: HashMap<usize, PolytopeVolume> = HashMap::new();
        let skipped = |masks: &[usize], bitstring: usize| masks.iter().any(|&m| m & bitstring == m);

        for d in 0..n {
            for bitstring in bit_iteration(n, d + 1) {
                if skipped(&skip_masks, bitstring) {
                    continue;
                }
                let intersection = self.intersection_of(bitstring);
                let this_volume = intersection.volume(backend)?.clone();

                if this_volume.dimension < top_dimension {
                    skip_masks.push(bitstring);
                }

                for parent_index in 0..n {
                    let bit = 1usize << parent_index;
                    if bitstring & bit == 0 {
                        continue;
                    }
                    let parent = bitstring ^ bit;
                    if !skip_masks.contains(&parent)
                        && previous_volumes.get(&parent) == Some(&this_volume)
                    {
                        skip_masks.push(parent);
                        volume = signed_accumulate(volume, &this_volume, d)?;
                        break;
                    }
                }
                previous_volumes.insert(bitstring, this_volume);
            }

            for bitstring in bit_iteration(n, d + 1) {
                let Some(this_volume) = previous_volumes.get(&bitstring) else {
                    continue;
                };
                if skipped(&skip_masks, bitstring) {
                    continue;
                }
                volume = signed_accumulate(volume, this_volume, d)?;
            }
        }
        Ok(volume)
    }

    fn intersection_of(&self, bitstring: usize) -> ConvexPolytope {
        let mut intersection = ConvexPolytope::default();
        for (index, convex_subpolytope) in self.convex_subpolytopes.iter().enumerate() {
            if bitstring & (1 << index) != 0 {
                intersection = intersection.intersect(convex_subpolytope);
            }
        }
        intersection
    }

    /// Vertex set of each component (no union hull).
    pub fn vertices<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<&[Vec<Point>], BackendError> {
        memo(&self.vertices, || {
            self.convex_subpolytopes
                .iter()
                .map(|cp| cp.vertices(backend).map(<[Point]>::to_vec))
                .collect()
        })
        .map(Vec::as_slice)
    }

    /// Drop redundant constraints per component, then components covered by
    /// the others. Empty components vanish silently.
    pub fn reduce<B: GeometryBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<Polytope, PolytopeError> {
        let mut independent_polytopes = Vec::with_capacity(self.convex_subpolytopes.len());
        for convex_subpolytope in &self.convex_subpolytopes {
            match convex_subpolytope.reduce(backend) {
                Ok(reduced) => independent_polytopes.push(Polytope::new(vec![reduced])),
                Err(BackendError::NoFeasibleSolutions) => {}
                Err(e) => return Err(e.into()),
            }
        }
        let survivors = trim_polytope_set(independent_polytopes, None, backend)?;
        Ok(Polytope::new(
            survivors
                .into_iter()
                .flat_map(Polytope::into_convex_subpolytopes)
                .collect(),
        ))
    }

    /// `self ∪ other`.
    pub fn union(&self, other: &Polytope) -> Polytope {
        Polytope::new(
            self.convex_subpolytopes
                .iter()
                .chain(&other.convex_subpolytopes)
                .cloned()
                .collect(),
        )
    }

    /// `self ∩ other`, distributed over the unions (`|self|·|other|` components).
    pub fn intersect(&self, other: &Polytope) -> Polytope {
        let mut convex_subpolytopes =
            Vec::with_capacity(self.convex_subpolytopes.len() * other.convex_subpolytopes.len());
        for left in &self.convex_subpolytopes {
            for right in &other.convex_subpolytopes {
                convex_subpolytopes.push(left.intersect(right));
            }
        }
        Polytope::new(convex_subpolytopes)
    }

    /// True when `other ⊆ self`.
    ///
    /// With `n` components here and `m` in `other`, the volumes below cost up
    /// to `2^m + 2^(nm)` backend calls while the vertex test costs `m + nm`.
    /// Vertex containment is necessary but not sufficient, so it runs first as
    /// a filter and the volume comparison decides.
    pub fn contains<B: GeometryBackend + ?Sized>(
        &self,
        other: &Polytope,
        backend: &B,
    ) -> Result<bool, PolytopeError> {
        let intersection = other.intersect(self);

        let little_vertices = other.vertices(backend)?;
        let cap_vertices = intersection.vertices(backend)?;
        for vertex in little_vertices.iter().flatten() {
            if !cap_vertices.iter().any(|cap| cap.contains(vertex)) {
                return Ok(false);
            }
        }

        Ok(intersection.volume(backend)? == other.volume(backend)?)
    }

    /// Exact point membership in any component.
    pub fn has_element(&self, point: &[Rational]) -> bool {
        self.convex_subpolytopes
            .iter()
            .any(|cp| cp.has_element(point))
    }
}

/// `volume ± term`, plus for odd-sized subsets (`d` even), minus otherwise.
fn signed_accumulate(
    volume: PolytopeVolume,
    term: &PolytopeVolume,
    d: usize,
) -> Result<PolytopeVolume, PolytopeError> {
    if d % 2 == 1 {
        Ok(volume.checked_sub(term)?)
    } else {
        Ok(volume + term.clone())
    }
}

impl PartialEq for Polytope {
    fn eq(&self, other: &Self) -> bool {
        self.convex_subpolytopes == other.convex_subpolytopes
    }
}

impl Eq for Polytope {}

impl From<ConvexPolytope> for Polytope {
    fn from(convex: ConvexPolytope) -> Self {
        Polytope::new(vec![convex])
    }
}

impl fmt::Display for Polytope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for (index, item) in self.convex_subpolytopes.iter().enumerate() {
            write!(f, "{item}")?;
            if 1 + index < self.convex_subpolytopes.len() {
                write!(f, ",")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
