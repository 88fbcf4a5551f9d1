use super::*;
use crate::backend::{BackendError, ExactBackend};
use crate::types::{int_row, rational, Rational};

/// Axis-aligned box `[x0, x1] × [y0, y1]` with rational corners.
fn rect(x0: Rational, x1: Rational, y0: Rational, y1: Rational) -> ConvexPolytope {
    let one = Rational::from_integer(1.into());
    let zero = Rational::from_integer(0.into());
    ConvexPolytope::from_inequalities(vec![
        vec![-x0, one.clone(), zero.clone()],
        vec![x1, -one.clone(), zero.clone()],
        vec![-y0, zero.clone(), one.clone()],
        vec![y1, zero, -one],
    ])
}

fn unit_square_at(x: i64, y: i64) -> ConvexPolytope {
    rect(
        rational(x, 1),
        rational(x + 1, 1),
        rational(y, 1),
        rational(y + 1, 1),
    )
}

fn vol2(n: i64, d: i64) -> PolytopeVolume {
    PolytopeVolume::new(2, rational(n, d))
}

#[test]
fn empty_convex_body_measures_zero() {
    let empty = ConvexPolytope::from_inequalities(vec![int_row(&[-1, 1]), int_row(&[0, -1])]);
    assert_eq!(empty.volume(&ExactBackend).unwrap(), &PolytopeVolume::zero());
    assert!(empty.vertices(&ExactBackend).unwrap().is_empty());
    assert!(empty.triangulation(&ExactBackend).unwrap().is_empty());
    assert_eq!(
        empty.reduce(&ExactBackend),
        Err(BackendError::NoFeasibleSolutions)
    );
}

#[test]
fn non_infeasibility_failures_propagate() {
    let ragged = ConvexPolytope::from_inequalities(vec![int_row(&[0, 1]), int_row(&[1, 0, -1])]);
    assert!(matches!(
        ragged.volume(&ExactBackend),
        Err(BackendError::DimensionMismatch { .. })
    ));
    let union = Polytope::new(vec![ragged]);
    assert!(matches!(
        union.volume(&ExactBackend),
        Err(PolytopeError::Backend(BackendError::DimensionMismatch { .. }))
    ));
}

#[test]
fn reduce_propagates_non_infeasibility_failures() {
    let ragged = ConvexPolytope::from_inequalities(vec![int_row(&[0, 1, 0]), int_row(&[1, -1])]);
    let union = Polytope::new(vec![unit_square_at(0, 0), ragged]);
    assert!(matches!(
        union.reduce(&ExactBackend),
        Err(PolytopeError::Backend(BackendError::DimensionMismatch { .. }))
    ));
}

#[test]
fn convex_intersection_concatenates_constraints() {
    let a = unit_square_at(0, 0);
    let b = unit_square_at(1, 0);
    let cap = a.intersect(&b);
    assert_eq!(cap.inequalities().len(), 8);
    assert_eq!(&cap.inequalities()[..4], a.inequalities());
    // shared edge x = 1
    assert_eq!(
        cap.vertices(&ExactBackend).unwrap(),
        &[int_row(&[1, 0]), int_row(&[1, 1])]
    );
    assert_eq!(cap.triangulation(&ExactBackend).unwrap().len(), 1);
}

#[test]
fn convex_containment() {
    let small = unit_square_at(0, 0);
    let big = rect(rational(0, 1), rational(2, 1), rational(0, 1), rational(2, 1));
    assert!(big.contains(&small, &ExactBackend).unwrap());
    assert!(!small.contains(&big, &ExactBackend).unwrap());
    assert!(small.contains(&small, &ExactBackend).unwrap());
}

#[test]
fn point_membership_is_exact() {
    let square = Polytope::from(unit_square_at(0, 0));
    assert!(square.has_element(&[rational(1, 2), rational(1, 1)]));
    assert!(!square.has_element(&[rational(1, 2), rational(1000001, 1000000)]));
    // wrong arity is never inside, even when the common prefix fits
    assert!(!square.has_element(&[rational(1, 2)]));
    assert!(!square.has_element(&[rational(1, 2), rational(1, 2), rational(99, 1)]));
}

#[test]
fn disjoint_union_volume_is_sum() {
    let a = unit_square_at(0, 0);
    let b = unit_square_at(2, 0);
    let union = Polytope::new(vec![a.clone(), b.clone()]);
    let expected = a.volume(&ExactBackend).unwrap().clone() + b.volume(&ExactBackend).unwrap().clone();
    assert_eq!(union.volume(&ExactBackend).unwrap(), &expected);
    assert_eq!(expected, vol2(2, 1));
}

#[test]
fn edge_sharing_union_volume_is_sum() {
    // the shared edge is one-dimensional and must not be charged
    let union = Polytope::new(vec![unit_square_at(0, 0), unit_square_at(1, 0)]);
    assert_eq!(union.volume(&ExactBackend).unwrap(), &vol2(2, 1));
}

#[test]
fn overlapping_union_uses_inclusion_exclusion() {
    let a = unit_square_at(0, 0);
    let b = rect(rational(1, 2), rational(3, 2), rational(0, 1), rational(1, 1));
    let union = Polytope::new(vec![a, b]);
    assert_eq!(union.volume(&ExactBackend).unwrap(), &vol2(3, 2));
}

#[test]
fn nested_union_volume_is_outer_volume() {
    let inner = unit_square_at(0, 0);
    let outer = rect(rational(0, 1), rational(2, 1), rational(0, 1), rational(2, 1));
    let union = Polytope::new(vec![inner.clone(), outer.clone()]);
    assert_eq!(union.volume(&ExactBackend).unwrap(), &vol2(4, 1));
    let union = Polytope::new(vec![outer, inner]);
    assert_eq!(union.volume(&ExactBackend).unwrap(), &vol2(4, 1));
}

#[test]
fn triple_overlap_volume() {
    // three unit squares shifted by 1/2 along x: union is [0, 2] × [0, 1]
    let pieces = (0..3)
        .map(|i| rect(rational(i, 2), rational(i + 2, 2), rational(0, 1), rational(1, 1)))
        .collect();
    let union = Polytope::new(pieces);
    assert_eq!(union.volume(&ExactBackend).unwrap(), &vol2(2, 1));
}

#[test]
fn many_disjoint_components_only_measure_pairs() {
    // pairwise intersections are empty, so every larger subset is pruned
    let squares = (0..16).map(|i| unit_square_at(2 * i, 0)).collect();
    let union = Polytope::new(squares);
    assert_eq!(union.volume(&ExactBackend).unwrap(), &vol2(16, 1));
}

#[test]
fn empty_union_has_zero_volume() {
    assert_eq!(
        Polytope::empty().volume(&ExactBackend).unwrap(),
        &PolytopeVolume::zero()
    );
}

#[test]
fn union_and_intersect_shapes() {
    let a = Polytope::new(vec![unit_square_at(0, 0), unit_square_at(2, 0)]);
    let b = Polytope::new(vec![
        unit_square_at(0, 0),
        unit_square_at(5, 5),
        unit_square_at(9, 9),
    ]);
    assert_eq!(a.union(&b).convex_subpolytopes().len(), 5);
    let cap = a.intersect(&b);
    assert_eq!(cap.convex_subpolytopes().len(), 6);
    assert_eq!(cap.convex_subpolytopes()[0], unit_square_at(0, 0).intersect(&unit_square_at(0, 0)));
    assert_eq!(cap.volume(&ExactBackend).unwrap(), &vol2(1, 1));
    assert_eq!(a.vertices(&ExactBackend).unwrap().len(), 2);
}

#[test]
fn containment_is_consistent_with_inclusion() {
    let small = Polytope::from(unit_square_at(0, 0));
    let big = Polytope::convex(
        vec![
            int_row(&[0, 1, 0]),
            int_row(&[2, -1, 0]),
            int_row(&[0, 0, 1]),
            int_row(&[2, 0, -1]),
        ],
        Vec::new(),
    );
    assert!(big.contains(&small, &ExactBackend).unwrap());
    assert!(!small.contains(&big, &ExactBackend).unwrap());
    assert!(small.contains(&small, &ExactBackend).unwrap());
    assert!(big.contains(&big, &ExactBackend).unwrap());
}

#[test]
fn union_covers_a_straddling_square() {
    let cover = Polytope::new(vec![unit_square_at(0, 0), unit_square_at(1, 0)]);
    let straddle = Polytope::from(rect(
        rational(1, 2),
        rational(3, 2),
        rational(0, 1),
        rational(1, 1),
    ));
    assert!(cover.contains(&straddle, &ExactBackend).unwrap());
    // vertices all present but a hole in the middle: the volume phase decides
    let gappy = Polytope::new(vec![
        rect(rational(0, 1), rational(2, 1), rational(0, 1), rational(1, 3)),
        rect(rational(0, 1), rational(2, 1), rational(2, 3), rational(1, 1)),
        rect(rational(0, 1), rational(1, 3), rational(0, 1), rational(1, 1)),
        rect(rational(5, 3), rational(2, 1), rational(0, 1), rational(1, 1)),
    ]);
    let full = Polytope::from(rect(rational(0, 1), rational(2, 1), rational(0, 1), rational(1, 1)));
    assert!(!gappy.contains(&full, &ExactBackend).unwrap());
    assert!(full.contains(&gappy, &ExactBackend).unwrap());
}

#[test]
fn trim_removes_covered_candidate() {
    let a = Polytope::from(unit_square_at(0, 0));
    let b = Polytope::from(unit_square_at(1, 0));
    let c = Polytope::from(rect(
        rational(1, 2),
        rational(3, 2),
        rational(0, 1),
        rational(1, 1),
    ));
    let kept = trim_polytope_set(vec![a.clone(), b.clone(), c], None, &ExactBackend).unwrap();
    assert_eq!(kept, vec![a, b]);
}

#[test]
fn trim_orders_by_volume_and_respects_context() {
    let small = Polytope::from(unit_square_at(5, 5));
    let big = Polytope::from(rect(rational(0, 1), rational(2, 1), rational(0, 1), rational(2, 1)));
    let kept = trim_polytope_set(vec![small.clone(), big.clone()], None, &ExactBackend).unwrap();
    assert_eq!(kept, vec![big.clone(), small.clone()]);

    // the context covers `small`; the context itself is never returned
    let context = [Polytope::from(unit_square_at(5, 5))];
    let kept = trim_polytope_set(
        vec![small, big.clone()],
        Some(&context[..]),
        &ExactBackend,
    )
    .unwrap();
    assert_eq!(kept, vec![big]);
}

#[test]
fn trim_is_idempotent() {
    let candidates = vec![
        Polytope::from(unit_square_at(0, 0)),
        Polytope::from(rect(rational(1, 2), rational(3, 2), rational(0, 1), rational(1, 1))),
        Polytope::from(unit_square_at(1, 0)),
        Polytope::from(rect(rational(0, 1), rational(2, 1), rational(0, 1), rational(1, 2))),
        Polytope::from(unit_square_at(3, 3)),
    ];
    let once = trim_polytope_set(candidates, None, &ExactBackend).unwrap();
    let twice = trim_polytope_set(once.clone(), None, &ExactBackend).unwrap();
    assert_eq!(once, twice);
    assert!(once.len() < 5);
}

#[test]
fn reduce_drops_empty_and_covered_components() {
    let square = unit_square_at(0, 0);
    let mut slack_rows = square.inequalities().to_vec();
    slack_rows.push(int_row(&[5, -1, -1]));
    let padded = ConvexPolytope::from_inequalities(slack_rows);
    let empty = ConvexPolytope::from_inequalities(vec![int_row(&[-3, 1, 0]), int_row(&[1, -1, 0])]);
    let inner = rect(rational(1, 4), rational(3, 4), rational(1, 4), rational(3, 4));

    let union = Polytope::new(vec![padded, empty, inner]);
    let reduced = union.reduce(&ExactBackend).unwrap();
    assert_eq!(reduced.convex_subpolytopes(), &[square]);
    assert_eq!(reduced.volume(&ExactBackend).unwrap(), &vol2(1, 1));
}

#[test]
fn display_lists_constraints() {
    let cp = ConvexPolytope::new(vec![int_row(&[1, -1])], vec![int_row(&[0, 2])]);
    let text = cp.to_string();
    assert_eq!(text, "    1 +    -1 x1 >= 0\n    0 +     2 x1 == 0\n");
    let union = Polytope::new(vec![cp.clone(), cp]);
    let shown = union.to_string();
    assert!(shown.starts_with("[\n"));
    assert!(shown.ends_with("]"));
    assert_eq!(shown.matches(">= 0").count(), 2);
}
