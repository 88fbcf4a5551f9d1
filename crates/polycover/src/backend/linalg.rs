//! Exact linear algebra over `BigRational` (Gauss–Jordan, rank, determinants).
//!
//! Matrices are plain `Vec<Vec<Rational>>` rows; all helpers take ownership of
//! scratch copies so callers keep their inputs intact.

use num_traits::{One, Zero};

use crate::types::{Point, Rational};

/// Reduced row-echelon form in place; returns the pivot column of each
/// surviving row (rows below the rank are zero afterwards).
pub(crate) fn row_reduce(rows: &mut [Vec<Rational>], cols: usize) -> Vec<usize> {
    let mut pivots = Vec::new();
    let mut r = 0;
    for c in 0..cols {
        if r == rows.len() {
            break;
        }
        let Some(p) = (r..rows.len()).find(|&i| !rows[i][c].is_zero()) else {
            continue;
        };
        rows.swap(r, p);
        let inv = rows[r][c].recip();
        for x in rows[r].iter_mut() {
            *x *= &inv;
        }
        let pivot_row = rows[r].clone();
        for (i, row) in rows.iter_mut().enumerate() {
            if i == r || row[c].is_zero() {
                continue;
            }
            let factor = row[c].clone();
            for (x, p) in row.iter_mut().zip(&pivot_row) {
                *x -= &factor * p;
            }
        }
        pivots.push(c);
        r += 1;
    }
    pivots
}

/// Rank of the given rows (first `cols` entries of each row).
pub(crate) fn rank(rows: &[Vec<Rational>], cols: usize) -> usize {
    let mut scratch: Vec<Vec<Rational>> = rows.iter().map(|r| r[..cols].to_vec()).collect();
    row_reduce(&mut scratch, cols).len()
}

/// Unique solution of `c0 + Σ ci·xi = 0` over all `rows` (each of length `n + 1`).
///
/// Returns `None` when the system is inconsistent or under-determined.
pub(crate) fn solve_affine(rows: &[&[Rational]], n: usize) -> Option<Point> {
    // Augmented matrix [c1..cn | -c0].
    let mut aug: Vec<Vec<Rational>> = rows
        .iter()
        .map(|row| {
            let mut out: Vec<Rational> = row[1..=n].to_vec();
            out.push(-row[0].clone());
            out
        })
        .collect();
    let pivots = row_reduce(&mut aug, n + 1);
    if pivots.last() == Some(&n) {
        // pivot in the constant column: 0 = nonzero
        return None;
    }
    if pivots.len() != n {
        return None;
    }
    Some(aug.iter().take(n).map(|row| row[n].clone()).collect())
}

/// Determinant by elimination.
pub(crate) fn determinant(mut m: Vec<Vec<Rational>>) -> Rational {
    let n = m.len();
    let mut det = Rational::one();
    for c in 0..n {
        let Some(p) = (c..n).find(|&i| !m[i][c].is_zero()) else {
            return Rational::zero();
        };
        if p != c {
            m.swap(p, c);
            det = -det;
        }
        det *= &m[c][c];
        let pivot_row = m[c].clone();
        for row in m.iter_mut().skip(c + 1) {
            if row[c].is_zero() {
                continue;
            }
            let factor = &row[c] / &pivot_row[c];
            for (x, p) in row.iter_mut().zip(&pivot_row).skip(c) {
                *x -= &factor * p;
            }
        }
    }
    det
}

/// One basis vector of the nullspace of `rows` (width `cols`), if the
/// nullspace is exactly one-dimensional.
pub(crate) fn null_vector(rows: &[Vec<Rational>], cols: usize) -> Option<Vec<Rational>> {
    let mut scratch = rows.to_vec();
    let pivots = row_reduce(&mut scratch, cols);
    if pivots.len() + 1 != cols {
        return None;
    }
    let free = (0..cols).find(|c| !pivots.contains(c))?;
    let mut v = vec![Rational::zero(); cols];
    v[free] = Rational::one();
    for (row, &p) in scratch.iter().zip(&pivots) {
        v[p] = -row[free].clone();
    }
    Some(v)
}

/// Affine hull data of a point set: dimension and a set of coordinates on
/// which the projection is injective over the hull.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AffineHull {
    pub dimension: usize,
    pub coordinates: Vec<usize>,
}

pub(crate) fn affine_hull(points: &[&Point]) -> AffineHull {
    let Some((base, rest)) = points.split_first() else {
        return AffineHull {
            dimension: 0,
            coordinates: Vec::new(),
        };
    };
    let cols = base.len();
    let mut diffs: Vec<Vec<Rational>> = rest
        .iter()
        .map(|p| p.iter().zip(base.iter()).map(|(a, b)| a - b).collect())
        .collect();
    let coordinates = row_reduce(&mut diffs, cols);
    AffineHull {
        dimension: coordinates.len(),
        coordinates,
    }
}
