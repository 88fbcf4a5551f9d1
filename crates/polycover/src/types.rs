//! Scalar and vector aliases shared by every module.
//!
//! Conventions
//! - All coordinates and coefficients are exact `BigRational`s; there is no
//!   tolerance anywhere in the crate.
//! - A `Constraint` `[c0, c1, …, cn]` reads `c0 + Σ ci·xi ≥ 0` when listed as an
//!   inequality and `= 0` when listed as an equality.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

/// Exact scalar type.
pub type Rational = BigRational;
/// Rational coordinate vector.
pub type Point = Vec<Rational>;
/// Constant term followed by one coefficient per coordinate.
pub type Constraint = Vec<Rational>;
/// Simplex given by indices into a vertex list.
pub type Simplex = Vec<usize>;

/// `numer / denom` as an exact rational. Panics on a zero denominator.
#[inline]
pub fn rational(numer: i64, denom: i64) -> Rational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Integer row lifted to rationals; handy for writing constraints inline.
pub fn int_row(values: &[i64]) -> Vec<Rational> {
    values
        .iter()
        .map(|&v| BigRational::from_integer(BigInt::from(v)))
        .collect()
}

/// `c0 + Σ ci·xi`, pairing coefficients with coordinates up to the shorter length.
pub fn evaluate(constraint: &[Rational], point: &[Rational]) -> Rational {
    let mut acc = match constraint.first() {
        Some(c0) => c0.clone(),
        None => return Rational::zero(),
    };
    for (c, x) in constraint[1..].iter().zip(point) {
        acc += c * x;
    }
    acc
}
