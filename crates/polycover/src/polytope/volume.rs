//! Dimension-tagged volumes and their partial algebra.

use std::fmt;
use std::ops::Add;

use num_traits::Zero;
use thiserror::Error;

use crate::types::Rational;

/// Volume of a (possibly not top-dimensional) region.
///
/// Ordering is lexicographic: dimension first, then magnitude, so any
/// positive-dimensional measure dominates every lower-dimensional one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolytopeVolume {
    pub dimension: usize,
    pub volume: Rational,
}

/// Misuse of the volume algebra.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VolumeError {
    #[error("illegal to subtract a {subtrahend}-dimensional volume from a {minuend}-dimensional source")]
    IllegalSubtraction { minuend: usize, subtrahend: usize },
}

impl PolytopeVolume {
    #[inline]
    pub fn new(dimension: usize, volume: Rational) -> Self {
        Self { dimension, volume }
    }

    /// `{dimension: 0, volume: 0}`, the measure reported for empty regions.
    #[inline]
    pub fn zero() -> Self {
        Self::new(0, Rational::zero())
    }

    /// `self - other`.
    ///
    /// A lower-dimensional subtrahend is negligible and leaves `self` as is;
    /// a higher-dimensional one is a contract violation.
    pub fn checked_sub(self, other: &Self) -> Result<Self, VolumeError> {
        if self.dimension > other.dimension {
            Ok(self)
        } else if self.dimension == other.dimension {
            Ok(Self::new(self.dimension, self.volume - &other.volume))
        } else {
            Err(VolumeError::IllegalSubtraction {
                minuend: self.dimension,
                subtrahend: other.dimension,
            })
        }
    }
}

impl Add for PolytopeVolume {
    type Output = PolytopeVolume;

    fn add(self, other: Self) -> Self {
        if self.dimension > other.dimension {
            self
        } else if self.dimension < other.dimension {
            other
        } else {
            Self::new(self.dimension, self.volume + other.volume)
        }
    }
}

impl fmt::Display for PolytopeVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (dim {})", self.volume, self.dimension)
    }
}
