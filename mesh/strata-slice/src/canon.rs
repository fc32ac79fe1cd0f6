//! Coordinate canonicalization.
//!
//! Every coordinate the slicer compares (interpolated x/y, layer heights,
//! vertex heights classified against a plane) goes through one
//! [`Canonicalizer`]. It maps a float to an integer key on a fixed grid;
//! points are equal iff their keys are equal, which keeps equality
//! transitive.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SliceError, SliceResult};
use crate::geometry::{Point, PointKey};

/// Largest supported decimal precision.
pub const MAX_DECIMALS: u32 = 15;

/// Exact powers of ten up to `10^MAX_DECIMALS`.
const POW10: [f64; 16] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
];

/// Keys stay exactly representable as `f64` below this magnitude.
const MAX_EXACT_KEY: f64 = 9_007_199_254_740_992.0; // 2^53

/// Quantization grid for coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    /// Round to `d` decimal places (unit `10^-d`).
    Decimals(u32),
    /// Round to multiples of an absolute unit.
    Epsilon(f64),
}

impl Default for Precision {
    fn default() -> Self {
        Self::Decimals(9)
    }
}

impl Precision {
    /// Size of one grid step.
    #[must_use]
    pub fn unit(&self) -> f64 {
        match *self {
            Self::Decimals(d) => 1.0 / POW10[d.min(MAX_DECIMALS) as usize],
            Self::Epsilon(e) => e,
        }
    }

    /// Check that the precision describes a usable grid.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidPrecision`] for more than
    /// [`MAX_DECIMALS`] decimals or a non-positive or non-finite epsilon.
    pub fn validate(&self) -> SliceResult<()> {
        match *self {
            Self::Decimals(d) if d > MAX_DECIMALS => Err(SliceError::InvalidPrecision(format!(
                "{d} decimals (maximum {MAX_DECIMALS})"
            ))),
            Self::Epsilon(e) if !(e.is_finite() && e > 0.0) => Err(SliceError::InvalidPrecision(
                format!("epsilon {e} (must be finite and > 0)"),
            )),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimals(d) => write!(f, "{d} decimals"),
            Self::Epsilon(e) => write!(f, "epsilon {e}"),
        }
    }
}

/// Maps coordinates onto the integer grid of a [`Precision`].
///
/// `key(v) = round(v * scale)` and `canon(v) = key(v) / scale`. With
/// decimal precision the scale is an exact power of ten, so `canon(0.3)` is
/// the same double as the literal `0.3`.
///
/// # Example
///
/// ```
/// use strata_slice::{Canonicalizer, Precision};
///
/// let canon = Canonicalizer::new(Precision::Decimals(3)).unwrap();
/// assert_eq!(canon.key(0.1 + 0.2), 300);
/// assert_eq!(canon.canon(0.1 + 0.2), 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canonicalizer {
    precision: Precision,
    scale: f64,
}

impl Canonicalizer {
    /// Create a canonicalizer for `precision`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidPrecision`] if the precision is invalid.
    pub fn new(precision: Precision) -> SliceResult<Self> {
        precision.validate()?;
        let scale = match precision {
            Precision::Decimals(d) => POW10[d as usize],
            Precision::Epsilon(e) => 1.0 / e,
        };
        Ok(Self { precision, scale })
    }

    /// The precision this canonicalizer was built from.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Grid steps per unit length.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Integer grid key of `v`.
    #[inline]
    #[must_use]
    pub fn key(&self, v: f64) -> i64 {
        (v * self.scale).round() as i64
    }

    /// Coordinate of a grid key.
    #[inline]
    #[must_use]
    pub fn value(&self, key: i64) -> f64 {
        match self.precision {
            Precision::Decimals(_) => key as f64 / self.scale,
            Precision::Epsilon(e) => key as f64 * e,
        }
    }

    /// Snap `v` to the nearest grid coordinate.
    #[inline]
    #[must_use]
    pub fn canon(&self, v: f64) -> f64 {
        self.value(self.key(v))
    }

    /// Whether `v` maps to a key that round-trips exactly.
    #[must_use]
    pub fn fits(&self, v: f64) -> bool {
        (v * self.scale).abs() < MAX_EXACT_KEY
    }

    /// Grid key of a 2-D coordinate.
    #[inline]
    #[must_use]
    pub fn point_key(&self, x: f64, y: f64) -> PointKey {
        PointKey(self.key(x), self.key(y))
    }

    /// Canonical point for a key.
    #[must_use]
    pub fn point(&self, key: PointKey) -> Point {
        Point {
            x: self.value(key.0),
            y: self.value(key.1),
        }
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            scale: POW10[9],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn decimal_canon_matches_literals() {
        let canon = Canonicalizer::new(Precision::Decimals(9)).unwrap();
        assert_eq!(canon.canon(0.1 + 0.2), 0.3);
        assert_eq!(canon.canon(3.0 * 0.1), 0.3);
        assert_eq!(canon.canon(-1.000_000_000_2), -1.0);
        assert_eq!(canon.key(0.5), 500_000_000);
    }

    #[test]
    fn canon_is_idempotent() {
        let canon = Canonicalizer::new(Precision::Decimals(4)).unwrap();
        for v in [0.0, 1.234_56, -7.777_77, 123.456_789, 1e-5] {
            let once = canon.canon(v);
            assert_eq!(canon.canon(once), once);
        }
    }

    #[test]
    fn nearby_values_share_a_key() {
        let canon = Canonicalizer::new(Precision::Decimals(3)).unwrap();
        assert_eq!(canon.key(2.0004), canon.key(1.9996));
        assert_ne!(canon.key(2.0006), canon.key(2.0004));
    }

    #[test]
    fn epsilon_grid() {
        let canon = Canonicalizer::new(Precision::Epsilon(0.25)).unwrap();
        assert_eq!(canon.key(1.1), 4);
        assert_eq!(canon.canon(1.1), 1.0);
        assert_eq!(canon.canon(1.2), 1.25);
        assert_eq!(canon.point(canon.point_key(0.9, -0.4)), Point { x: 1.0, y: -0.5 });
    }

    #[test]
    fn invalid_precisions() {
        assert!(Canonicalizer::new(Precision::Decimals(16)).is_err());
        assert!(Canonicalizer::new(Precision::Epsilon(0.0)).is_err());
        assert!(Canonicalizer::new(Precision::Epsilon(-1.0)).is_err());
        assert!(Canonicalizer::new(Precision::Epsilon(f64::NAN)).is_err());
        assert!(Canonicalizer::new(Precision::Decimals(15)).is_ok());
    }

    #[test]
    fn range_check() {
        let canon = Canonicalizer::default();
        assert!(canon.fits(1.0e6));
        assert!(!canon.fits(1.0e8));
        assert_eq!(canon.precision(), Precision::Decimals(9));
    }
}
