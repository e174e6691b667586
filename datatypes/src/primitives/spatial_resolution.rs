use std::hash::{Hash, Hasher};
use std::{convert::TryFrom, ops::Div, ops::Mul};

use crate::primitives::error;
use crate::util::Result;
use crate::util::helpers::f64_to_bits;
use serde::{Deserialize, Serialize};
use snafu::ensure;

/// The spatial resolution in SRS units per pixel
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct SpatialResolution {
    pub x: f64,
    pub y: f64,
}

impl PartialEq for SpatialResolution {
    fn eq(&self, other: &Self) -> bool {
        f64_to_bits(self.x) == f64_to_bits(other.x) && f64_to_bits(self.y) == f64_to_bits(other.y)
    }
}

impl Eq for SpatialResolution {}

impl Hash for SpatialResolution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Ensure a single NAN representation
        state.write_u64(f64_to_bits(self.x));
        state.write_u64(f64_to_bits(self.y));
    }
}

impl SpatialResolution {
    /// Create a new `SpatialResolution` object
    pub fn new_unchecked(x: f64, y: f64) -> Self {
        SpatialResolution { x, y }
    }

    /// Create a new `SpatialResolution`, rejecting non-positive and non-finite pixel sizes
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::primitives::SpatialResolution;
    ///
    /// assert!(SpatialResolution::new(0.5, 0.5).is_ok());
    /// assert!(SpatialResolution::new(0.0, 0.5).is_err());
    /// assert!(SpatialResolution::new(0.5, f64::NAN).is_err());
    /// ```
    pub fn new(x: f64, y: f64) -> Result<Self> {
        ensure!(
            x.is_finite() && x > 0.0,
            error::InvalidSpatialResolution { value: x }
        );
        ensure!(
            y.is_finite() && y > 0.0,
            error::InvalidSpatialResolution { value: y }
        );
        Ok(Self::new_unchecked(x, y))
    }

    pub fn one() -> Self {
        SpatialResolution { x: 1., y: 1. }
    }

    /// Checks the same conditions as `new` on an existing value
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.x > 0.0 && self.y.is_finite() && self.y > 0.0
    }

    /// The finer (numerically smaller) of both axes
    pub fn min_axis(&self) -> f64 {
        self.x.min(self.y)
    }
}

impl TryFrom<(f64, f64)> for SpatialResolution {
    type Error = crate::error::Error;

    fn try_from(value: (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl Mul<f64> for SpatialResolution {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        SpatialResolution {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Div<f64> for SpatialResolution {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        SpatialResolution {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[test]
    fn new_rejects_invalid_values() {
        assert!(SpatialResolution::new(1., 1.).is_ok());
        assert!(SpatialResolution::new(-1., 1.).is_err());
        assert!(SpatialResolution::new(1., 0.).is_err());
        assert!(SpatialResolution::new(f64::INFINITY, 1.).is_err());
        assert!(SpatialResolution::try_from((f64::NAN, 1.)).is_err());
    }

    #[test]
    fn is_valid() {
        assert!(SpatialResolution::one().is_valid());
        assert!(!SpatialResolution::new_unchecked(0., 1.).is_valid());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn min_axis() {
        let res = SpatialResolution::new_unchecked(4., 2.);
        assert_eq!(res.min_axis(), 2.);
    }

    #[test]
    fn mul_scalar() {
        let res = SpatialResolution { x: 4., y: 9. } * 2.;
        assert_eq!(res, SpatialResolution { x: 8., y: 18. });
    }

    #[test]
    fn div_scalar() {
        let res = SpatialResolution { x: 4., y: 8. } / 2.;
        assert_eq!(res, SpatialResolution { x: 2., y: 4. });
    }

    #[test]
    fn partial_eq_nan() {
        let c1 = SpatialResolution { x: f64::NAN, y: 8. };
        let c2 = SpatialResolution { x: f64::NAN, y: 8. };
        assert_eq!(c1, c2);
    }

    #[test]
    fn hash_nan() {
        let mut h1 = DefaultHasher::new();
        SpatialResolution { x: f64::NAN, y: 8. }.hash(&mut h1);

        let mut h2 = DefaultHasher::new();
        SpatialResolution { x: f64::NAN, y: 8. }.hash(&mut h2);

        assert_eq!(h1.finish(), h2.finish());
    }
}
