//! Planar points used as site payloads.
//!
//! # Equality semantics
//!
//! Coordinates are compared bitwise after canonicalizing `-0.0` to `0.0` and
//! every `NaN` to one bit pattern, so `Point` can implement `Eq` and `Hash`
//! and be used as a map key. Compare [`Point::coords`] directly for IEEE 754
//! semantics.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Mul, Sub},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors from [`Point::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum PointValidationError {
    /// A coordinate is `NaN` or infinite.
    #[error("Coordinate {coordinate_index} is not finite: {coordinate_value}")]
    NonFiniteCoordinate {
        /// Index of the offending coordinate.
        coordinate_index: usize,
        /// Its value.
        coordinate_value: f64,
    },
}

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point in the plane.
///
/// Serialized as a two-element array `[x, y]`.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0]);
/// assert_eq!(p.x(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point {
    coords: [f64; 2],
}

impl Point {
    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [f64; 2]) -> Self {
        Self { coords }
    }

    /// The coordinates as an array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[f64; 2] {
        &self.coords
    }

    /// First coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.coords[0]
    }

    /// Second coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Checks that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns [`PointValidationError::NonFiniteCoordinate`] for the first
    /// coordinate that is `NaN` or infinite.
    pub fn validate(&self) -> Result<(), PointValidationError> {
        match self.coords.iter().position(|c| !c.is_finite()) {
            Some(coordinate_index) => Err(PointValidationError::NonFiniteCoordinate {
                coordinate_index,
                coordinate_value: self.coords[coordinate_index],
            }),
            None => Ok(()),
        }
    }

    /// Squared Euclidean length of the point seen as a vector.
    #[inline]
    #[must_use]
    pub fn squared_norm(&self) -> f64 {
        self.x().mul_add(self.x(), self.y() * self.y())
    }

    /// Dot product of the two points seen as vectors.
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x().mul_add(other.x(), self.y() * other.y())
    }

    /// Midpoint of `self` and `other`.
    #[inline]
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new([
            0.5 * (self.x() + other.x()),
            0.5 * (self.y() + other.y()),
        ])
    }

    /// The vector rotated a quarter turn counterclockwise.
    #[inline]
    #[must_use]
    pub const fn perp_left(&self) -> Self {
        Self::new([-self.coords[1], self.coords[0]])
    }

    /// The vector rotated a quarter turn clockwise.
    #[inline]
    #[must_use]
    pub const fn perp_right(&self) -> Self {
        Self::new([self.coords[1], -self.coords[0]])
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value.to_bits() == (-0.0_f64).to_bits() {
        0
    } else {
        value.to_bits()
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(&a, &b)| canonical_bits(a) == canonical_bits(b))
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &c in &self.coords {
            canonical_bits(c).hash(state);
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl From<[f64; 2]> for Point {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        p.coords
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new([self.x() + rhs.x(), self.y() + rhs.y()])
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new([self.x() - rhs.x(), self.y() - rhs.y()])
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new([self.x() * rhs, self.y() * rhs])
    }
}
