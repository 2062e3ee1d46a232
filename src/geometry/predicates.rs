//! Planar geometric predicates.
//!
//! Orientation and in-circle tests evaluate the usual determinants in `f64`
//! and call a result degenerate when the determinant is within a tolerance
//! scaled by the magnitude of its entries. They are not exact; sites that are
//! almost cocircular may be reported as cocircular.

use thiserror::Error;

use super::point::Point;

/// Absolute part of the tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-15;

/// Relative part of the tolerance, multiplied by the largest row sum.
const RELATIVE_TOLERANCE: f64 = 1e-12;

/// Errors from [`circumcenter`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CircumcenterError {
    /// The three points are collinear.
    #[error("Points are collinear; the circumcircle is undefined")]
    DegenerateTriangle,
    /// A coordinate is `NaN` or infinite.
    #[error("Point coordinates are not finite")]
    NonFiniteInput,
}

/// Represents the position of a point relative to a circumcircle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InCircle {
    /// The point is outside the circumcircle
    OUTSIDE,
    /// The point is on the circumcircle (within tolerance)
    BOUNDARY,
    /// The point is inside the circumcircle
    INSIDE,
}

impl std::fmt::Display for InCircle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Clockwise
    NEGATIVE,
    /// Collinear (within tolerance)
    DEGENERATE,
    /// Counterclockwise
    POSITIVE,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

fn tolerance(max_row_sum: f64) -> f64 {
    RELATIVE_TOLERANCE.mul_add(max_row_sum, DEFAULT_TOLERANCE)
}

/// Orientation of the triangle `a b c`.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::geometry::{point::Point, predicates::{Orientation, orientation}};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// let c = Point::new([0.0, 1.0]);
/// assert_eq!(orientation(&a, &b, &c), Orientation::POSITIVE);
/// assert_eq!(orientation(&a, &c, &b), Orientation::NEGATIVE);
/// assert_eq!(orientation(&a, &b, &Point::new([2.0, 0.0])), Orientation::DEGENERATE);
/// ```
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    let ab = *b - *a;
    let ac = *c - *a;
    let det = ab.x().mul_add(ac.y(), -(ab.y() * ac.x()));
    let scale = (ab.x().abs() + ab.y().abs()).max(ac.x().abs() + ac.y().abs());
    let tol = tolerance(scale * scale);
    if det > tol {
        Orientation::POSITIVE
    } else if det < -tol {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Position of `d` relative to the circumcircle of the triangle `a b c`.
///
/// The result does not depend on the orientation of `a b c`. A collinear
/// triangle has no circumcircle; every point is then reported as `OUTSIDE`
/// unless it coincides with one of the three.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::geometry::{point::Point, predicates::{InCircle, incircle}};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// let c = Point::new([1.0, 1.0]);
/// assert_eq!(incircle(&a, &b, &c, &Point::new([0.0, 1.0])), InCircle::BOUNDARY);
/// assert_eq!(incircle(&a, &b, &c, &Point::new([0.5, 0.5])), InCircle::INSIDE);
/// assert_eq!(incircle(&a, &b, &c, &Point::new([3.0, 3.0])), InCircle::OUTSIDE);
/// ```
#[must_use]
pub fn incircle(a: &Point, b: &Point, c: &Point, d: &Point) -> InCircle {
    if [a, b, c].iter().any(|p| **p == *d) {
        return InCircle::BOUNDARY;
    }
    let sign = match orientation(a, b, c) {
        Orientation::POSITIVE => 1.0,
        Orientation::NEGATIVE => -1.0,
        Orientation::DEGENERATE => return InCircle::OUTSIDE,
    };

    // Rows relative to d: (x, y, x^2 + y^2).
    let rows = [*a - *d, *b - *d, *c - *d].map(|p| [p.x(), p.y(), p.squared_norm()]);
    let minor = |i: usize, j: usize| rows[i][0].mul_add(rows[j][1], -(rows[i][1] * rows[j][0]));
    let det = rows[0][2].mul_add(
        minor(1, 2),
        rows[1][2].mul_add(minor(2, 0), rows[2][2] * minor(0, 1)),
    );

    let max_row_sum = rows
        .iter()
        .map(|r| r.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0_f64, f64::max);
    let tol = tolerance(max_row_sum * max_row_sum);

    let normalized = det * sign;
    if normalized > tol {
        InCircle::INSIDE
    } else if normalized < -tol {
        InCircle::OUTSIDE
    } else {
        InCircle::BOUNDARY
    }
}

/// Center of the circle through `a`, `b` and `c`.
///
/// # Errors
///
/// Returns [`CircumcenterError::DegenerateTriangle`] for collinear points and
/// [`CircumcenterError::NonFiniteInput`] for non-finite coordinates.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::geometry::{point::Point, predicates::circumcenter};
///
/// let center = circumcenter(
///     &Point::new([0.0, 0.0]),
///     &Point::new([2.0, 0.0]),
///     &Point::new([0.0, 2.0]),
/// )
/// .unwrap();
/// assert_eq!(center, Point::new([1.0, 1.0]));
/// ```
pub fn circumcenter(a: &Point, b: &Point, c: &Point) -> Result<Point, CircumcenterError> {
    if [a, b, c].iter().any(|p| p.validate().is_err()) {
        return Err(CircumcenterError::NonFiniteInput);
    }
    if orientation(a, b, c) == Orientation::DEGENERATE {
        return Err(CircumcenterError::DegenerateTriangle);
    }

    let ab = *b - *a;
    let ac = *c - *a;
    let d = 2.0 * ab.x().mul_add(ac.y(), -(ab.y() * ac.x()));
    let ab2 = ab.squared_norm();
    let ac2 = ac.squared_norm();
    let ux = ac.y().mul_add(ab2, -(ab.y() * ac2)) / d;
    let uy = ab.x().mul_add(ac2, -(ac.x() * ab2)) / d;
    Ok(Point::new([a.x() + ux, a.y() + uy]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn incircle_ignores_orientation() {
        let a = Point::new([0.0, 0.0]);
        let b = Point::new([4.0, 0.0]);
        let c = Point::new([0.0, 4.0]);
        let inside = Point::new([1.0, 1.0]);
        assert_eq!(incircle(&a, &b, &c, &inside), InCircle::INSIDE);
        assert_eq!(incircle(&a, &c, &b, &inside), InCircle::INSIDE);
        assert_eq!(incircle(&a, &b, &c, &Point::new([4.0, 4.0])), InCircle::BOUNDARY);
        assert_eq!(incircle(&a, &b, &c, &b), InCircle::BOUNDARY);
    }

    #[test]
    fn cocircular_regular_polygon_is_boundary() {
        let on_circle = |k: u32| {
            let t = f64::from(k) * std::f64::consts::TAU / 8.0;
            Point::new([3.0 * t.cos() + 1.0, 3.0 * t.sin() - 2.0])
        };
        for k in 3..8 {
            assert_eq!(
                incircle(&on_circle(0), &on_circle(1), &on_circle(2), &on_circle(k)),
                InCircle::BOUNDARY
            );
        }
    }

    #[test]
    fn circumcenter_is_equidistant() {
        let a = Point::new([0.3, -1.2]);
        let b = Point::new([2.5, 0.7]);
        let c = Point::new([-1.0, 1.9]);
        let center = circumcenter(&a, &b, &c).unwrap();
        let ra = (a - center).squared_norm();
        assert_relative_eq!(ra, (b - center).squared_norm(), epsilon = 1e-12);
        assert_relative_eq!(ra, (c - center).squared_norm(), epsilon = 1e-12);
    }

    #[test]
    fn circumcenter_rejects_bad_input() {
        let a = Point::new([0.0, 0.0]);
        let b = Point::new([1.0, 1.0]);
        assert_eq!(
            circumcenter(&a, &b, &Point::new([2.0, 2.0])),
            Err(CircumcenterError::DegenerateTriangle)
        );
        assert_eq!(
            circumcenter(&a, &b, &Point::new([f64::NAN, 0.0])),
            Err(CircumcenterError::NonFiniteInput)
        );
    }
}
