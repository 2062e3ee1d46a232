//! Voronoi edge curves for point sites.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    point::Point,
    predicates::{CircumcenterError, circumcenter},
};
use crate::core::{
    traits::curve_constructor::{CurveConstructor, RayKind},
    triangulation_data_structure::{Tds, VertexKey},
};

/// Errors from [`PointSiteCurves`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurveError {
    /// A vertex handed to the constructor carries no site.
    #[error("Vertex {vertex:?} has no site")]
    MissingSite {
        /// The offending vertex.
        vertex: VertexKey,
    },
    /// The circumcenter of a dual triangle could not be computed.
    #[error(transparent)]
    Circumcenter(#[from] CircumcenterError),
}

/// The geometric carrier of a Voronoi halfedge.
///
/// Directions are not normalized. The cell bounded by the halfedge lies to
/// the left of its direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum VoronoiCurve {
    /// A full bisector line.
    Line {
        /// A point on the line (the midpoint of the two sites).
        point: Point,
        /// Direction of travel.
        direction: Point,
    },
    /// A bisector ray.
    Ray {
        /// The finite end.
        origin: Point,
        /// Direction from the finite end towards infinity.
        direction: Point,
        /// Which end of the halfedge is at infinity.
        kind: RayKind,
    },
    /// A bounded bisector piece.
    Segment {
        /// Start of the halfedge.
        source: Point,
        /// End of the halfedge.
        target: Point,
    },
}

impl VoronoiCurve {
    /// Returns `true` for segments.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        matches!(self, Self::Segment { .. })
    }

    /// The finite start point, if any.
    #[must_use]
    pub const fn source(&self) -> Option<Point> {
        match *self {
            Self::Segment { source, .. } => Some(source),
            Self::Ray {
                origin,
                kind: RayKind::TargetAtInfinity,
                ..
            } => Some(origin),
            _ => None,
        }
    }

    /// The finite end point, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Point> {
        match *self {
            Self::Segment { target, .. } => Some(target),
            Self::Ray {
                origin,
                kind: RayKind::SourceAtInfinity,
                ..
            } => Some(origin),
            _ => None,
        }
    }
}

/// Builds [`VoronoiCurve`]s from the sites of a `Tds<Point>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointSiteCurves;

impl PointSiteCurves {
    fn site(graph: &Tds<Point>, vertex: VertexKey) -> Result<Point, CurveError> {
        graph
            .site(vertex)
            .copied()
            .ok_or(CurveError::MissingSite { vertex })
    }
}

impl CurveConstructor<Tds<Point>> for PointSiteCurves {
    type Curve = Result<VoronoiCurve, CurveError>;

    fn line(&self, graph: &Tds<Point>, p: VertexKey, q: VertexKey) -> Self::Curve {
        let (p, q) = (Self::site(graph, p)?, Self::site(graph, q)?);
        Ok(VoronoiCurve::Line {
            point: p.midpoint(&q),
            direction: (p - q).perp_left(),
        })
    }

    fn ray(
        &self,
        graph: &Tds<Point>,
        p: VertexKey,
        q: VertexKey,
        r: VertexKey,
        kind: RayKind,
    ) -> Self::Curve {
        let (p, q, r) = (
            Self::site(graph, p)?,
            Self::site(graph, q)?,
            Self::site(graph, r)?,
        );
        let origin = circumcenter(&p, &q, &r)?;
        let direction = match kind {
            RayKind::TargetAtInfinity => (p - q).perp_left(),
            RayKind::SourceAtInfinity => (p - q).perp_right(),
        };
        Ok(VoronoiCurve::Ray {
            origin,
            direction,
            kind,
        })
    }

    fn segment(
        &self,
        graph: &Tds<Point>,
        p: VertexKey,
        q: VertexKey,
        r: VertexKey,
        s: VertexKey,
    ) -> Self::Curve {
        let (p, q, r, s) = (
            Self::site(graph, p)?,
            Self::site(graph, q)?,
            Self::site(graph, r)?,
            Self::site(graph, s)?,
        );
        Ok(VoronoiCurve::Segment {
            source: circumcenter(&p, &q, &r)?,
            target: circumcenter(&p, &q, &s)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::dual_graph::DualGraph;
    use approx::assert_relative_eq;

    #[test]
    fn line_is_the_bisector_with_q_on_the_left() {
        let tds = Tds::from_collinear([Point::new([0.0, 0.0]), Point::new([2.0, 0.0])]);
        let k: Vec<_> = tds.site_keys().collect();
        let Ok(VoronoiCurve::Line { point, direction }) = PointSiteCurves.line(&tds, k[1], k[0])
        else {
            panic!("expected a line");
        };
        assert_eq!(point, Point::new([1.0, 0.0]));
        // Travelling along +y, the site at the origin is on the left.
        assert!(direction.y() > 0.0);
        assert_relative_eq!(direction.x(), 0.0);
    }

    #[test]
    fn missing_site_is_reported() {
        let tds = Tds::from_collinear([Point::new([0.0, 0.0]), Point::new([2.0, 0.0])]);
        let k = tds.site_keys().next().unwrap();
        assert_eq!(
            PointSiteCurves.line(&tds, k, tds.infinite_vertex()),
            Err(CurveError::MissingSite {
                vertex: tds.infinite_vertex()
            })
        );
    }

    #[test]
    fn curve_endpoints() {
        let seg = VoronoiCurve::Segment {
            source: Point::new([0.0, 0.0]),
            target: Point::new([1.0, 0.0]),
        };
        assert!(seg.is_bounded());
        assert_eq!(seg.target(), Some(Point::new([1.0, 0.0])));

        let ray = VoronoiCurve::Ray {
            origin: Point::new([0.0, 0.0]),
            direction: Point::new([0.0, 1.0]),
            kind: RayKind::SourceAtInfinity,
        };
        assert_eq!(ray.source(), None);
        assert_eq!(ray.target(), Some(Point::new([0.0, 0.0])));
    }
}
