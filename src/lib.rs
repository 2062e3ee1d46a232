//! # voronoi-adaptor
//!
//! A lazy Voronoi diagram view over a 2D triangulation data structure, in the
//! style of [CGAL's `Voronoi_diagram_2`](https://doc.cgal.org/latest/Voronoi_diagram_2/index.html).
//!
//! The diagram is never built. A [`VoronoiDiagram`](voronoi::diagram::VoronoiDiagram)
//! borrows a dual graph (normally a [`Tds`](core::triangulation_data_structure::Tds))
//! and two degeneracy policies, and answers every navigation query by walking
//! the dual graph on demand:
//!
//! - an *edge policy* marks dual edges whose Voronoi edge has zero length; the
//!   output vertices on both sides merge into one;
//! - a *face policy* marks sites whose Voronoi cell vanishes.
//!
//! Degenerate elements are skipped silently, and the case of collinear sites
//! (a dual graph of dimension 1, whose Voronoi diagram is a set of parallel
//! lines) is handled as well.
//!
//! # Basic Usage
//!
//! ```rust
//! use voronoi_adaptor::prelude::*;
//!
//! // A unit square: its four corners are cocircular, so the diagonal of the
//! // triangulation is degenerate and the two triangles share one Voronoi vertex.
//! let tds = Tds::from_triangles(
//!     [
//!         Point::new([0.0, 0.0]),
//!         Point::new([1.0, 0.0]),
//!         Point::new([1.0, 1.0]),
//!         Point::new([0.0, 1.0]),
//!     ],
//!     &[[0, 1, 2], [0, 2, 3]],
//! )
//! .unwrap();
//!
//! let vd = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);
//! assert_eq!(vd.number_of_vertices(), 1);
//! assert_eq!(vd.number_of_edges(), 4);
//!
//! let center = vd.vertices().next().unwrap();
//! assert_eq!(center.degree(), 4);
//!
//! // Every edge is a ray leaving the center.
//! for h in vd.halfedges().filter(|h| h.has_source()) {
//!     let curve = h.curve(&PointSiteCurves).unwrap();
//!     assert_eq!(curve.source(), Some(Point::new([0.5, 0.5])));
//! }
//! assert!(vd.is_valid());
//! ```
//!
//! # Walking a face boundary
//!
//! ```rust
//! use voronoi_adaptor::prelude::*;
//!
//! let tds = fan_triangulation(6, 1.0).unwrap();
//! let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
//!
//! let center = tds.site_keys().next().unwrap();
//! let face = vd.face(center).unwrap();
//! assert!(!face.is_unbounded());
//! assert_eq!(face.ccb().unwrap().count(), 6);
//! ```
//!
//! # Custom policies
//!
//! Any closure with the right signature is a policy:
//!
//! ```rust
//! use voronoi_adaptor::prelude::*;
//!
//! let tds = fan_triangulation(5, 1.0).unwrap();
//! let center = tds.site_keys().next().unwrap();
//!
//! // Collapse every edge incident to the center.
//! let spokes = move |g: &Tds<Point>, f: CellKey, i: CellIndex| {
//!     g.edge_key(f, i).is_some_and(|e| e.contains(center))
//! };
//! let vd = VoronoiDiagram::new(&tds, spokes, NoDegeneracy);
//! assert_eq!(vd.number_of_vertices(), 1);
//! ```

#![forbid(unsafe_code)]

/// Dual graph data structure, policy traits and traversal resolvers.
pub mod core {
    /// Algorithms over the dual graph.
    pub mod algorithms {
        /// Policy-aware rotation and vertex resolution.
        pub mod traversal;
    }
    pub mod cell;
    /// Collection aliases and helpers.
    pub mod collections;
    pub mod edge;
    pub mod triangulation_data_structure;
    pub mod vertex;
    /// Traits at the seams between the Voronoi view and its inputs.
    pub mod traits {
        pub mod curve_constructor;
        pub mod degeneracy;
        pub mod dual_graph;
        pub use curve_constructor::*;
        pub use degeneracy::*;
        pub use dual_graph::*;
    }
    pub use cell::*;
    pub use edge::*;
    pub use traits::*;
    pub use triangulation_data_structure::*;
    pub use vertex::*;
}

/// Planar points, predicates and the point-site policy and curves.
pub mod geometry {
    pub mod curves;
    pub mod degeneracy;
    pub mod point;
    pub mod predicates;
    /// Generators for test and benchmark inputs.
    pub mod util {
        pub mod triangulation_generation;
        pub use triangulation_generation::*;
    }
    pub use curves::*;
    pub use degeneracy::*;
    pub use point::*;
    pub use predicates::*;
}

/// The Voronoi view: diagram, halfedges, faces, vertices and circulators.
pub mod voronoi {
    pub mod circulators;
    pub mod diagram;
    pub mod face;
    pub mod halfedge;
    pub mod vertex;
    pub use circulators::*;
    pub use diagram::*;
    pub use face::*;
    pub use halfedge::*;
    pub use vertex::*;
}

/// Re-exports of the commonly used items.
pub mod prelude {
    pub use crate::core::{
        collections::{CellIndex, FastHashMap, FastHashSet},
        edge::{DualEdge, EdgeKey},
        traits::{
            curve_constructor::{CurveConstructor, RayKind},
            degeneracy::{
                EdgeDegeneracyTester, EdgeSet, FaceDegeneracyTester, NoDegeneracy, VertexSet,
            },
            dual_graph::{DualGraph, ccw, cw},
        },
        triangulation_data_structure::{
            CellKey, Tds, TdsConstructionError, TdsValidationError, ValidationOptions, VertexKey,
        },
    };

    pub use crate::geometry::{
        curves::{CurveError, PointSiteCurves, VoronoiCurve},
        degeneracy::CocircularEdges,
        point::Point,
        predicates::{InCircle, Orientation, circumcenter, incircle, orientation},
        util::triangulation_generation::{
            collinear_sites, fan_triangulation, grid_triangulation, random_triangulation,
        },
    };

    pub use crate::voronoi::{
        circulators::{Ccb, HalfedgesAroundVertex},
        diagram::{NavigationError, VoronoiDiagram},
        face::Face,
        halfedge::{Halfedge, Position},
        vertex::Vertex,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{is_normal, prelude::*};

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<Tds<Point>>());
        assert!(is_normal::<EdgeSet>());
        assert!(is_normal::<VoronoiDiagram<'static, Tds<Point>, CocircularEdges, NoDegeneracy>>());
        assert!(is_normal::<Halfedge<'static, Tds<Point>, CocircularEdges, NoDegeneracy>>());
        assert!(is_normal::<Face<'static, Tds<Point>, NoDegeneracy, VertexSet>>());
        assert!(is_normal::<Vertex<'static, Tds<u8>, EdgeSet, NoDegeneracy>>());
    }

    #[test]
    fn prelude_covers_a_full_walk() {
        let tds = grid_triangulation(3, 3, 5).unwrap();
        let vd = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);
        // Four unit squares, each collapsing to its center.
        assert_eq!(vd.number_of_vertices(), 4);
        let bounded: Vec<_> = vd.bounded_faces().collect();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].ccb().unwrap().count(), 4);
        assert!(vd.validation_report(ValidationOptions {
            check_euler_characteristic: true,
        })
        .is_ok());
    }
}
