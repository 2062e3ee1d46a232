//! Construction of the geometric curve carried by a Voronoi edge.
//!
//! The Voronoi view only decides *which* of four shapes an edge has; the
//! constructor turns the dual vertices into a concrete curve type.

use serde::{Deserialize, Serialize};

use super::dual_graph::DualGraph;

/// Which end of a ray lies at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayKind {
    /// The halfedge has a source but no target: it leaves its source and
    /// runs off to infinity.
    TargetAtInfinity,
    /// The halfedge has a target but no source: it comes in from infinity.
    SourceAtInfinity,
}

/// Builds the curve of a Voronoi edge from the dual vertices around it.
///
/// For a halfedge dual to the triangulation edge `p q` (north `p`, south `q`)
/// the curve bounds the cell of `q`, which lies to its left:
///
/// - [`line`](Self::line) is called when the edge is unbounded at both ends
///   (the bisector of `p` and `q`);
/// - [`ray`](Self::ray) receives the finite third vertex `r` of the one
///   triangle on either side that is finite;
/// - [`segment`](Self::segment) receives both third vertices, `r` on the
///   source side and `s` on the target side.
pub trait CurveConstructor<G: DualGraph + ?Sized> {
    /// The curve type produced.
    type Curve;

    /// The full bisector of `p` and `q`.
    fn line(&self, graph: &G, p: G::VertexHandle, q: G::VertexHandle) -> Self::Curve;

    /// A bisector ray whose finite end is dual to the triangle `p q r`.
    fn ray(
        &self,
        graph: &G,
        p: G::VertexHandle,
        q: G::VertexHandle,
        r: G::VertexHandle,
        kind: RayKind,
    ) -> Self::Curve;

    /// A bounded bisector piece from the dual of `p q r` to the dual of `p q s`.
    fn segment(
        &self,
        graph: &G,
        p: G::VertexHandle,
        q: G::VertexHandle,
        r: G::VertexHandle,
        s: G::VertexHandle,
    ) -> Self::Curve;
}
