//! Halfedges of the Voronoi view.
//!
//! A [`Halfedge`] is a borrowed diagram plus a minimal [`Position`] in the dual
//! graph. Every accessor re-derives its answer from the live graph and the
//! diagram's degeneracy policies; nothing is stored.
//!
//! In dimension 2 a halfedge at `(f, i)` is dual to the triangulation edge
//! opposite vertex `i` of `f`. It bounds the cell of the south endpoint
//! `f.vertex(ccw(i))` and points at the output vertex dual to `f`. In
//! dimension 1 a halfedge is an ordered pair `(v1, v2)` of adjacent sites; it
//! lies on their bisector line and bounds the cell of `v1`.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
};

use super::{diagram::NavigationError, diagram::VoronoiDiagram, face::Face, vertex::Vertex};
use crate::core::{
    algorithms::traversal::{
        find_next, find_opposite, find_previous, find_valid_vertex, is_accepted, next_collinear,
        twin,
    },
    collections::CellIndex,
    edge::DualEdge,
    traits::{
        curve_constructor::{CurveConstructor, RayKind},
        degeneracy::{EdgeDegeneracyTester, FaceDegeneracyTester},
        dual_graph::{DualGraph, ccw, cw},
    },
};

/// Where a halfedge sits in the dual graph.
///
/// Exactly one form is active and it never changes for a given halfedge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position<V, F> {
    /// Dimension 2: the edge opposite vertex `index` of `face`.
    Planar {
        /// The dual face whose output vertex is the target.
        face: F,
        /// Local index of the dual edge in `face`.
        index: CellIndex,
    },
    /// Dimension 1: the bisector of two adjacent sites, bounding the cell of `v1`.
    Collinear {
        /// The site whose cell this halfedge bounds.
        v1: V,
        /// The adjacent site on the other side.
        v2: V,
    },
}

/// A halfedge of the Voronoi view.
///
/// Cheap to copy. Two halfedges are equal when they belong to the same
/// diagram and have the same position.
pub struct Halfedge<'a, G: DualGraph + ?Sized, E, F> {
    vd: &'a VoronoiDiagram<'a, G, E, F>,
    position: Position<G::VertexHandle, G::FaceHandle>,
}

impl<'a, G, E, F> Halfedge<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    /// Wraps a position that the caller has already validated.
    pub(crate) const fn new(
        vd: &'a VoronoiDiagram<'a, G, E, F>,
        position: Position<G::VertexHandle, G::FaceHandle>,
    ) -> Self {
        Self { vd, position }
    }

    fn planar(&self, face: G::FaceHandle, index: CellIndex) -> Self {
        Self::new(self.vd, Position::Planar { face, index })
    }

    fn collinear(&self, (v1, v2): (G::VertexHandle, G::VertexHandle)) -> Self {
        Self::new(self.vd, Position::Collinear { v1, v2 })
    }

    /// The diagram this halfedge belongs to.
    #[inline]
    #[must_use]
    pub const fn diagram(&self) -> &'a VoronoiDiagram<'a, G, E, F> {
        self.vd
    }

    /// The position in the dual graph.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position<G::VertexHandle, G::FaceHandle> {
        self.position
    }

    /// The halfedge on the other side of the same edge.
    ///
    /// When the cell across the edge is degenerate, the walk continues around
    /// the vanished site to the cell beyond it. Only a hull edge can face a
    /// vanished cell, since every other edge of that site is collapsed, and the
    /// walk stops on the site's other hull edge.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self.position {
            Position::Collinear { v1, v2 } => self.collinear((v2, v1)),
            Position::Planar { face, index } => {
                let graph = self.vd.dual();
                let north = graph.vertex(face, cw(index));
                let (f, i) = if self.vd.is_degenerate_site(north) {
                    find_opposite(graph, self.vd.edge_tester(), self.vd.face_tester(), face, index)
                } else {
                    twin(graph, face, index)
                };
                self.planar(f, i)
            }
        }
    }

    /// Alias for [`opposite`](Self::opposite).
    #[inline]
    #[must_use]
    pub fn twin(&self) -> Self {
        self.opposite()
    }

    /// The next halfedge along the boundary of the same face.
    ///
    /// In dimension 1 this is the other bisector of `v1`, or the halfedge
    /// itself at the end of the path.
    #[must_use]
    pub fn next(&self) -> Self {
        let graph = self.vd.dual();
        match self.position {
            Position::Collinear { v1, v2 } => self.collinear(next_collinear(graph, v1, v2)),
            Position::Planar { face, index } => {
                let (f, i) =
                    find_next(graph, self.vd.edge_tester(), self.vd.face_tester(), face, index);
                self.planar(f, i)
            }
        }
    }

    /// The previous halfedge along the boundary of the same face.
    #[must_use]
    pub fn previous(&self) -> Self {
        let graph = self.vd.dual();
        match self.position {
            // A face has at most two halfedges in dimension 1, so stepping back
            // is the same as stepping forward.
            Position::Collinear { v1, v2 } => self.collinear(next_collinear(graph, v1, v2)),
            Position::Planar { face, index } => {
                let (f, i) =
                    find_previous(graph, self.vd.edge_tester(), self.vd.face_tester(), face, index);
                self.planar(f, i)
            }
        }
    }

    /// Returns `true` if the halfedge ends at a finite output vertex.
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self.position {
            Position::Collinear { .. } => false,
            Position::Planar { face, .. } => !self.vd.dual().is_infinite_face(face),
        }
    }

    /// Returns `true` if the halfedge starts at a finite output vertex.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.opposite().has_target()
    }

    /// Returns `true` if either end lies at infinity.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        !self.has_source() || !self.has_target()
    }

    /// The output vertex this halfedge points to.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoTarget`] if the halfedge runs off to infinity.
    pub fn target(&self) -> Result<Vertex<'a, G, E, F>, NavigationError> {
        match self.position {
            Position::Planar { face, .. } if self.has_target() => {
                let canonical = find_valid_vertex(
                    self.vd.dual(),
                    self.vd.edge_tester(),
                    self.vd.face_tester(),
                    face,
                );
                Ok(Vertex::new(self.vd, canonical))
            }
            _ => Err(NavigationError::NoTarget),
        }
    }

    /// The output vertex this halfedge starts from.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoSource`] if the halfedge comes in from infinity.
    pub fn source(&self) -> Result<Vertex<'a, G, E, F>, NavigationError> {
        if !self.has_source() {
            return Err(NavigationError::NoSource);
        }
        self.opposite()
            .target()
            .map_err(|_| NavigationError::NoSource)
    }

    /// The face (site cell) this halfedge bounds.
    #[must_use]
    pub fn face(&self) -> Face<'a, G, E, F> {
        let site = match self.position {
            Position::Collinear { v1, .. } => v1,
            Position::Planar { face, index } => self.vd.dual().vertex(face, ccw(index)),
        };
        Face::new(self.vd, site)
    }

    /// The dual triangulation edge.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotAdjacent`] if a collinear halfedge names
    /// two sites that share no segment.
    pub fn dual_edge(&self) -> Result<DualEdge<G::FaceHandle>, NavigationError> {
        match self.position {
            Position::Planar { face, index } => Ok(DualEdge::new(face, index)),
            Position::Collinear { v1, v2 } => {
                let graph = self.vd.dual();
                graph
                    .incident_edges(v1)
                    .find(|&(c, _)| graph.index_of(c, v2).is_some())
                    .map(|(c, i)| DualEdge::new(c, i))
                    .ok_or(NavigationError::NotAdjacent)
            }
        }
    }

    /// Builds the curve of this halfedge.
    ///
    /// The shape is chosen from which of the two vertices beside the dual edge
    /// are infinite: both gives a line, one gives a ray and none a segment.
    #[must_use]
    pub fn curve<C>(&self, constructor: &C) -> C::Curve
    where
        C: CurveConstructor<G>,
    {
        let graph = self.vd.dual();
        match self.position {
            Position::Collinear { v1, v2 } => constructor.line(graph, v2, v1),
            Position::Planar { face, index } => {
                let north = graph.vertex(face, cw(index));
                let south = graph.vertex(face, ccw(index));
                let west = graph.vertex(face, index);
                let east = graph.mirror_vertex(face, index);
                match (
                    graph.is_infinite_vertex(west),
                    graph.is_infinite_vertex(east),
                ) {
                    (true, true) => constructor.line(graph, north, south),
                    (true, false) => {
                        constructor.ray(graph, north, south, east, RayKind::TargetAtInfinity)
                    }
                    (false, true) => {
                        constructor.ray(graph, north, south, west, RayKind::SourceAtInfinity)
                    }
                    (false, false) => constructor.segment(graph, north, south, east, west),
                }
            }
        }
    }

    /// Checks every local invariant; see [`is_valid`](Self::is_valid).
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        let graph = self.vd.dual();
        match self.position {
            Position::Planar { face, index } => {
                if graph.dimension() != 2 {
                    return Err("planar position in a diagram that is not two-dimensional");
                }
                if !graph.contains_face(face) || index > 2 {
                    return Err("position does not exist in the dual graph");
                }
                if !is_accepted(
                    graph,
                    self.vd.edge_tester(),
                    self.vd.face_tester(),
                    face,
                    index,
                ) {
                    return Err("dual edge is infinite or degenerate");
                }
                if self.vd.is_degenerate_site(graph.vertex(face, ccw(index))) {
                    return Err("bounded cell is degenerate");
                }
            }
            Position::Collinear { v1, v2 } => {
                if graph.dimension() != 1 {
                    return Err("collinear position in a diagram that is not one-dimensional");
                }
                if !graph.contains_vertex(v1) || !graph.contains_vertex(v2) || v1 == v2 {
                    return Err("position does not name two distinct dual vertices");
                }
                if graph.is_infinite_vertex(v1) && graph.is_infinite_vertex(v2) {
                    return Err("both endpoints are infinite");
                }
                if !graph.incident_vertices(v1).any(|w| w == v2) {
                    return Err("endpoints are not adjacent");
                }
            }
        }

        if self.opposite().opposite() != *self {
            return Err("opposite is not an involution");
        }
        if self.next().previous() != *self {
            return Err("previous(next(h)) differs from h");
        }
        if self.previous().next() != *self {
            return Err("next(previous(h)) differs from h");
        }
        if let Ok(target) = self.target()
            && !target.is_incident_edge(self)
        {
            return Err("halfedge is not incident to its target");
        }
        if let Ok(source) = self.source()
            && !source.is_incident_edge(self)
        {
            return Err("halfedge is not incident to its source");
        }
        Ok(())
    }

    /// Recomputes every invariant of this halfedge: its position is accepted
    /// by the policies, `opposite` is an involution, `next` and `previous`
    /// undo each other, and it is incident to its source and target.
    ///
    /// Reports instead of panicking.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl<G: DualGraph + ?Sized, E, F> Clone for Halfedge<'_, G, E, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: DualGraph + ?Sized, E, F> Copy for Halfedge<'_, G, E, F> {}

impl<G: DualGraph + ?Sized, E, F> PartialEq for Halfedge<'_, G, E, F> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.vd, other.vd) && self.position == other.position
    }
}

impl<G: DualGraph + ?Sized, E, F> Eq for Halfedge<'_, G, E, F> {}

impl<G: DualGraph + ?Sized, E, F> Hash for Halfedge<'_, G, E, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

impl<G: DualGraph + ?Sized, E, F> fmt::Debug for Halfedge<'_, G, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Halfedge")
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{traits::degeneracy::NoDegeneracy, triangulation_data_structure::Tds};

    #[test]
    fn single_triangle_halfedges() {
        let tds = Tds::from_triangles([0_u8, 1, 2], &[[0, 1, 2]]).unwrap();
        let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
        let f = tds.finite_cells().next().unwrap();

        let h = vd.halfedge_2d(f, 0).unwrap();
        assert!(h.has_target());
        assert!(!h.has_source());
        assert!(h.is_unbounded());
        assert_eq!(h.source().unwrap_err(), NavigationError::NoSource);
        assert_eq!(h.target().unwrap().dual(), f);
        assert_eq!(h.opposite().opposite(), h);
        assert!(h.is_valid());

        // Around the south site the three-cell diagram has two edges.
        assert_eq!(h.next().next(), h);
        assert_eq!(h.next().previous(), h);
        assert_eq!(h.dual_edge().unwrap(), DualEdge::new(f, 0));
    }

    #[test]
    fn halfedges_compare_by_diagram_identity() {
        let tds = Tds::from_triangles([0_u8, 1, 2], &[[0, 1, 2]]).unwrap();
        let a = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
        let b = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
        let f = tds.finite_cells().next().unwrap();
        assert_eq!(a.halfedge_2d(f, 1).unwrap(), a.halfedge_2d(f, 1).unwrap());
        assert_ne!(a.halfedge_2d(f, 1).unwrap(), b.halfedge_2d(f, 1).unwrap());
        assert_eq!(
            a.halfedge_2d(f, 1).unwrap().position(),
            b.halfedge_2d(f, 1).unwrap().position()
        );
    }
}
