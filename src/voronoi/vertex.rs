//! Vertices of the Voronoi view.
//!
//! An output vertex is dual to a cluster of finite dual faces glued together by
//! zero-length edges: edges the edge policy collapses, and every edge around a
//! site the face policy removes. It is identified by the cluster's canonical
//! face, so two faces of the same cluster yield equal vertices.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
};

use super::{
    circulators::HalfedgesAroundVertex,
    diagram::{NavigationError, VoronoiDiagram},
    halfedge::{Halfedge, Position},
};
use crate::core::{
    algorithms::traversal::{find_valid_vertex, is_accepted, vertex_cluster},
    traits::{
        degeneracy::{EdgeDegeneracyTester, FaceDegeneracyTester},
        dual_graph::{DualGraph, ccw},
    },
};

/// A finite output vertex.
pub struct Vertex<'a, G: DualGraph + ?Sized, E, F> {
    vd: &'a VoronoiDiagram<'a, G, E, F>,
    face: G::FaceHandle,
}

impl<'a, G, E, F> Vertex<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    /// Wraps a canonical face.
    pub(crate) const fn new(vd: &'a VoronoiDiagram<'a, G, E, F>, face: G::FaceHandle) -> Self {
        Self { vd, face }
    }

    /// The canonical dual face.
    #[inline]
    #[must_use]
    pub const fn dual(&self) -> G::FaceHandle {
        self.face
    }

    /// Every dual face merged into this vertex, canonical face first.
    #[must_use]
    pub fn cluster(&self) -> Vec<G::FaceHandle> {
        vertex_cluster(
            self.vd.dual(),
            self.vd.edge_tester(),
            self.vd.face_tester(),
            self.face,
        )
    }

    /// Some halfedge whose target is this vertex.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoBoundary`] if no accepted edge of the
    /// cluster bounds a surviving face.
    pub fn halfedge(&self) -> Result<Halfedge<'a, G, E, F>, NavigationError> {
        let graph = self.vd.dual();
        self.cluster()
            .into_iter()
            .flat_map(|f| (0..3).map(move |i| (f, i)))
            .find(|&(f, i)| {
                is_accepted(graph, self.vd.edge_tester(), self.vd.face_tester(), f, i)
                    && !self.vd.is_degenerate_site(graph.vertex(f, ccw(i)))
            })
            .map(|(face, index)| Halfedge::new(self.vd, Position::Planar { face, index }))
            .ok_or(NavigationError::NoBoundary)
    }

    /// Circulator over the halfedges pointing at this vertex.
    ///
    /// # Errors
    ///
    /// Same as [`halfedge`](Self::halfedge).
    pub fn incident_halfedges(&self) -> Result<HalfedgesAroundVertex<'a, G, E, F>, NavigationError> {
        self.halfedge().map(HalfedgesAroundVertex::new)
    }

    /// Number of edges meeting at this vertex.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.incident_halfedges().map_or(0, Iterator::count)
    }

    /// Returns `true` if `h` or its opposite points at this vertex.
    #[must_use]
    pub fn is_incident_edge(&self, h: &Halfedge<'a, G, E, F>) -> bool {
        let opposite = h.opposite();
        self.incident_halfedges()
            .is_ok_and(|mut around| around.any(|e| e == *h || e == opposite))
    }

    pub(crate) fn check(&self) -> Result<(), &'static str> {
        let graph = self.vd.dual();
        if graph.dimension() != 2 {
            return Err("vertices exist only in two-dimensional diagrams");
        }
        if !graph.contains_face(self.face) || graph.is_infinite_face(self.face) {
            return Err("vertex is not dual to a finite face");
        }
        let canonical =
            find_valid_vertex(graph, self.vd.edge_tester(), self.vd.face_tester(), self.face);
        if canonical != self.face {
            return Err("vertex is not the canonical face of its cluster");
        }
        let start = self.halfedge().map_err(|_| "vertex has no incident halfedge")?;

        let limit = 3 * graph.number_of_faces() + 2;
        let mut current = start;
        for _ in 0..limit {
            if current.target().ok().as_ref() != Some(self) {
                return Err("incident halfedge points elsewhere");
            }
            let next = current.next().opposite();
            if next == start {
                return Ok(());
            }
            current = next;
        }
        Err("walk around the vertex does not close")
    }

    /// Checks that the vertex is canonical and that every halfedge around it
    /// points back at it.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl<G: DualGraph + ?Sized, E, F> Clone for Vertex<'_, G, E, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: DualGraph + ?Sized, E, F> Copy for Vertex<'_, G, E, F> {}

impl<G: DualGraph + ?Sized, E, F> PartialEq for Vertex<'_, G, E, F> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.vd, other.vd) && self.face == other.face
    }
}

impl<G: DualGraph + ?Sized, E, F> Eq for Vertex<'_, G, E, F> {}

impl<G: DualGraph + ?Sized, E, F> Hash for Vertex<'_, G, E, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.face.hash(state);
    }
}

impl<G: DualGraph + ?Sized, E, F> fmt::Debug for Vertex<'_, G, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vertex").field("face", &self.face).finish()
    }
}
