//! Faces of the Voronoi view: the cells of the sites.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
};

use super::{
    circulators::Ccb,
    diagram::{NavigationError, VoronoiDiagram},
    halfedge::{Halfedge, Position},
};
use crate::core::{
    algorithms::traversal::is_accepted,
    traits::{
        degeneracy::{EdgeDegeneracyTester, FaceDegeneracyTester},
        dual_graph::DualGraph,
    },
};

/// The Voronoi cell of one site, identified by its dual vertex.
pub struct Face<'a, G: DualGraph + ?Sized, E, F> {
    vd: &'a VoronoiDiagram<'a, G, E, F>,
    site: G::VertexHandle,
}

impl<'a, G, E, F> Face<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    pub(crate) const fn new(vd: &'a VoronoiDiagram<'a, G, E, F>, site: G::VertexHandle) -> Self {
        Self { vd, site }
    }

    /// The dual vertex (the site).
    #[inline]
    #[must_use]
    pub const fn dual(&self) -> G::VertexHandle {
        self.site
    }

    /// Some halfedge on the boundary of this face.
    ///
    /// In dimension 2 this is the first accepted edge around the site; in
    /// dimension 1 the bisector towards the first finite neighbor.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoBoundary`] if the face is the whole plane
    /// (a single site) or every edge around the site is rejected.
    pub fn halfedge(&self) -> Result<Halfedge<'a, G, E, F>, NavigationError> {
        let graph = self.vd.dual();
        let position = match graph.dimension() {
            2 => graph
                .incident_edges(self.site)
                .find(|&(f, i)| {
                    is_accepted(graph, self.vd.edge_tester(), self.vd.face_tester(), f, i)
                })
                .map(|(face, index)| Position::Planar { face, index }),
            1 => graph
                .incident_vertices(self.site)
                .find(|&w| !graph.is_infinite_vertex(w))
                .map(|w| Position::Collinear {
                    v1: self.site,
                    v2: w,
                }),
            _ => None,
        };
        position
            .map(|p| Halfedge::new(self.vd, p))
            .ok_or(NavigationError::NoBoundary)
    }

    /// Circulator over the boundary of this face.
    ///
    /// # Errors
    ///
    /// Same as [`halfedge`](Self::halfedge).
    pub fn ccb(&self) -> Result<Ccb<'a, G, E, F>, NavigationError> {
        self.halfedge().map(Ccb::new)
    }

    /// Returns `true` if the face extends to infinity.
    ///
    /// In dimension 2 that is the case for sites on the convex hull; in lower
    /// dimensions every face is unbounded.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        let graph = self.vd.dual();
        if graph.dimension() < 2 {
            return true;
        }
        graph
            .incident_vertices(self.site)
            .any(|w| graph.is_infinite_vertex(w))
    }

    /// Returns `true` if `h` lies on the boundary of this face.
    #[must_use]
    pub fn is_halfedge_on_ccb(&self, h: &Halfedge<'a, G, E, F>) -> bool {
        self.ccb().is_ok_and(|mut ccb| ccb.any(|e| e == *h))
    }

    pub(crate) fn check(&self) -> Result<(), &'static str> {
        let graph = self.vd.dual();
        if !graph.contains_vertex(self.site) || graph.is_infinite_vertex(self.site) {
            return Err("face is not dual to a site");
        }
        if graph.dimension() == 2 && self.vd.is_degenerate_site(self.site) {
            return Err("face is degenerate");
        }
        let start = match self.halfedge() {
            Ok(h) => h,
            Err(_) if graph.dimension() < 1 => return Ok(()),
            Err(_) => return Err("face has no boundary halfedge"),
        };

        let limit = 3 * graph.number_of_faces() + 2;
        let mut current = start;
        for _ in 0..limit {
            if current.face() != *self {
                return Err("boundary walk leaves the face");
            }
            let next = current.next();
            if next == start || next == current {
                return Ok(());
            }
            current = next;
        }
        Err("boundary walk does not close")
    }

    /// Checks that the face is dual to a live, non-degenerate site and that
    /// its boundary walk closes without leaving the face.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl<G: DualGraph + ?Sized, E, F> Clone for Face<'_, G, E, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: DualGraph + ?Sized, E, F> Copy for Face<'_, G, E, F> {}

impl<G: DualGraph + ?Sized, E, F> PartialEq for Face<'_, G, E, F> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.vd, other.vd) && self.site == other.site
    }
}

impl<G: DualGraph + ?Sized, E, F> Eq for Face<'_, G, E, F> {}

impl<G: DualGraph + ?Sized, E, F> Hash for Face<'_, G, E, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.site.hash(state);
    }
}

impl<G: DualGraph + ?Sized, E, F> fmt::Debug for Face<'_, G, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face").field("site", &self.site).finish()
    }
}
