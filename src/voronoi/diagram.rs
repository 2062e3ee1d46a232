//! The Voronoi view over a dual graph.
//!
//! [`VoronoiDiagram`] borrows a [`DualGraph`] together with an edge policy and
//! a face policy, and exposes the Voronoi diagram as halfedges, faces and
//! vertices computed on demand. Nothing about the diagram is stored: mutate
//! the graph (after the borrow ends) and build a new view to see the change.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_adaptor::prelude::*;
//!
//! let tds = Tds::from_triangles([0_u8, 1, 2], &[[0, 1, 2]]).unwrap();
//! let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
//!
//! assert_eq!(vd.number_of_faces(), 3);
//! assert_eq!(vd.number_of_vertices(), 1);
//! assert_eq!(vd.number_of_edges(), 3);
//! assert!(vd.halfedges().all(|h| h.is_unbounded()));
//! assert!(vd.is_valid());
//! ```

use std::env;

use thiserror::Error;

use super::{
    face::Face,
    halfedge::{Halfedge, Position},
    vertex::Vertex,
};
use crate::core::{
    algorithms::traversal::{find_valid_vertex, is_accepted, is_collapsed},
    collections::CellIndex,
    edge::DualEdge,
    traits::{
        degeneracy::{EdgeDegeneracyTester, FaceDegeneracyTester},
        dual_graph::{DualGraph, ccw},
    },
    triangulation_data_structure::ValidationOptions,
};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors from building or following a handle of the Voronoi view.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    /// The halfedge comes in from infinity.
    #[error("Halfedge has no source vertex")]
    NoSource,
    /// The halfedge runs off to infinity.
    #[error("Halfedge has no target vertex")]
    NoTarget,
    /// No halfedge bounds the face or reaches the vertex.
    #[error("No boundary halfedge exists")]
    NoBoundary,
    /// The handle kind does not match the dimension of the dual graph.
    #[error("Operation requires dimension {expected}, dual graph has dimension {actual}")]
    DimensionMismatch {
        /// Dimension the operation works in.
        expected: i32,
        /// Dimension of the dual graph.
        actual: i32,
    },
    /// The edge has zero length: the edge policy collapses it, or it joins a
    /// surviving site to one the face policy removes.
    #[error("Dual edge is degenerate")]
    DegenerateEdge,
    /// The face policy removes the cell of this site.
    #[error("Face of the site is degenerate")]
    DegenerateFace,
    /// The dual edge has the infinite vertex as an endpoint.
    #[error("Dual edge is infinite")]
    InfiniteEdge,
    /// The dual face is incident to the infinite vertex.
    #[error("Dual face is infinite")]
    InfiniteFace,
    /// The dual vertex is the infinite vertex.
    #[error("Dual vertex is infinite")]
    InfiniteVertex,
    /// The local edge index is outside `0..=2`.
    #[error("Edge index {index} is out of range")]
    InvalidIndex {
        /// The rejected index.
        index: CellIndex,
    },
    /// The two dual vertices share no edge.
    #[error("Dual vertices are not adjacent")]
    NotAdjacent,
    /// The face handle does not belong to the dual graph.
    #[error("Unknown dual face")]
    UnknownFace,
    /// The vertex handle does not belong to the dual graph.
    #[error("Unknown dual vertex")]
    UnknownVertex,
}

/// A single inconsistency found while validating the view.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagramValidationError {
    /// A halfedge breaks one of its local invariants.
    #[error("Invalid halfedge at {position}: {message}")]
    InvalidHalfedge {
        /// Debug rendering of the halfedge position.
        position: String,
        /// What went wrong.
        message: String,
    },
    /// A face breaks one of its local invariants.
    #[error("Invalid face of site {site}: {message}")]
    InvalidFace {
        /// Debug rendering of the site handle.
        site: String,
        /// What went wrong.
        message: String,
    },
    /// A vertex breaks one of its local invariants.
    #[error("Invalid vertex at {face}: {message}")]
    InvalidVertex {
        /// Debug rendering of the canonical face.
        face: String,
        /// What went wrong.
        message: String,
    },
    /// Halfedges do not pair up into edges.
    #[error("{halfedges} halfedges do not pair up into {edges} edges")]
    UnpairedHalfedges {
        /// Number of enumerated halfedges.
        halfedges: usize,
        /// Number of enumerated edges.
        edges: usize,
    },
    /// `V + 1 - E + F` is not 2.
    #[error("Euler characteristic of the diagram is {actual}, expected {expected}")]
    EulerCharacteristic {
        /// Expected value.
        expected: i64,
        /// Computed value.
        actual: i64,
    },
}

/// Which invariant a [`DiagramViolation`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagramInvariantKind {
    /// Per-halfedge checks.
    Halfedges,
    /// Per-face checks.
    Faces,
    /// Per-vertex checks.
    Vertices,
    /// Every halfedge has a distinct opposite.
    EdgePairing,
    /// Euler characteristic of the closed-up diagram.
    EulerCharacteristic,
}

/// One failed invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramViolation {
    /// Invariant group.
    pub kind: DiagramInvariantKind,
    /// Details.
    pub error: DiagramValidationError,
}

/// Every invariant violation found by [`VoronoiDiagram::validation_report`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagramValidationReport {
    /// The violations in the order they were found.
    pub violations: Vec<DiagramViolation>,
}

impl DiagramValidationReport {
    /// Returns `true` if nothing was reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Set this environment variable to log every validation failure.
pub const DEBUG_VALIDATION_ENV: &str = "VORONOI_DEBUG_VALIDATION";

// =============================================================================
// STRUCT DEFINITION
// =============================================================================

/// Voronoi view of a dual graph under an edge policy `E` and a face policy `F`.
#[derive(Clone, Debug)]
pub struct VoronoiDiagram<'g, G: ?Sized, E, F> {
    dual: &'g G,
    edge_tester: E,
    face_tester: F,
}

impl<'g, G, E, F> VoronoiDiagram<'g, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    /// Creates the view.
    pub const fn new(dual: &'g G, edge_tester: E, face_tester: F) -> Self {
        Self {
            dual,
            edge_tester,
            face_tester,
        }
    }

    /// The dual graph.
    #[inline]
    #[must_use]
    pub const fn dual(&self) -> &'g G {
        self.dual
    }

    /// The edge policy.
    #[inline]
    #[must_use]
    pub const fn edge_tester(&self) -> &E {
        &self.edge_tester
    }

    /// The face policy.
    #[inline]
    #[must_use]
    pub const fn face_tester(&self) -> &F {
        &self.face_tester
    }

    /// Dimension of the dual graph.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> i32 {
        self.dual.dimension()
    }

    /// Returns `true` if the cell of the finite site `v` is removed by the face
    /// policy. Only consulted in dimension 2.
    pub(crate) fn is_degenerate_site(&self, v: G::VertexHandle) -> bool {
        !self.dual.is_infinite_vertex(v) && self.face_tester.is_degenerate_face(self.dual, v)
    }

    fn require_dimension(&self, expected: i32) -> Result<(), NavigationError> {
        let actual = self.dimension();
        if actual == expected {
            Ok(())
        } else {
            Err(NavigationError::DimensionMismatch { expected, actual })
        }
    }

    // -------------------------------------------------------------------------
    // Handle factories
    // -------------------------------------------------------------------------

    /// The halfedge dual to the edge `(face, index)` of a 2D graph.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] if the graph is not 2D, the position does
    /// not exist, or the edge is infinite or degenerate, or the cell it bounds
    /// is degenerate. An edge from a surviving site to a vanished one between
    /// two finite faces has zero length and is reported as
    /// [`NavigationError::DegenerateEdge`].
    pub fn halfedge_2d(
        &self,
        face: G::FaceHandle,
        index: CellIndex,
    ) -> Result<Halfedge<'_, G, E, F>, NavigationError> {
        self.require_dimension(2)?;
        if !self.dual.contains_face(face) {
            return Err(NavigationError::UnknownFace);
        }
        if index > 2 {
            return Err(NavigationError::InvalidIndex { index });
        }
        if self.dual.is_infinite_edge(face, index) {
            return Err(NavigationError::InfiniteEdge);
        }
        if self.edge_tester.is_degenerate_edge(self.dual, face, index) {
            return Err(NavigationError::DegenerateEdge);
        }
        if self.is_degenerate_site(self.dual.vertex(face, ccw(index))) {
            return Err(NavigationError::DegenerateFace);
        }
        if is_collapsed(self.dual, &self.edge_tester, &self.face_tester, face, index) {
            return Err(NavigationError::DegenerateEdge);
        }
        Ok(Halfedge::new(self, Position::Planar { face, index }))
    }

    /// The halfedge between the cells of two adjacent sites of a 1D graph,
    /// bounding the cell of `v1`.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] if the graph is not 1D, either handle is
    /// unknown or infinite, or the sites are not adjacent.
    ///
    /// Both sites must be finite. The bisectors of a collinear diagram are
    /// full lines, so a path end has no halfedge towards the infinite vertex:
    /// passing it as `v1` or `v2` returns [`NavigationError::InfiniteVertex`],
    /// and [`Halfedge::next`] at the last site returns the halfedge itself.
    pub fn halfedge_1d(
        &self,
        v1: G::VertexHandle,
        v2: G::VertexHandle,
    ) -> Result<Halfedge<'_, G, E, F>, NavigationError> {
        self.require_dimension(1)?;
        if !self.dual.contains_vertex(v1) || !self.dual.contains_vertex(v2) {
            return Err(NavigationError::UnknownVertex);
        }
        if self.dual.is_infinite_vertex(v1) || self.dual.is_infinite_vertex(v2) {
            return Err(NavigationError::InfiniteVertex);
        }
        if !self.dual.incident_vertices(v1).any(|w| w == v2) {
            return Err(NavigationError::NotAdjacent);
        }
        Ok(Halfedge::new(self, Position::Collinear { v1, v2 }))
    }

    /// The face (cell) of the site `v`.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] if `v` is unknown or infinite, or its
    /// cell is degenerate in a 2D graph.
    pub fn face(&self, v: G::VertexHandle) -> Result<Face<'_, G, E, F>, NavigationError> {
        if !self.dual.contains_vertex(v) {
            return Err(NavigationError::UnknownVertex);
        }
        if self.dual.is_infinite_vertex(v) {
            return Err(NavigationError::InfiniteVertex);
        }
        if self.dimension() == 2 && self.is_degenerate_site(v) {
            return Err(NavigationError::DegenerateFace);
        }
        Ok(Face::new(self, v))
    }

    /// The output vertex dual to the finite face `f`, resolved to the
    /// canonical face of its cluster.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] if the graph is not 2D or `f` is unknown
    /// or infinite.
    pub fn vertex(&self, f: G::FaceHandle) -> Result<Vertex<'_, G, E, F>, NavigationError> {
        self.require_dimension(2)?;
        if !self.dual.contains_face(f) {
            return Err(NavigationError::UnknownFace);
        }
        if self.dual.is_infinite_face(f) {
            return Err(NavigationError::InfiniteFace);
        }
        Ok(Vertex::new(
            self,
            find_valid_vertex(self.dual, &self.edge_tester, &self.face_tester, f),
        ))
    }

    /// The dual edge of a halfedge.
    ///
    /// # Errors
    ///
    /// See [`Halfedge::dual_edge`].
    pub fn dual_edge(
        &self,
        h: &Halfedge<'_, G, E, F>,
    ) -> Result<DualEdge<G::FaceHandle>, NavigationError> {
        h.dual_edge()
    }

    // -------------------------------------------------------------------------
    // Enumeration
    // -------------------------------------------------------------------------

    /// Every face of the view, one per surviving site.
    pub fn faces(&self) -> impl Iterator<Item = Face<'_, G, E, F>> {
        let planar = self.dimension() == 2;
        self.dual
            .finite_vertices()
            .filter(move |&v| !planar || !self.is_degenerate_site(v))
            .map(move |v| Face::new(self, v))
    }

    /// Faces with a closed boundary.
    pub fn bounded_faces(&self) -> impl Iterator<Item = Face<'_, G, E, F>> {
        self.faces().filter(|f| !f.is_unbounded())
    }

    /// Faces extending to infinity.
    pub fn unbounded_faces(&self) -> impl Iterator<Item = Face<'_, G, E, F>> {
        self.faces().filter(Face::is_unbounded)
    }

    /// Every halfedge of the view.
    pub fn halfedges(&self) -> Box<dyn Iterator<Item = Halfedge<'_, G, E, F>> + '_> {
        match self.dimension() {
            2 => Box::new(
                self.dual
                    .faces()
                    .flat_map(|f| (0..3).map(move |i| (f, i)))
                    .filter(move |&(f, i)| {
                        is_accepted(self.dual, &self.edge_tester, &self.face_tester, f, i)
                            && !self.is_degenerate_site(self.dual.vertex(f, ccw(i)))
                    })
                    .map(move |(face, index)| {
                        Halfedge::new(self, Position::Planar { face, index })
                    }),
            ),
            1 => Box::new(self.dual.finite_vertices().flat_map(move |v1| {
                self.dual
                    .incident_vertices(v1)
                    .filter(move |&w| !self.dual.is_infinite_vertex(w))
                    .map(move |v2| Halfedge::new(self, Position::Collinear { v1, v2 }))
            })),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// One halfedge per edge.
    pub fn edges(&self) -> impl Iterator<Item = Halfedge<'_, G, E, F>> {
        self.halfedges()
            .filter(|h| h.position() <= h.opposite().position())
    }

    /// Halfedges with both a source and a target.
    pub fn bounded_halfedges(&self) -> impl Iterator<Item = Halfedge<'_, G, E, F>> {
        self.halfedges().filter(|h| !h.is_unbounded())
    }

    /// Halfedges with an end at infinity.
    pub fn unbounded_halfedges(&self) -> impl Iterator<Item = Halfedge<'_, G, E, F>> {
        self.halfedges().filter(Halfedge::is_unbounded)
    }

    /// Every output vertex, once per cluster.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex<'_, G, E, F>> {
        let planar = self.dimension() == 2;
        self.dual
            .faces()
            .filter(move |&f| {
                planar
                    && !self.dual.is_infinite_face(f)
                    && find_valid_vertex(self.dual, &self.edge_tester, &self.face_tester, f) == f
            })
            .map(move |f| Vertex::new(self, f))
    }

    /// Number of faces.
    #[must_use]
    pub fn number_of_faces(&self) -> usize {
        self.faces().count()
    }

    /// Number of halfedges.
    #[must_use]
    pub fn number_of_halfedges(&self) -> usize {
        self.halfedges().count()
    }

    /// Number of edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.edges().count()
    }

    /// Number of output vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices().count()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Returns `true` if [`validation_report`](Self::validation_report) finds
    /// nothing with default options.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_report(ValidationOptions::default()).is_ok()
    }

    /// Checks every halfedge, face and vertex of the view, edge pairing and,
    /// if requested, the Euler characteristic, collecting all violations.
    ///
    /// Failures are logged at debug level when the
    /// [`DEBUG_VALIDATION_ENV`] environment variable is set.
    ///
    /// # Errors
    ///
    /// Returns a [`DiagramValidationReport`] listing every violation.
    pub fn validation_report(
        &self,
        options: ValidationOptions,
    ) -> Result<(), DiagramValidationReport> {
        let mut violations = Vec::new();

        for h in self.halfedges() {
            if let Err(message) = h.check() {
                violations.push(DiagramViolation {
                    kind: DiagramInvariantKind::Halfedges,
                    error: DiagramValidationError::InvalidHalfedge {
                        position: format!("{:?}", h.position()),
                        message: message.to_string(),
                    },
                });
            }
        }
        for f in self.faces() {
            if let Err(message) = f.check() {
                violations.push(DiagramViolation {
                    kind: DiagramInvariantKind::Faces,
                    error: DiagramValidationError::InvalidFace {
                        site: format!("{:?}", f.dual()),
                        message: message.to_string(),
                    },
                });
            }
        }
        for v in self.vertices() {
            if let Err(message) = v.check() {
                violations.push(DiagramViolation {
                    kind: DiagramInvariantKind::Vertices,
                    error: DiagramValidationError::InvalidVertex {
                        face: format!("{:?}", v.dual()),
                        message: message.to_string(),
                    },
                });
            }
        }

        let halfedges = self.number_of_halfedges();
        let edges = self.number_of_edges();
        if halfedges != 2 * edges {
            violations.push(DiagramViolation {
                kind: DiagramInvariantKind::EdgePairing,
                error: DiagramValidationError::UnpairedHalfedges { halfedges, edges },
            });
        }

        if options.check_euler_characteristic && self.dimension() == 2 {
            // Closing the diagram with one vertex at infinity gives a sphere.
            let v = i64::try_from(self.number_of_vertices()).unwrap_or(i64::MAX);
            let e = i64::try_from(edges).unwrap_or(i64::MAX);
            let f = i64::try_from(self.number_of_faces()).unwrap_or(i64::MAX);
            let actual = v + 1 - e + f;
            if actual != 2 {
                violations.push(DiagramViolation {
                    kind: DiagramInvariantKind::EulerCharacteristic,
                    error: DiagramValidationError::EulerCharacteristic {
                        expected: 2,
                        actual,
                    },
                });
            }
        }

        if violations.is_empty() {
            return Ok(());
        }
        if env::var_os(DEBUG_VALIDATION_ENV).is_some() {
            for violation in &violations {
                tracing::debug!(
                    "[voronoi] validation failed ({:?}): {}",
                    violation.kind,
                    violation.error
                );
            }
        }
        Err(DiagramValidationReport { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        traits::degeneracy::{EdgeSet, NoDegeneracy, VertexSet},
        triangulation_data_structure::Tds,
    };

    fn square() -> Tds<char> {
        Tds::from_triangles(['a', 'b', 'c', 'd'], &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn plain_dual_of_a_square() {
        let tds = square();
        let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
        assert_eq!(vd.number_of_faces(), 4);
        assert_eq!(vd.number_of_vertices(), 2);
        assert_eq!(vd.number_of_edges(), 5);
        assert_eq!(vd.number_of_halfedges(), 10);
        assert_eq!(vd.bounded_halfedges().count(), 2);
        assert_eq!(vd.bounded_faces().count(), 0);
        assert!(
            vd.validation_report(ValidationOptions {
                check_euler_characteristic: true
            })
            .is_ok()
        );
    }

    #[test]
    fn degenerate_diagonal_merges_the_two_vertices() {
        let tds = square();
        let keys: Vec<_> = tds.site_keys().collect();
        let mut policy = EdgeSet::new();
        policy.insert(keys[0], keys[2]);
        let vd = VoronoiDiagram::new(&tds, policy, NoDegeneracy);

        assert_eq!(vd.number_of_vertices(), 1);
        assert_eq!(vd.number_of_edges(), 4);
        let v = vd.vertices().next().unwrap();
        assert_eq!(v.degree(), 4);
        assert_eq!(v.cluster().len(), 2);
        for f in tds.finite_cells() {
            assert_eq!(vd.vertex(f).unwrap(), v);
        }
        assert!(
            vd.validation_report(ValidationOptions {
                check_euler_characteristic: true
            })
            .is_ok()
        );
    }

    #[test]
    fn factories_reject_bad_positions() {
        let tds = square();
        let keys: Vec<_> = tds.site_keys().collect();
        let mut edges = EdgeSet::new();
        edges.insert(keys[0], keys[2]);
        let faces: VertexSet = [keys[1]].into_iter().collect();
        let vd = VoronoiDiagram::new(&tds, edges, faces);

        let f = tds.finite_cells().next().unwrap();
        let infinite_face = tds.cell_keys().find(|&c| tds.is_infinite_face(c)).unwrap();
        assert_eq!(
            vd.halfedge_2d(f, 7).unwrap_err(),
            NavigationError::InvalidIndex { index: 7 }
        );
        assert_eq!(
            vd.vertex(infinite_face).unwrap_err(),
            NavigationError::InfiniteFace
        );
        assert_eq!(
            vd.face(tds.infinite_vertex()).unwrap_err(),
            NavigationError::InfiniteVertex
        );
        assert_eq!(vd.face(keys[1]).unwrap_err(), NavigationError::DegenerateFace);
        assert_eq!(
            vd.halfedge_1d(keys[0], keys[1]).unwrap_err(),
            NavigationError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );

        let mut saw_degenerate = false;
        for g in tds.cell_keys() {
            for i in 0..3 {
                match vd.halfedge_2d(g, i) {
                    Err(NavigationError::DegenerateEdge) => saw_degenerate = true,
                    Err(NavigationError::DegenerateFace) => {
                        assert_eq!(tds.vertex(g, ccw(i)), keys[1]);
                    }
                    Err(NavigationError::InfiniteEdge) => assert!(tds.is_infinite_edge(g, i)),
                    Err(e) => panic!("unexpected error {e}"),
                    Ok(h) => assert_ne!(h.face().dual(), keys[1]),
                }
            }
        }
        assert!(saw_degenerate);
    }

    #[test]
    fn empty_and_single_site_diagrams() {
        let empty: Tds<u8> = Tds::empty();
        let vd = VoronoiDiagram::new(&empty, NoDegeneracy, NoDegeneracy);
        assert_eq!(vd.number_of_faces(), 0);
        assert_eq!(vd.number_of_halfedges(), 0);
        assert!(vd.is_valid());

        let single = Tds::from_collinear([7_u8]);
        let vd = VoronoiDiagram::new(&single, NoDegeneracy, NoDegeneracy);
        assert_eq!(vd.number_of_faces(), 1);
        assert_eq!(vd.number_of_halfedges(), 0);
        assert_eq!(vd.number_of_vertices(), 0);
        let face = vd.faces().next().unwrap();
        assert!(face.is_unbounded());
        assert_eq!(face.halfedge().unwrap_err(), NavigationError::NoBoundary);
        assert!(vd.is_valid());
    }
}
