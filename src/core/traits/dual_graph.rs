//! The dual graph interface consumed by the Voronoi view.
//!
//! A dual graph is a 2D triangulation data structure in the style of
//! [CGAL's `TDS_2`](https://doc.cgal.org/latest/TDS_2/index.html): every face
//! (cell) has three vertices and three neighbors indexed `0..=2`, neighbor `i`
//! lies opposite vertex `i`, and the vertices of a face are stored in
//! counterclockwise order. The unbounded region is closed up with a single
//! *infinite vertex*; faces incident to it are infinite faces.
//!
//! In dimension 1 (all sites collinear) the cells are segments with two
//! vertices and two neighbors and the graph is a cycle through the infinite
//! vertex. An edge of a 1D graph is addressed as `(cell, 2)`.

use std::{fmt::Debug, hash::Hash};

use crate::core::collections::CellIndex;

/// Returns the index following `i` counterclockwise in a triangle.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::traits::dual_graph::{ccw, cw};
///
/// assert_eq!(ccw(0), 1);
/// assert_eq!(ccw(2), 0);
/// assert_eq!(cw(ccw(1)), 1);
/// ```
#[inline]
#[must_use]
pub const fn ccw(i: CellIndex) -> CellIndex {
    (i + 1) % 3
}

/// Returns the index following `i` clockwise in a triangle.
#[inline]
#[must_use]
pub const fn cw(i: CellIndex) -> CellIndex {
    (i + 2) % 3
}

/// Local index used to address the single edge of a 1D cell.
pub const COLLINEAR_EDGE_INDEX: CellIndex = 2;

/// Read-only incidence queries over a 2D (or degenerate 1D) triangulation.
///
/// Handles are cheap `Copy` values. All methods may panic when handed a
/// handle that does not belong to this graph; use
/// [`contains_vertex`](Self::contains_vertex) and
/// [`contains_face`](Self::contains_face) to check foreign handles first.
pub trait DualGraph {
    /// Handle naming a vertex (a site, or the infinite vertex).
    type VertexHandle: Copy + Eq + Ord + Hash + Debug;
    /// Handle naming a face (cell) of the triangulation.
    type FaceHandle: Copy + Eq + Ord + Hash + Debug;

    /// Combinatorial dimension: `-1` without sites, `0` for a single site,
    /// `1` when all sites are collinear, `2` otherwise.
    fn dimension(&self) -> i32;

    /// The infinite vertex.
    fn infinite_vertex(&self) -> Self::VertexHandle;

    /// Returns `true` if `v` is the infinite vertex.
    fn is_infinite_vertex(&self, v: Self::VertexHandle) -> bool {
        v == self.infinite_vertex()
    }

    /// Returns `true` if the face has the infinite vertex among its vertices.
    fn is_infinite_face(&self, f: Self::FaceHandle) -> bool;

    /// Returns `true` if the edge `(f, i)` has the infinite vertex as an endpoint.
    ///
    /// In dimension 2 the endpoints are `vertex(f, ccw(i))` and
    /// `vertex(f, cw(i))`; in dimension 1 the edge is the whole cell.
    fn is_infinite_edge(&self, f: Self::FaceHandle, i: CellIndex) -> bool {
        if self.dimension() == 1 {
            return self.is_infinite_face(f);
        }
        self.is_infinite_vertex(self.vertex(f, ccw(i)))
            || self.is_infinite_vertex(self.vertex(f, cw(i)))
    }

    /// The `i`-th vertex of `f`.
    fn vertex(&self, f: Self::FaceHandle, i: CellIndex) -> Self::VertexHandle;

    /// The neighbor of `f` opposite its `i`-th vertex.
    fn neighbor(&self, f: Self::FaceHandle, i: CellIndex) -> Self::FaceHandle;

    /// The index of the edge `(f, i)` as seen from `neighbor(f, i)`.
    fn mirror_index(&self, f: Self::FaceHandle, i: CellIndex) -> CellIndex;

    /// The vertex of `neighbor(f, i)` opposite the shared edge.
    fn mirror_vertex(&self, f: Self::FaceHandle, i: CellIndex) -> Self::VertexHandle {
        self.vertex(self.neighbor(f, i), self.mirror_index(f, i))
    }

    /// Index of `v` in `f`, if `f` contains it.
    fn index_of(&self, f: Self::FaceHandle, v: Self::VertexHandle) -> Option<CellIndex>;

    /// Returns `true` if the vertex handle is live in this graph.
    fn contains_vertex(&self, v: Self::VertexHandle) -> bool;

    /// Returns `true` if the face handle is live in this graph.
    fn contains_face(&self, f: Self::FaceHandle) -> bool;

    /// Total number of faces, infinite ones included.
    fn number_of_faces(&self) -> usize;

    /// Vertices adjacent to `v`, counterclockwise in dimension 2.
    ///
    /// The starting vertex is fixed for a given graph state, so two calls
    /// yield the same sequence.
    fn incident_vertices(&self, v: Self::VertexHandle)
    -> impl Iterator<Item = Self::VertexHandle> + '_;

    /// Edges incident to `v`.
    ///
    /// In dimension 2 every yielded `(f, i)` satisfies `vertex(f, ccw(i)) == v`,
    /// counterclockwise around `v`. In dimension 1 the yielded edges are
    /// `(f, COLLINEAR_EDGE_INDEX)` for the (at most two) cells containing `v`.
    fn incident_edges(
        &self,
        v: Self::VertexHandle,
    ) -> impl Iterator<Item = (Self::FaceHandle, CellIndex)> + '_;

    /// All finite vertices (the sites).
    fn finite_vertices(&self) -> impl Iterator<Item = Self::VertexHandle> + '_;

    /// All faces, infinite ones included.
    fn faces(&self) -> impl Iterator<Item = Self::FaceHandle> + '_;
}

impl<G: DualGraph + ?Sized> DualGraph for &G {
    type VertexHandle = G::VertexHandle;
    type FaceHandle = G::FaceHandle;

    fn dimension(&self) -> i32 {
        (**self).dimension()
    }

    fn infinite_vertex(&self) -> Self::VertexHandle {
        (**self).infinite_vertex()
    }

    fn is_infinite_vertex(&self, v: Self::VertexHandle) -> bool {
        (**self).is_infinite_vertex(v)
    }

    fn is_infinite_face(&self, f: Self::FaceHandle) -> bool {
        (**self).is_infinite_face(f)
    }

    fn is_infinite_edge(&self, f: Self::FaceHandle, i: CellIndex) -> bool {
        (**self).is_infinite_edge(f, i)
    }

    fn vertex(&self, f: Self::FaceHandle, i: CellIndex) -> Self::VertexHandle {
        (**self).vertex(f, i)
    }

    fn neighbor(&self, f: Self::FaceHandle, i: CellIndex) -> Self::FaceHandle {
        (**self).neighbor(f, i)
    }

    fn mirror_index(&self, f: Self::FaceHandle, i: CellIndex) -> CellIndex {
        (**self).mirror_index(f, i)
    }

    fn mirror_vertex(&self, f: Self::FaceHandle, i: CellIndex) -> Self::VertexHandle {
        (**self).mirror_vertex(f, i)
    }

    fn index_of(&self, f: Self::FaceHandle, v: Self::VertexHandle) -> Option<CellIndex> {
        (**self).index_of(f, v)
    }

    fn contains_vertex(&self, v: Self::VertexHandle) -> bool {
        (**self).contains_vertex(v)
    }

    fn contains_face(&self, f: Self::FaceHandle) -> bool {
        (**self).contains_face(f)
    }

    fn number_of_faces(&self) -> usize {
        (**self).number_of_faces()
    }

    fn incident_vertices(
        &self,
        v: Self::VertexHandle,
    ) -> impl Iterator<Item = Self::VertexHandle> + '_ {
        (**self).incident_vertices(v)
    }

    fn incident_edges(
        &self,
        v: Self::VertexHandle,
    ) -> impl Iterator<Item = (Self::FaceHandle, CellIndex)> + '_ {
        (**self).incident_edges(v)
    }

    fn finite_vertices(&self) -> impl Iterator<Item = Self::VertexHandle> + '_ {
        (**self).finite_vertices()
    }

    fn faces(&self) -> impl Iterator<Item = Self::FaceHandle> + '_ {
        (**self).faces()
    }
}
