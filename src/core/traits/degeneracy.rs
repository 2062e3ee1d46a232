//! Degeneracy policies consulted by the Voronoi view.
//!
//! An *edge tester* decides whether a dual edge `(face, index)` collapses to a
//! point in the output diagram; its two endpoints (the outputs of the two
//! incident faces) then merge into a single output vertex. A *face tester*
//! decides whether the cell of a site vanishes from the output.
//!
//! Edge testers must be symmetric: `(f, i)` and its mirror
//! `(neighbor(f, i), mirror_index(f, i))` must get the same answer.
//!
//! Closures implement both traits, so ad-hoc policies need no new type:
//!
//! ```rust
//! use voronoi_adaptor::prelude::*;
//!
//! let tds = Tds::from_triangles([0_u8, 1, 2], &[[0, 1, 2]]).unwrap();
//! let nothing_degenerate = |_: &Tds<u8>, _: CellKey, _: CellIndex| false;
//! let f = tds.finite_cells().next().unwrap();
//! assert!(!nothing_degenerate.is_degenerate_edge(&tds, f, 0));
//! ```

use super::dual_graph::DualGraph;
use crate::core::{
    collections::{CellIndex, FastHashSet, VertexKeySet},
    edge::EdgeKey,
    triangulation_data_structure::{CellKey, Tds, VertexKey},
};

/// Decides whether a dual edge is degenerate.
pub trait EdgeDegeneracyTester<G: DualGraph + ?Sized> {
    /// Returns `true` if the edge `(face, index)` of `graph` is degenerate.
    fn is_degenerate_edge(&self, graph: &G, face: G::FaceHandle, index: CellIndex) -> bool;
}

/// Decides whether the cell of a site is degenerate.
pub trait FaceDegeneracyTester<G: DualGraph + ?Sized> {
    /// Returns `true` if the Voronoi cell of `vertex` is degenerate.
    fn is_degenerate_face(&self, graph: &G, vertex: G::VertexHandle) -> bool;
}

impl<G, T> EdgeDegeneracyTester<G> for T
where
    G: DualGraph + ?Sized,
    T: Fn(&G, G::FaceHandle, CellIndex) -> bool,
{
    #[inline]
    fn is_degenerate_edge(&self, graph: &G, face: G::FaceHandle, index: CellIndex) -> bool {
        self(graph, face, index)
    }
}

impl<G, T> FaceDegeneracyTester<G> for T
where
    G: DualGraph + ?Sized,
    T: Fn(&G, G::VertexHandle) -> bool,
{
    #[inline]
    fn is_degenerate_face(&self, graph: &G, vertex: G::VertexHandle) -> bool {
        self(graph, vertex)
    }
}

/// Identity policy: nothing is degenerate.
///
/// With this policy on both sides the Voronoi view is the plain dual of the
/// triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NoDegeneracy;

impl<G: DualGraph + ?Sized> EdgeDegeneracyTester<G> for NoDegeneracy {
    #[inline]
    fn is_degenerate_edge(&self, _: &G, _: G::FaceHandle, _: CellIndex) -> bool {
        false
    }
}

impl<G: DualGraph + ?Sized> FaceDegeneracyTester<G> for NoDegeneracy {
    #[inline]
    fn is_degenerate_face(&self, _: &G, _: G::VertexHandle) -> bool {
        false
    }
}

/// Edge policy backed by an explicit set of undirected edges.
#[derive(Clone, Debug, Default)]
pub struct EdgeSet {
    edges: FastHashSet<EdgeKey>,
}

impl EdgeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the edge between `a` and `b` as degenerate.
    pub fn insert(&mut self, a: VertexKey, b: VertexKey) -> bool {
        self.edges.insert(EdgeKey::new(a, b))
    }

    /// Returns `true` if the edge between `a` and `b` is marked.
    #[must_use]
    pub fn contains(&self, a: VertexKey, b: VertexKey) -> bool {
        self.edges.contains(&EdgeKey::new(a, b))
    }

    /// Number of marked edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no edge is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<EdgeKey> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = EdgeKey>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl<S> EdgeDegeneracyTester<Tds<S>> for EdgeSet {
    fn is_degenerate_edge(&self, graph: &Tds<S>, face: CellKey, index: CellIndex) -> bool {
        graph
            .edge_key(face, index)
            .is_some_and(|edge| self.edges.contains(&edge))
    }
}

/// Face policy backed by an explicit set of sites whose cells vanish.
#[derive(Clone, Debug, Default)]
pub struct VertexSet {
    vertices: VertexKeySet,
}

impl VertexSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the cell of `v` as degenerate.
    pub fn insert(&mut self, v: VertexKey) -> bool {
        self.vertices.insert(v)
    }

    /// Returns `true` if `v` is marked.
    #[must_use]
    pub fn contains(&self, v: VertexKey) -> bool {
        self.vertices.contains(&v)
    }
}

impl FromIterator<VertexKey> for VertexSet {
    fn from_iter<I: IntoIterator<Item = VertexKey>>(iter: I) -> Self {
        Self {
            vertices: iter.into_iter().collect(),
        }
    }
}

impl<S> FaceDegeneracyTester<Tds<S>> for VertexSet {
    fn is_degenerate_face(&self, _: &Tds<S>, vertex: VertexKey) -> bool {
        self.vertices.contains(&vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_set_is_symmetric_across_the_shared_edge() {
        let tds = Tds::from_triangles(['a', 'b', 'c', 'd'], &[[0, 1, 2], [0, 2, 3]]).unwrap();
        let keys: Vec<_> = tds.site_keys().collect();
        let policy: EdgeSet = [EdgeKey::new(keys[0], keys[2])].into_iter().collect();
        assert_eq!(policy.len(), 1);
        assert!(policy.contains(keys[2], keys[0]));

        let mut hits = 0;
        for f in tds.cell_keys() {
            for i in 0..3 {
                let degenerate = policy.is_degenerate_edge(&tds, f, i);
                let n = tds.neighbor(f, i);
                let j = tds.mirror_index(f, i);
                assert_eq!(degenerate, policy.is_degenerate_edge(&tds, n, j));
                hits += usize::from(degenerate);
            }
        }
        // Seen once from each side.
        assert_eq!(hits, 2);
    }

    #[test]
    fn vertex_set_and_identity_policies() {
        let tds = Tds::from_triangles([0_u8, 1, 2], &[[0, 1, 2]]).unwrap();
        let v = tds.site_keys().next().unwrap();
        let mut policy = VertexSet::new();
        assert!(policy.insert(v));
        assert!(policy.is_degenerate_face(&tds, v));
        assert!(!policy.is_degenerate_face(&tds, tds.infinite_vertex()));
        assert!(!NoDegeneracy.is_degenerate_face(&tds, v));

        let f = tds.finite_cells().next().unwrap();
        assert!(!NoDegeneracy.is_degenerate_edge(&tds, f, 0));
    }

    #[test]
    fn closures_are_policies() {
        let tds = Tds::from_triangles([0_u8, 1, 2], &[[0, 1, 2]]).unwrap();
        let infinite = tds.infinite_vertex();
        let only_infinite = move |_: &Tds<u8>, v: VertexKey| v == infinite;
        assert!(only_infinite.is_degenerate_face(&tds, infinite));
        let v = tds.site_keys().next().unwrap();
        assert!(!only_infinite.is_degenerate_face(&tds, v));
    }
}
