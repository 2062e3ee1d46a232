//! Policy-aware rotation around the dual graph.
//!
//! These resolvers turn a raw dual position into the one the Voronoi view
//! exposes, skipping every position the policies or the infinite vertex rule
//! out. They are plain functions of the graph and the two policies; nothing
//! is cached.
//!
//! # Rotation
//!
//! A position `(f, i)` names the edge opposite vertex `i` of face `f`. Its
//! *south* endpoint is `f.vertex(ccw(i))` and its *north* endpoint is
//! `f.vertex(cw(i))`. One rotation step
//!
//! ```text
//! (f, i) -> (f.neighbor(cw(i)), mirror_index(f, cw(i)))
//! ```
//!
//! keeps the south endpoint and moves counterclockwise around it;
//! [`previous_step`] undoes it.
//!
//! # Collapsed edges
//!
//! An edge between two finite faces has zero length in the Voronoi view when
//! the edge policy says so, or when either endpoint is a site whose cell the
//! face policy removes. Such an edge is skipped by every walk and glues its
//! two faces into one output vertex. Edges on the convex hull never collapse
//! through the face policy: the two hull edges of a vanished hull site are
//! joined by [`find_opposite`] instead.
//!
//! # Termination
//!
//! Rotation around a vertex of a valid triangulation returns to its start
//! after `degree` steps, so every loop here stops at the latest when it comes
//! back to where it started. A corrupted graph is not defended against.

use crate::core::{
    collections::{CellIndex, FastHashSet, fast_hash_set_with_capacity},
    traits::{
        degeneracy::{EdgeDegeneracyTester, FaceDegeneracyTester},
        dual_graph::{DualGraph, ccw, cw},
    },
};

/// A dual position `(face, index)`.
pub type PlanarPosition<G> = (<G as DualGraph>::FaceHandle, CellIndex);

/// The same edge seen from the other incident face.
#[inline]
pub fn twin<G: DualGraph + ?Sized>(
    graph: &G,
    face: G::FaceHandle,
    index: CellIndex,
) -> PlanarPosition<G> {
    (graph.neighbor(face, index), graph.mirror_index(face, index))
}

/// One counterclockwise rotation step around the south endpoint.
#[inline]
pub fn next_step<G: DualGraph + ?Sized>(
    graph: &G,
    face: G::FaceHandle,
    index: CellIndex,
) -> PlanarPosition<G> {
    let j = cw(index);
    (graph.neighbor(face, j), graph.mirror_index(face, j))
}

/// One clockwise rotation step around the south endpoint; inverse of
/// [`next_step`].
#[inline]
pub fn previous_step<G: DualGraph + ?Sized>(
    graph: &G,
    face: G::FaceHandle,
    index: CellIndex,
) -> PlanarPosition<G> {
    (
        graph.neighbor(face, index),
        ccw(graph.mirror_index(face, index)),
    )
}

/// Returns `true` if the edge `(face, index)` lies between two finite faces
/// and has zero length in the Voronoi view.
pub fn is_collapsed<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
    index: CellIndex,
) -> bool
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    if graph.is_infinite_face(face) || graph.is_infinite_face(graph.neighbor(face, index)) {
        return false;
    }
    edge_tester.is_degenerate_edge(graph, face, index)
        || face_tester.is_degenerate_face(graph, graph.vertex(face, ccw(index)))
        || face_tester.is_degenerate_face(graph, graph.vertex(face, cw(index)))
}

/// Returns `true` if the position survives in the Voronoi view: a finite edge
/// that neither policy [collapses](is_collapsed).
#[inline]
pub fn is_accepted<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
    index: CellIndex,
) -> bool
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    !graph.is_infinite_edge(face, index)
        && !edge_tester.is_degenerate_edge(graph, face, index)
        && !is_collapsed(graph, edge_tester, face_tester, face, index)
}

/// Rotates counterclockwise from `(face, index)` to the next accepted position
/// around the same south endpoint.
///
/// If no other position is accepted the walk comes back and returns the
/// start.
pub fn find_next<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
    index: CellIndex,
) -> PlanarPosition<G>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    let start = (face, index);
    let mut current = next_step(graph, face, index);
    while current != start && !is_accepted(graph, edge_tester, face_tester, current.0, current.1)
    {
        tracing::trace!("[traversal] find_next skips {current:?}");
        current = next_step(graph, current.0, current.1);
    }
    current
}

/// Rotates clockwise from `(face, index)` to the previous accepted position
/// around the same south endpoint.
///
/// Uses the same acceptance test as [`find_next`], so the two are inverses
/// on accepted positions.
pub fn find_previous<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
    index: CellIndex,
) -> PlanarPosition<G>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    let start = (face, index);
    let mut current = previous_step(graph, face, index);
    while current != start && !is_accepted(graph, edge_tester, face_tester, current.0, current.1)
    {
        tracing::trace!("[traversal] find_previous skips {current:?}");
        current = previous_step(graph, current.0, current.1);
    }
    current
}

/// Opposite of `(face, index)` when the cell of its north endpoint is
/// degenerate.
///
/// The twin would bound the vanished cell, so the walk continues around the
/// north endpoint to the next accepted edge and crosses back from there.
/// Every edge of the vanished site between two finite faces is collapsed, so
/// the walk only stops on the site's other hull edge.
pub fn find_opposite<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
    index: CellIndex,
) -> PlanarPosition<G>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    let (tf, ti) = twin(graph, face, index);
    let (nf, ni) = find_next(graph, edge_tester, face_tester, tf, ti);
    twin(graph, nf, ni)
}

/// Canonical representative of the output vertex dual to `face`.
///
/// Finite faces joined through [collapsed](is_collapsed) edges merge into one
/// output vertex; the representative is the smallest face handle of that
/// cluster. A site removed by the face policy therefore takes all finite faces
/// around it into a single cluster. Only edges between two finite faces take
/// part, so a cluster never reaches infinity. An infinite face is returned
/// unchanged.
pub fn find_valid_vertex<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
) -> G::FaceHandle
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    if graph.dimension() != 2 || graph.is_infinite_face(face) {
        return face;
    }

    let merges = (0..3).any(|i| is_collapsed(graph, edge_tester, face_tester, face, i));
    if !merges {
        return face;
    }

    let cluster = vertex_cluster(graph, edge_tester, face_tester, face);
    let canonical = cluster.iter().copied().min().unwrap_or(face);
    tracing::trace!(
        "[traversal] find_valid_vertex: {face:?} -> {canonical:?} (cluster of {})",
        cluster.len()
    );
    canonical
}

/// Every finite face of the cluster containing `face`; see
/// [`find_valid_vertex`]. The result starts with `face`.
pub fn vertex_cluster<G, E, F>(
    graph: &G,
    edge_tester: &E,
    face_tester: &F,
    face: G::FaceHandle,
) -> Vec<G::FaceHandle>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G> + ?Sized,
    F: FaceDegeneracyTester<G> + ?Sized,
{
    let mut cluster = vec![face];
    if graph.dimension() != 2 || graph.is_infinite_face(face) {
        return cluster;
    }
    let mut visited: FastHashSet<G::FaceHandle> = fast_hash_set_with_capacity(4);
    visited.insert(face);
    let mut next = 0;
    while let Some(&f) = cluster.get(next) {
        next += 1;
        for i in 0..3 {
            if is_collapsed(graph, edge_tester, face_tester, f, i)
                && visited.insert(graph.neighbor(f, i))
            {
                cluster.push(graph.neighbor(f, i));
            }
        }
    }
    cluster
}

/// Next halfedge of a collinear diagram: the neighbor of `v1` other than `v2`.
///
/// Returns `(v1, v2)` unchanged when that neighbor is the infinite vertex
/// (the end of the path).
pub fn next_collinear<G: DualGraph + ?Sized>(
    graph: &G,
    v1: G::VertexHandle,
    v2: G::VertexHandle,
) -> (G::VertexHandle, G::VertexHandle) {
    match graph.incident_vertices(v1).find(|&w| w != v2) {
        Some(w) if !graph.is_infinite_vertex(w) => (v1, w),
        _ => (v1, v2),
    }
}
