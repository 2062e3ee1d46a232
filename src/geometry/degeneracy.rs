//! Geometric degeneracy policies for triangulations of points.

use super::{
    point::Point,
    predicates::{InCircle, incircle},
};
use crate::core::{
    collections::CellIndex,
    traits::{degeneracy::EdgeDegeneracyTester, dual_graph::DualGraph},
    triangulation_data_structure::{CellKey, Tds},
};

/// Delaunay edge policy: an edge between two finite triangles is degenerate
/// when the four vertices lie on a common circle.
///
/// The two triangles then share their circumcenter, so their output vertices
/// coincide and the Voronoi edge between them has zero length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CocircularEdges;

impl EdgeDegeneracyTester<Tds<Point>> for CocircularEdges {
    fn is_degenerate_edge(&self, graph: &Tds<Point>, face: CellKey, index: CellIndex) -> bool {
        if graph.dimension() != 2 {
            return false;
        }
        let neighbor = graph.neighbor(face, index);
        if graph.is_infinite_face(face) || graph.is_infinite_face(neighbor) {
            return false;
        }
        let site = |v| graph.site(v);
        let (Some(a), Some(b), Some(c), Some(d)) = (
            site(graph.vertex(face, 0)),
            site(graph.vertex(face, 1)),
            site(graph.vertex(face, 2)),
            site(graph.mirror_vertex(face, index)),
        ) else {
            return false;
        };
        incircle(a, b, c, d) == InCircle::BOUNDARY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_diagonal_is_cocircular_and_symmetric() {
        let tds = Tds::from_triangles(
            [
                Point::new([0.0, 0.0]),
                Point::new([1.0, 0.0]),
                Point::new([1.0, 1.0]),
                Point::new([0.0, 1.0]),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();

        let mut degenerate = Vec::new();
        for f in tds.cell_keys() {
            for i in 0..3 {
                if CocircularEdges.is_degenerate_edge(&tds, f, i) {
                    degenerate.push(tds.edge_key(f, i).unwrap());
                }
            }
        }
        assert_eq!(degenerate.len(), 2);
        assert_eq!(degenerate[0], degenerate[1]);
    }

    #[test]
    fn kite_diagonal_is_not_cocircular() {
        let tds = Tds::from_triangles(
            [
                Point::new([0.0, 0.0]),
                Point::new([2.0, 0.0]),
                Point::new([1.0, 3.0]),
                Point::new([1.0, -0.5]),
            ],
            &[[0, 1, 2], [0, 3, 1]],
        )
        .unwrap();
        assert!(tds.cell_keys().all(|f| {
            (0..3).all(|i| !CocircularEdges.is_degenerate_edge(&tds, f, i))
        }));
    }
}
