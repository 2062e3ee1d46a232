//! Edge and face degeneracy policies working on the same triangulation.

use voronoi_adaptor::prelude::*;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn euler() -> ValidationOptions {
    ValidationOptions {
        check_euler_characteristic: true,
    }
}

// =============================================================================
// COCIRCULAR GRIDS
// =============================================================================

#[test]
fn cocircular_grid_collapses_every_square() {
    init_tracing();
    for (rows, cols, seed) in [(2, 2, 0), (3, 4, 1), (4, 5, 2), (5, 5, 3)] {
        let tds = grid_triangulation(rows, cols, seed).unwrap();
        let vd = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);
        let (r, c) = (rows as usize, cols as usize);

        assert_eq!(vd.number_of_vertices(), (r - 1) * (c - 1));
        assert_eq!(vd.number_of_faces(), r * c);
        assert_eq!(vd.bounded_faces().count(), (r - 2) * (c - 2));
        for v in vd.vertices() {
            assert_eq!(v.cluster().len(), 2);
            assert_eq!(v.degree(), 4);
        }
        for f in vd.bounded_faces() {
            assert_eq!(f.ccb().unwrap().count(), 4);
        }
        assert!(vd.validation_report(euler()).is_ok(), "{rows}x{cols}");
    }
}

#[test]
fn every_face_of_a_cluster_names_the_same_vertex() {
    init_tracing();
    let tds = grid_triangulation(4, 4, 9).unwrap();
    let vd = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);

    for v in vd.vertices() {
        for f in v.cluster() {
            assert_eq!(vd.vertex(f).unwrap(), v);
        }
    }
    let distinct: FastHashSet<CellKey> = tds
        .finite_cells()
        .map(|f| vd.vertex(f).unwrap().dual())
        .collect();
    assert_eq!(distinct.len(), vd.number_of_vertices());
}

#[test]
fn no_zero_length_segment_survives() {
    init_tracing();
    let tds = grid_triangulation(4, 6, 4).unwrap();
    let vd = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);

    for h in vd.bounded_halfedges() {
        let Ok(VoronoiCurve::Segment { source, target }) = h.curve(&PointSiteCurves) else {
            panic!("bounded halfedges are segments");
        };
        assert!((target - source).squared_norm() > 0.5);
    }
}

// =============================================================================
// VANISHING CELLS
// =============================================================================

#[test]
fn vanished_corner_leaves_the_diagram_of_the_other_sites() {
    init_tracing();
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
    let b = tds.site_keys().nth(1).unwrap();
    let faces: VertexSet = [b].into_iter().collect();
    let vd = VoronoiDiagram::new(&tds, CocircularEdges, faces);

    // Three cocircular sites around one vertex.
    assert_eq!(vd.number_of_faces(), 3);
    assert_eq!(vd.number_of_edges(), 3);
    assert_eq!(vd.number_of_vertices(), 1);
    let v = vd.vertices().next().unwrap();
    assert_eq!(v.degree(), 3);
    assert!(v.incident_halfedges().unwrap().all(|h| h.face().dual() != b));
    for f in vd.faces() {
        assert_eq!(f.ccb().unwrap().count(), 2);
    }
    assert!(vd.validation_report(euler()).is_ok());
}

#[test]
fn closure_policies_compose_with_sets() {
    init_tracing();
    let tds = fan_triangulation(6, 1.0).unwrap();
    let center = tds.site_keys().next().unwrap();
    let rim: Vec<_> = tds.site_keys().skip(1).collect();

    // Merge opposite pairs of fan triangles by collapsing three spokes.
    let mut edges = EdgeSet::new();
    for &w in rim.iter().step_by(2) {
        edges.insert(center, w);
    }
    let vd = VoronoiDiagram::new(&tds, edges.clone(), NoDegeneracy);
    assert_eq!(vd.number_of_vertices(), 3);
    assert_eq!(vd.face(center).unwrap().ccb().unwrap().count(), 3);
    assert!(vd.validation_report(euler()).is_ok());

    // The same policy as a closure.
    let closure = move |g: &Tds<Point>, f: CellKey, i: CellIndex| {
        g.edge_key(f, i).is_some_and(|e| {
            let (a, b) = e.endpoints();
            edges.contains(a, b)
        })
    };
    let vd2 = VoronoiDiagram::new(&tds, closure, NoDegeneracy);
    assert_eq!(vd2.number_of_vertices(), 3);
    assert_eq!(vd2.number_of_halfedges(), vd.number_of_halfedges());
}

#[test]
fn degenerate_positions_are_refused_by_factories() {
    init_tracing();
    let tds = grid_triangulation(2, 2, 0).unwrap();
    let vd = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);

    let (f, i) = tds
        .finite_cells()
        .flat_map(|f| (0..3).map(move |i| (f, i)))
        .find(|&(f, i)| CocircularEdges.is_degenerate_edge(&tds, f, i))
        .unwrap();
    assert_eq!(
        vd.halfedge_2d(f, i).unwrap_err(),
        NavigationError::DegenerateEdge
    );
    // Both triangles resolve to the same vertex.
    let g = tds.neighbor(f, i);
    assert_eq!(vd.vertex(f).unwrap(), vd.vertex(g).unwrap());
}
