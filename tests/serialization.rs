//! JSON round trips of triangulations and curves.
//!
//! A [`Tds`] serializes as its sites plus its finite triangles (or a collinear
//! marker), so a deserialized copy gets fresh keys but describes the same
//! diagram.

use voronoi_adaptor::prelude::*;

fn counts<E, F>(vd: &VoronoiDiagram<'_, Tds<Point>, E, F>) -> [usize; 5]
where
    E: EdgeDegeneracyTester<Tds<Point>>,
    F: FaceDegeneracyTester<Tds<Point>>,
{
    [
        vd.number_of_faces(),
        vd.bounded_faces().count(),
        vd.number_of_halfedges(),
        vd.number_of_edges(),
        vd.number_of_vertices(),
    ]
}

#[test]
fn planar_round_trip_preserves_the_diagram() {
    for seed in [1, 7, 42] {
        let tds = random_triangulation(4, 5, 60, seed).unwrap();
        let json = serde_json::to_string(&tds).unwrap();
        let restored: Tds<Point> = serde_json::from_str(&json).unwrap();
        assert!(restored.is_valid().is_ok());

        let before = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
        let after = VoronoiDiagram::new(&restored, NoDegeneracy, NoDegeneracy);
        assert_eq!(counts(&before), counts(&after));

        let curves = |vd: &VoronoiDiagram<'_, Tds<Point>, NoDegeneracy, NoDegeneracy>| {
            let mut sources: Vec<String> = vd
                .bounded_halfedges()
                .map(|h| format!("{:?}", h.curve(&PointSiteCurves).unwrap()))
                .collect();
            sources.sort();
            sources
        };
        assert_eq!(curves(&before), curves(&after));
    }
}

#[test]
fn cocircular_grid_round_trip() {
    let tds = grid_triangulation(3, 3, 8).unwrap();
    let json = serde_json::to_string(&tds).unwrap();
    let restored: Tds<Point> = serde_json::from_str(&json).unwrap();

    let before = VoronoiDiagram::new(&tds, CocircularEdges, NoDegeneracy);
    let after = VoronoiDiagram::new(&restored, CocircularEdges, NoDegeneracy);
    assert_eq!(counts(&before), counts(&after));
    assert_eq!(after.number_of_vertices(), 4);
}

#[test]
fn collinear_round_trip() {
    let tds = Tds::from_collinear(collinear_sites(5));
    let json = serde_json::to_string(&tds).unwrap();
    assert!(json.contains("collinear"));
    let restored: Tds<Point> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.dimension(), 1);

    let before = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
    let after = VoronoiDiagram::new(&restored, NoDegeneracy, NoDegeneracy);
    assert_eq!(counts(&before), counts(&after));
}

#[test]
fn malformed_layouts_are_rejected() {
    let json = r#"{"sites":[[0.0,0.0],[1.0,0.0],[0.0,1.0]],"layout":{"triangles":[[0,1,7]]}}"#;
    assert!(serde_json::from_str::<Tds<Point>>(json).is_err());
}

#[test]
fn curves_serialize_with_their_kind() {
    let tds = Tds::from_triangles(
        [
            Point::new([0.0, 0.0]),
            Point::new([2.0, 0.0]),
            Point::new([0.0, 2.0]),
        ],
        &[[0, 1, 2]],
    )
    .unwrap();
    let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
    let h = vd.halfedges().find(Halfedge::has_target).unwrap();
    let curve = h.curve(&PointSiteCurves).unwrap();

    let json = serde_json::to_string(&curve).unwrap();
    assert!(json.contains("SourceAtInfinity"));
    let back: VoronoiCurve = serde_json::from_str(&json).unwrap();
    assert_eq!(back, curve);
}
