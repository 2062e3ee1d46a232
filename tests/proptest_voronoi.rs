//! Property-based tests for the Voronoi view over random triangulations.
//!
//! Inputs are jittered grids scrambled by random convex flips, optionally with
//! a random set of vanished interior sites and a random set of interior edges
//! declared degenerate. Vanished sites are pairwise non-adjacent, so each one
//! glues its whole star (three or more triangles) into one vertex. Degenerate
//! edges avoid those stars and no triangle loses more than one edge, which
//! keeps every other merged vertex a pair of triangles.
//!
//! ## Invariants Tested
//!
//! - **Opposite is an involution** - `h.opposite().opposite() == h`
//! - **Inverse navigation** - `next` and `previous` undo each other
//! - **Endpoint duality** - `h.source() == h.opposite().target()`
//! - **Face closure** - every boundary walk returns to its start
//! - **Vertex closure** - every halfedge around a vertex targets it
//! - **Edge pairing** - twice as many halfedges as edges
//! - **Euler characteristic** - `V + 1 - E + F == 2`
//! - **Curve dispatch** - segments exactly for bounded halfedges

use proptest::prelude::*;
use voronoi_adaptor::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for grid sides.
fn grid_side() -> impl Strategy<Value = u32> {
    2u32..=6
}

/// Strategy for `(face, index)` picks used to choose degenerate edges.
fn edge_picks() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..64, 0usize..3), 0..12)
}

/// Strategy for site picks used to choose vanished cells.
fn site_picks() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..64, 0..6)
}

/// Builds a face policy from `picks`, skipping hull sites and any site next to
/// one already chosen.
///
/// Returns the policy, the triangles glued by it and how many vertices the
/// gluing removes.
fn vanished_sites(tds: &Tds<Point>, picks: &[usize]) -> (VertexSet, FastHashSet<CellKey>, usize) {
    let sites: Vec<VertexKey> = tds.site_keys().collect();
    let mut chosen: Vec<VertexKey> = Vec::new();
    let mut stars: FastHashSet<CellKey> = FastHashSet::default();
    let mut merged = 0;
    for &k in picks {
        let v = sites[k % sites.len()];
        let blocked = chosen.contains(&v)
            || tds
                .incident_vertices(v)
                .any(|w| tds.is_infinite_vertex(w) || chosen.contains(&w));
        if blocked {
            continue;
        }
        let star: Vec<CellKey> = tds.incident_cells(v).map(|(c, _)| c).collect();
        merged += star.len() - 1;
        stars.extend(star);
        chosen.push(v);
    }
    (chosen.into_iter().collect(), stars, merged)
}

/// Builds an edge policy from `picks`, skipping hull edges, triangles in
/// `used` and any edge whose triangles already lost one.
fn degenerate_edges(
    tds: &Tds<Point>,
    picks: &[(usize, usize)],
    mut used: FastHashSet<CellKey>,
) -> EdgeSet {
    let faces: Vec<CellKey> = tds.finite_cells().collect();
    let mut set = EdgeSet::new();
    for &(k, i) in picks {
        let f = faces[k % faces.len()];
        let i = u8::try_from(i).unwrap();
        let g = tds.neighbor(f, i);
        if tds.is_infinite_face(g) || used.contains(&f) || used.contains(&g) {
            continue;
        }
        let (a, b) = tds.edge_key(f, i).unwrap().endpoints();
        set.insert(a, b);
        used.insert(f);
        used.insert(g);
    }
    set
}

fn euler() -> ValidationOptions {
    ValidationOptions {
        check_euler_characteristic: true,
    }
}

// =============================================================================
// NAVIGATION PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_navigation_is_consistent(
        rows in grid_side(),
        cols in grid_side(),
        flips in 0usize..80,
        seed in any::<u64>(),
        picks in edge_picks(),
        sites in site_picks(),
    ) {
        let tds = random_triangulation(rows, cols, flips, seed).unwrap();
        prop_assert!(tds.is_valid().is_ok());
        let (faces, stars, glued) = vanished_sites(&tds, &sites);
        let vanished = tds.site_keys().filter(|&v| faces.contains(v)).count();
        let edges = degenerate_edges(&tds, &picks, stars);
        let merged = glued + edges.len();
        let vd = VoronoiDiagram::new(&tds, edges, faces);

        for h in vd.halfedges() {
            prop_assert_eq!(h.opposite().opposite(), h);
            prop_assert_ne!(h.opposite(), h);
            prop_assert_eq!(h.next().previous(), h);
            prop_assert_eq!(h.previous().next(), h);
            prop_assert_eq!(h.next().face(), h.face());
            prop_assert_eq!(h.source().ok(), h.opposite().target().ok());
            prop_assert_eq!(h.has_source(), h.opposite().has_target());
            if let Ok(v) = h.target() {
                prop_assert!(v.is_incident_edge(&h));
            }
        }

        prop_assert_eq!(
            vd.number_of_vertices(),
            tds.finite_cells().count() - merged
        );
        prop_assert_eq!(vd.number_of_faces(), tds.number_of_vertices() - vanished);
        prop_assert_eq!(vd.number_of_halfedges(), 2 * vd.number_of_edges());
        for v in vd.vertices() {
            for f in v.cluster() {
                prop_assert_eq!(vd.vertex(f).unwrap(), v);
            }
        }
        prop_assert!(vd.faces().all(|f| f.is_valid()));
        prop_assert!(vd.vertices().all(|v| v.is_valid()));
        prop_assert!(vd.validation_report(euler()).is_ok());
    }

    #[test]
    fn prop_ccb_lengths_sum_to_halfedges(
        rows in grid_side(),
        cols in grid_side(),
        seed in any::<u64>(),
        picks in edge_picks(),
        sites in site_picks(),
    ) {
        let tds = random_triangulation(rows, cols, 40, seed).unwrap();
        let (faces, stars, _) = vanished_sites(&tds, &sites);
        let vd = VoronoiDiagram::new(&tds, degenerate_edges(&tds, &picks, stars), faces);

        let around_faces: usize = vd.faces().map(|f| f.ccb().unwrap().count()).sum();
        let around_vertices: usize = vd.vertices().map(|v| v.degree()).sum();
        prop_assert_eq!(around_faces, vd.number_of_halfedges());
        prop_assert_eq!(around_vertices, vd.bounded_halfedges().count()
            + vd.unbounded_halfedges().filter(|h| h.has_target()).count());
        for v in vd.vertices() {
            prop_assert!(v.degree() >= 3);
        }
    }

    #[test]
    fn prop_curve_dispatch_matches_boundedness(
        rows in grid_side(),
        cols in grid_side(),
        flips in 0usize..80,
        seed in any::<u64>(),
    ) {
        let tds = random_triangulation(rows, cols, flips, seed).unwrap();
        let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);

        for h in vd.halfedges() {
            let curve = h.curve(&PointSiteCurves).unwrap();
            prop_assert_eq!(curve.is_bounded(), !h.is_unbounded());
            prop_assert_eq!(curve.source().is_some(), h.has_source());
            prop_assert_eq!(curve.target().is_some(), h.has_target());
            if let VoronoiCurve::Ray { kind, .. } = curve {
                let expected = if h.has_target() {
                    RayKind::SourceAtInfinity
                } else {
                    RayKind::TargetAtInfinity
                };
                prop_assert_eq!(kind, expected);
            }
        }
    }
}

// =============================================================================
// FIXED-SEED SWEEP
// =============================================================================

#[test]
fn twenty_random_triangulations_are_valid_diagrams() {
    for seed in 0..20u64 {
        let tds = random_triangulation(5, 6, 100, seed).unwrap();
        let vd = VoronoiDiagram::new(&tds, NoDegeneracy, NoDegeneracy);
        assert!(vd.validation_report(euler()).is_ok(), "seed {seed}");
        assert_eq!(vd.number_of_vertices(), tds.finite_cells().count());
        // Hull sites are exactly the unbounded faces.
        let hull = vd
            .faces()
            .filter(|f| tds.incident_vertices(f.dual()).any(|w| tds.is_infinite_vertex(w)))
            .count();
        assert_eq!(vd.unbounded_faces().count(), hull);
        // One infinite edge per hull site.
        assert_eq!(vd.number_of_edges(), tds.number_of_edges() - hull);
        assert_eq!(vd.bounded_faces().count() + hull, vd.number_of_faces());
    }
}
