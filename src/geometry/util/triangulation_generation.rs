//! Triangulation generators for tests, examples and benchmarks.
//!
//! All generators are deterministic for a given seed.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::core::{
    collections::CellIndex,
    traits::dual_graph::{DualGraph, ccw, cw},
    triangulation_data_structure::{CellKey, Tds, TdsConstructionError},
};
use crate::geometry::{
    point::Point,
    predicates::{Orientation, orientation},
};

/// Largest offset applied to each coordinate of a jittered grid site. Below
/// `0.25` every grid square stays strictly convex.
const GRID_JITTER: f64 = 0.2;

fn grid_triangles<R: Rng>(rows: u32, cols: u32, rng: &mut R) -> Vec<[usize; 3]> {
    let index = |r: u32, c: u32| (r * cols + c) as usize;
    let mut triangles = Vec::new();
    for r in 0..rows.saturating_sub(1) {
        for c in 0..cols.saturating_sub(1) {
            let (a, b, c2, d) = (
                index(r, c),
                index(r, c + 1),
                index(r + 1, c + 1),
                index(r + 1, c),
            );
            if rng.random_bool(0.5) {
                triangles.extend([[a, b, c2], [a, c2, d]]);
            } else {
                triangles.extend([[a, b, d], [b, c2, d]]);
            }
        }
    }
    triangles
}

/// A `rows` by `cols` grid of unit squares, each split along a random diagonal.
///
/// The four corners of every square are cocircular, so under
/// [`CocircularEdges`](crate::geometry::degeneracy::CocircularEdges) every
/// diagonal is degenerate.
///
/// # Errors
///
/// Returns [`TdsConstructionError::NoTriangles`] if either side has fewer than
/// two sites.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::geometry::util::triangulation_generation::grid_triangulation;
///
/// let tds = grid_triangulation(3, 4, 7).unwrap();
/// assert_eq!(tds.number_of_vertices(), 12);
/// assert_eq!(tds.finite_cells().count(), 12);
/// ```
pub fn grid_triangulation(
    rows: u32,
    cols: u32,
    seed: u64,
) -> Result<Tds<Point>, TdsConstructionError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sites = (0..rows).flat_map(|r| (0..cols).map(move |c| Point::new([f64::from(c), f64::from(r)])));
    let sites: Vec<Point> = sites.collect();
    let triangles = grid_triangles(rows, cols, &mut rng);
    Tds::from_triangles(sites, &triangles)
}

/// A jittered grid triangulation scrambled by up to `flips` random edge flips.
///
/// Only flips that keep the triangulation geometrically valid (the two
/// triangles form a strictly convex quadrilateral) are applied, so the result
/// is still a planar triangulation of its sites.
///
/// # Errors
///
/// Same as [`grid_triangulation`].
pub fn random_triangulation(
    rows: u32,
    cols: u32,
    flips: usize,
    seed: u64,
) -> Result<Tds<Point>, TdsConstructionError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sites = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let dx = rng.random_range(-GRID_JITTER..GRID_JITTER);
            let dy = rng.random_range(-GRID_JITTER..GRID_JITTER);
            sites.push(Point::new([f64::from(c) + dx, f64::from(r) + dy]));
        }
    }
    let triangles = grid_triangles(rows, cols, &mut rng);
    let mut tds = Tds::from_triangles(sites, &triangles)?;

    let faces: Vec<CellKey> = tds.finite_cells().collect();
    let mut applied = 0;
    for _ in 0..flips {
        let face = faces[rng.random_range(0..faces.len())];
        let index: CellIndex = rng.random_range(0..3);
        if is_convex_flip(&tds, face, index) && tds.flip(face, index).is_ok() {
            applied += 1;
        }
    }
    tracing::debug!(
        "[generation] random_triangulation: {rows}x{cols} grid, {applied}/{flips} flips applied"
    );
    Ok(tds)
}

/// Returns `true` if flipping `(face, index)` keeps every triangle
/// counterclockwise.
fn is_convex_flip(tds: &Tds<Point>, face: CellKey, index: CellIndex) -> bool {
    let neighbor = tds.neighbor(face, index);
    if tds.is_infinite_face(face) || tds.is_infinite_face(neighbor) {
        return false;
    }
    let (Some(a), Some(b), Some(c), Some(d)) = (
        tds.site(tds.vertex(face, index)),
        tds.site(tds.vertex(face, ccw(index))),
        tds.site(tds.vertex(face, cw(index))),
        tds.site(tds.mirror_vertex(face, index)),
    ) else {
        return false;
    };
    orientation(a, b, d) == Orientation::POSITIVE && orientation(a, d, c) == Orientation::POSITIVE
}

/// A center site surrounded by `rim` sites on a circle of the given radius.
///
/// The rim sites are cocircular but no four sites including the center are,
/// so [`CocircularEdges`](crate::geometry::degeneracy::CocircularEdges) finds
/// nothing degenerate.
///
/// # Errors
///
/// Returns [`TdsConstructionError::NoTriangles`] if `rim < 3`.
pub fn fan_triangulation(rim: u32, radius: f64) -> Result<Tds<Point>, TdsConstructionError> {
    let mut sites = vec![Point::new([0.0, 0.0])];
    sites.extend((0..rim).map(|k| {
        let angle = f64::from(k) * std::f64::consts::TAU / f64::from(rim);
        Point::new([radius * angle.cos(), radius * angle.sin()])
    }));
    let rim = rim as usize;
    let triangles: Vec<[usize; 3]> = if rim < 3 {
        Vec::new()
    } else {
        (1..=rim).map(|k| [0, k, k % rim + 1]).collect()
    };
    Tds::from_triangles(sites, &triangles)
}

/// `n` sites evenly spaced on the line `y = x / 2`.
#[must_use]
pub fn collinear_sites(n: u32) -> Vec<Point> {
    (0..n)
        .map(|k| Point::new([f64::from(k), 0.5 * f64::from(k)]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_valid_and_seeded() {
        let a = grid_triangulation(4, 5, 11).unwrap();
        let b = grid_triangulation(4, 5, 11).unwrap();
        assert!(a.is_valid().is_ok());
        assert_eq!(a.finite_cells().count(), 2 * 3 * 4);
        let tri = |t: &Tds<Point>| serde_json::to_string(t).unwrap();
        assert_eq!(tri(&a), tri(&b));
    }

    #[test]
    fn random_triangulation_stays_counterclockwise() {
        let tds = random_triangulation(5, 5, 200, 3).unwrap();
        assert!(tds.is_valid().is_ok());
        for f in tds.finite_cells() {
            let p: Vec<&Point> = (0..3).filter_map(|i| tds.site(tds.vertex(f, i))).collect();
            assert_eq!(orientation(p[0], p[1], p[2]), Orientation::POSITIVE);
        }
    }

    #[test]
    fn fan_and_collinear_helpers() {
        let fan = fan_triangulation(6, 2.0).unwrap();
        assert_eq!(fan.number_of_vertices(), 7);
        assert_eq!(fan.finite_cells().count(), 6);
        assert!(matches!(
            fan_triangulation(2, 1.0),
            Err(TdsConstructionError::NoTriangles)
        ));

        let sites = collinear_sites(4);
        assert_eq!(sites.len(), 4);
        assert_eq!(
            orientation(&sites[0], &sites[1], &sites[3]),
            Orientation::DEGENERATE
        );
    }
}
