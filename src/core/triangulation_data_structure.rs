//! Combinatorial 2D triangulation data structure.
//!
//! `Tds` represents a triangulation of a topological sphere: the triangles
//! supplied by the caller plus one *infinite vertex* joined to every boundary
//! edge. It follows the conventions of
//! [CGAL's `TDS_2`](https://doc.cgal.org/latest/TDS_2/index.html):
//!
//! - every cell has three vertices in counterclockwise order and three
//!   neighbors, `neighbor(i)` lying opposite `vertex(i)`;
//! - the edge `(c, i)` is the edge opposite `vertex(c, i)`; seen from the
//!   neighbor it has the mirror index and the reversed orientation;
//! - in dimension 1 (collinear sites) cells are segments and the structure is
//!   a cycle `s0, s1, …, s(n-1), ∞`.
//!
//! The structure is purely combinatorial. It does not insert sites
//! geometrically; it assembles and validates incidence from caller-supplied
//! triangles. Sites are an opaque payload `S`.
//!
//! # Invariants
//!
//! Checked by [`Tds::is_valid`] and reported in full by
//! [`Tds::validation_report`]:
//!
//! - **Cell validity**: each cell has `dimension + 1` distinct, live vertices
//!   and as many live neighbors.
//! - **Neighbor consistency**: neighbor relations are mutual and the two cells
//!   share exactly the facet between them, with opposite orientations in 2D.
//! - **Vertex stars**: every vertex records an incident cell and rotating
//!   around the vertex visits every cell containing it exactly once.
//! - **Euler characteristic**: `V - E + F = 2` in 2D (a sphere), `V - E = 0`
//!   in 1D (a circle).
//!
//! # Examples
//!
//! ```rust
//! use voronoi_adaptor::prelude::*;
//!
//! // A unit square split along its diagonal.
//! let tds = Tds::from_triangles(
//!     [
//!         Point::new([0.0, 0.0]),
//!         Point::new([1.0, 0.0]),
//!         Point::new([1.0, 1.0]),
//!         Point::new([0.0, 1.0]),
//!     ],
//!     &[[0, 1, 2], [0, 2, 3]],
//! )
//! .unwrap();
//!
//! assert_eq!(tds.dimension(), 2);
//! assert_eq!(tds.number_of_vertices(), 4);
//! assert_eq!(tds.number_of_cells(), 6); // 2 finite + 4 infinite
//! assert!(tds.is_valid().is_ok());
//! ```

// =============================================================================
// IMPORTS
// =============================================================================

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use slotmap::new_key_type;
use thiserror::Error;

use super::{
    cell::{Cell, CellValidationError},
    edge::{DualEdge, EdgeKey},
    traits::dual_graph::{COLLINEAR_EDGE_INDEX, DualGraph, ccw, cw},
    vertex::Vertex,
};
use crate::core::collections::{
    CellIndex, CellVertexBuffer, FastHashMap, NeighborBuffer, StorageMap,
    fast_hash_map_with_capacity,
};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while assembling a [`Tds`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TdsConstructionError {
    /// A 2D triangulation needs at least one triangle.
    #[error("No triangles supplied for a 2D triangulation")]
    NoTriangles,
    /// A triangle references a site that does not exist.
    #[error(
        "Triangle {triangle} references site index {index}, but only {site_count} sites were supplied"
    )]
    SiteIndexOutOfRange {
        /// Position of the triangle in the input slice.
        triangle: usize,
        /// The offending site index.
        index: usize,
        /// Number of sites supplied.
        site_count: usize,
    },
    /// A triangle lists the same site twice.
    #[error("Triangle {triangle} repeats site index {index}")]
    RepeatedSiteIndex {
        /// Position of the triangle in the input slice.
        triangle: usize,
        /// The repeated site index.
        index: usize,
    },
    /// A site is not used by any triangle.
    #[error("Site {index} is not a vertex of any triangle")]
    IsolatedSite {
        /// Index of the unused site.
        index: usize,
    },
    /// The same directed edge occurs in two triangles: the triangles are
    /// inconsistently oriented or an edge is shared by more than two triangles.
    #[error("Directed edge ({from}, {to}) occurs in more than one triangle")]
    DuplicateEdge {
        /// Site index of the edge origin.
        from: usize,
        /// Site index of the edge destination.
        to: usize,
    },
    /// Two boundary chains touch at a single site.
    #[error("Boundary is pinched at site {index}")]
    PinchedBoundary {
        /// Site index where the boundary touches itself.
        index: usize,
    },
    /// The triangles close up into a surface without boundary, leaving no
    /// room for the infinite vertex.
    #[error("Triangles form a closed surface; expected a topological disk")]
    ClosedSurface,
    /// An edge could not be paired with a neighbor.
    #[error("Open boundary: edge ({from:?}, {to:?}) has no neighboring cell")]
    OpenBoundary {
        /// Key of the edge origin.
        from: VertexKey,
        /// Key of the edge destination.
        to: VertexKey,
    },
    /// The assembled structure failed validation.
    #[error("Validation error during construction: {0}")]
    ValidationError(#[from] TdsValidationError),
}

/// Errors that can occur during triangulation validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TdsValidationError {
    /// A cell has the wrong shape.
    #[error("Invalid cell {cell:?}: {source}")]
    InvalidCell {
        /// The invalid cell.
        cell: CellKey,
        /// The underlying cell validation error.
        source: CellValidationError,
    },
    /// A cell references a vertex or neighbor that is not stored.
    #[error("Cell {cell:?} references a missing {entity:?}")]
    DanglingReference {
        /// The referencing cell.
        cell: CellKey,
        /// Which kind of reference dangles.
        entity: EntityKind,
    },
    /// Neighbor relationships are invalid.
    #[error("Invalid neighbor relationship of cell {cell:?} at index {index}: {message}")]
    InvalidNeighbors {
        /// The cell whose neighbor is inconsistent.
        cell: CellKey,
        /// Local index of the neighbor.
        index: CellIndex,
        /// Description of the failure.
        message: String,
    },
    /// Rotating around a vertex does not visit exactly its incident cells.
    #[error("Invalid star around vertex {vertex:?}: {message}")]
    InvalidVertexStar {
        /// The vertex whose star is broken.
        vertex: VertexKey,
        /// Description of the failure.
        message: String,
    },
    /// The complex is not a sphere (2D) or a circle (1D).
    #[error("Euler characteristic is {actual}, expected {expected}")]
    EulerCharacteristic {
        /// Expected characteristic.
        expected: i64,
        /// Computed characteristic.
        actual: i64,
    },
    /// Cells exist although the dimension admits none.
    #[error("Dimension {dimension} triangulation stores {cells} cells")]
    UnexpectedCells {
        /// The stored dimension.
        dimension: i32,
        /// Number of stored cells.
        cells: usize,
    },
}

/// Errors returned by [`Tds::flip`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlipError {
    /// Flips exist only in dimension 2.
    #[error("Edge flip not supported in dimension {dimension}")]
    UnsupportedDimension {
        /// Dimension of the triangulation.
        dimension: i32,
    },
    /// The referenced cell was not found.
    #[error("Cell not found: {cell:?}")]
    MissingCell {
        /// Missing cell key.
        cell: CellKey,
    },
    /// The local index is not in `0..=2`.
    #[error("Invalid local edge index {index}")]
    InvalidIndex {
        /// The offending index.
        index: CellIndex,
    },
    /// The two apexes are already joined by an edge; flipping would create a
    /// duplicate edge.
    #[error("Flipping edge ({cell:?}, {index}) would duplicate an existing edge")]
    ApexesAdjacent {
        /// Cell of the edge.
        cell: CellKey,
        /// Local index of the edge.
        index: CellIndex,
    },
}

/// Represents the type of entity in the triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// A vertex entity.
    Vertex,
    /// A cell entity.
    Cell,
}

/// Classifies the kind of invariant that failed during validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvariantKind {
    /// Per-cell shape and liveness of references.
    CellValidity,
    /// Neighbor topology and mutual-consistency invariants.
    NeighborConsistency,
    /// Rotation around every vertex closes over its incident cells.
    VertexStars,
    /// Global topology of the complex.
    EulerCharacteristic,
}

/// A single invariant violation recorded during validation diagnostics.
#[derive(Clone, Debug)]
pub struct InvariantViolation {
    /// The kind of invariant that failed.
    pub kind: InvariantKind,
    /// The detailed validation error explaining the failure.
    pub error: TdsValidationError,
}

/// Aggregate report of one or more validation failures.
///
/// Returned by [`Tds::validation_report`] to surface all failed invariants at
/// once for debugging and test diagnostics.
#[derive(Clone, Debug)]
pub struct TdsValidationReport {
    /// The ordered list of invariant violations that occurred.
    pub violations: Vec<InvariantViolation>,
}

impl TdsValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Configuration options for [`Tds::validation_report`] and
/// [`VoronoiDiagram::validation_report`](crate::voronoi::diagram::VoronoiDiagram::validation_report).
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationOptions {
    /// Whether to check the Euler characteristic of the complex.
    pub check_euler_characteristic: bool,
}

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices in the storage map.
    ///
    /// Keys are generation-checked: a key whose vertex was removed fails
    /// lookups instead of aliasing a newer vertex.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing cells in the storage map.
    pub struct CellKey;
}

// =============================================================================
// TDS
// =============================================================================

/// A 2D triangulation data structure with an infinite vertex.
///
/// See the [module documentation](self) for the conventions and invariants.
#[derive(Clone, Debug)]
pub struct Tds<S> {
    vertices: StorageMap<VertexKey, Vertex<S>>,
    cells: StorageMap<CellKey, Cell>,
    /// Finite vertices in input order (path order in dimension 1).
    sites: Vec<VertexKey>,
    infinite_vertex: VertexKey,
    dimension: i32,
}

impl<S> Default for Tds<S> {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

impl<S> Tds<S> {
    /// Creates a triangulation without sites (dimension `-1`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use voronoi_adaptor::prelude::*;
    ///
    /// let tds: Tds<Point> = Tds::empty();
    /// assert_eq!(tds.dimension(), -1);
    /// assert_eq!(tds.number_of_vertices(), 0);
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        let mut vertices = StorageMap::with_key();
        let infinite_vertex = vertices.insert(Vertex::infinite());
        Self {
            vertices,
            cells: StorageMap::with_key(),
            sites: Vec::new(),
            infinite_vertex,
            dimension: -1,
        }
    }

    fn with_sites<I>(sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut tds = Self::empty();
        for site in sites {
            let key = tds.vertices.insert(Vertex::finite(site));
            tds.sites.push(key);
        }
        tds
    }

    /// Assembles a 2D triangulation from counterclockwise triangles over site
    /// indices.
    ///
    /// The triangles must form a topological disk. Every boundary edge gets an
    /// infinite cell joining it to the infinite vertex, and all neighbor
    /// relations are wired up.
    ///
    /// # Errors
    ///
    /// Returns a [`TdsConstructionError`] if a triangle references an unknown
    /// site or repeats a site, if a site is unused, if the triangles are
    /// inconsistently oriented or non-manifold, or if they do not form a disk.
    pub fn from_triangles<I>(sites: I, triangles: &[[usize; 3]]) -> Result<Self, TdsConstructionError>
    where
        I: IntoIterator<Item = S>,
    {
        let mut tds = Self::with_sites(sites);
        if triangles.is_empty() {
            return Err(TdsConstructionError::NoTriangles);
        }

        let site_count = tds.sites.len();
        let mut used = vec![false; site_count];
        for (triangle, tri) in triangles.iter().enumerate() {
            for (k, &index) in tri.iter().enumerate() {
                if index >= site_count {
                    return Err(TdsConstructionError::SiteIndexOutOfRange {
                        triangle,
                        index,
                        site_count,
                    });
                }
                if tri[..k].contains(&index) {
                    return Err(TdsConstructionError::RepeatedSiteIndex { triangle, index });
                }
                used[index] = true;
            }
        }
        if let Some(index) = used.iter().position(|&u| !u) {
            return Err(TdsConstructionError::IsolatedSite { index });
        }
        tds.dimension = 2;

        // Directed edge (origin, destination) -> (cell, index of opposite vertex).
        let mut directed: FastHashMap<(VertexKey, VertexKey), (CellKey, CellIndex)> =
            fast_hash_map_with_capacity(triangles.len() * 6);

        for tri in triangles {
            let keys: CellVertexBuffer = tri.iter().map(|&i| tds.sites[i]).collect();
            let cell = tds
                .cells
                .insert(Cell::new(keys.clone(), NeighborBuffer::new()));
            for i in 0..3 {
                let edge = (keys[usize::from(ccw(i))], keys[usize::from(cw(i))]);
                if directed.insert(edge, (cell, i)).is_some() {
                    return Err(TdsConstructionError::DuplicateEdge {
                        from: tri[usize::from(ccw(i))],
                        to: tri[usize::from(cw(i))],
                    });
                }
            }
        }

        // Boundary edges in input order, so infinite cells are created deterministically.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        let mut boundary_starts = vec![false; site_count];
        for tri in triangles {
            for i in 0..3 {
                let (a, b) = (tri[usize::from(ccw(i))], tri[usize::from(cw(i))]);
                if directed.contains_key(&(tds.sites[b], tds.sites[a])) {
                    continue;
                }
                if std::mem::replace(&mut boundary_starts[a], true) {
                    return Err(TdsConstructionError::PinchedBoundary { index: a });
                }
                boundary.push((a, b));
            }
        }
        if boundary.is_empty() {
            return Err(TdsConstructionError::ClosedSurface);
        }

        let infinite = tds.infinite_vertex;
        for &(a, b) in &boundary {
            let keys: CellVertexBuffer = [infinite, tds.sites[b], tds.sites[a]].into_iter().collect();
            let cell = tds
                .cells
                .insert(Cell::new(keys.clone(), NeighborBuffer::new()));
            for i in 0..3 {
                let edge = (keys[usize::from(ccw(i))], keys[usize::from(cw(i))]);
                if directed.insert(edge, (cell, i)).is_some() {
                    // Only (∞, b) can collide here: b ends two boundary chains.
                    return Err(TdsConstructionError::PinchedBoundary { index: b });
                }
            }
        }

        let cell_keys: Vec<CellKey> = tds.cells.keys().collect();
        for cell_key in cell_keys {
            let mut neighbors = NeighborBuffer::new();
            let cell = &tds.cells[cell_key];
            for i in 0..3 {
                let (from, to) = (cell.vertex(ccw(i)), cell.vertex(cw(i)));
                let Some(&(neighbor, _)) = directed.get(&(to, from)) else {
                    return Err(TdsConstructionError::OpenBoundary { from, to });
                };
                neighbors.push(neighbor);
            }
            tds.cells[cell_key].neighbors = neighbors;
        }

        tds.assign_incident_cells();
        tds.is_valid()?;

        tracing::debug!(
            "[tds] from_triangles: sites={} finite_cells={} infinite_cells={}",
            tds.sites.len(),
            triangles.len(),
            boundary.len(),
        );
        Ok(tds)
    }

    /// Builds the degenerate triangulation of sites lying on a line, given in
    /// order along that line.
    ///
    /// With two or more sites the result has dimension 1: a cycle of segments
    /// `[s0, s1], [s1, s2], …, [s(n-1), ∞], [∞, s0]`. A single site gives
    /// dimension 0 and no sites give dimension `-1`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use voronoi_adaptor::prelude::*;
    ///
    /// let tds = Tds::from_collinear([Point::new([0.0, 0.0]), Point::new([1.0, 0.0])]);
    /// assert_eq!(tds.dimension(), 1);
    /// assert_eq!(tds.number_of_cells(), 3);
    /// ```
    #[must_use]
    pub fn from_collinear<I>(sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut tds = Self::with_sites(sites);
        match tds.sites.len() {
            0 => {}
            1 => tds.dimension = 0,
            _ => {
                tds.dimension = 1;
                let mut path = tds.sites.clone();
                path.push(tds.infinite_vertex);
                let m = path.len();

                let cells: Vec<CellKey> = (0..m)
                    .map(|k| {
                        let vertices: CellVertexBuffer =
                            [path[k], path[(k + 1) % m]].into_iter().collect();
                        tds.cells.insert(Cell::new(vertices, NeighborBuffer::new()))
                    })
                    .collect();
                for k in 0..m {
                    // neighbor(0) is opposite vertex 0, so it shares vertex 1.
                    tds.cells[cells[k]].neighbors =
                        [cells[(k + 1) % m], cells[(k + m - 1) % m]].into_iter().collect();
                    tds.vertices[path[k]].incident_cell = Some(cells[k]);
                }
            }
        }

        tracing::debug!(
            "[tds] from_collinear: sites={} dimension={}",
            tds.sites.len(),
            tds.dimension
        );
        tds
    }

    fn assign_incident_cells(&mut self) {
        for vertex in self.vertices.values_mut() {
            vertex.incident_cell = None;
        }
        for (cell_key, cell) in &self.cells {
            for &v in cell.vertices() {
                if let Some(vertex) = self.vertices.get_mut(v)
                    && vertex.incident_cell.is_none()
                {
                    vertex.incident_cell = Some(cell_key);
                }
            }
        }
    }
}

// =============================================================================
// QUERY OPERATIONS
// =============================================================================

impl<S> Tds<S> {
    /// Combinatorial dimension (`-1`, `0`, `1` or `2`).
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> i32 {
        self.dimension
    }

    /// Number of finite vertices (sites).
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.sites.len()
    }

    /// Number of cells, infinite ones included.
    #[inline]
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of edges, infinite ones included.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        match self.dimension {
            2 => self.cells.len() * 3 / 2,
            1 => self.cells.len(),
            _ => 0,
        }
    }

    /// The site of a finite vertex; `None` for the infinite vertex or an unknown key.
    #[inline]
    #[must_use]
    pub fn site(&self, v: VertexKey) -> Option<&S> {
        self.vertices.get(v).and_then(Vertex::site)
    }

    /// Vertex record for `v`.
    #[inline]
    #[must_use]
    pub fn vertex_data(&self, v: VertexKey) -> Option<&Vertex<S>> {
        self.vertices.get(v)
    }

    /// Cell record for `c`.
    #[inline]
    #[must_use]
    pub fn cell(&self, c: CellKey) -> Option<&Cell> {
        self.cells.get(c)
    }

    /// Keys of the finite vertices in input order.
    pub fn site_keys(&self) -> impl ExactSizeIterator<Item = VertexKey> + '_ {
        self.sites.iter().copied()
    }

    /// Keys of all vertices, the infinite vertex included.
    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    /// Keys of all cells.
    pub fn cell_keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.keys()
    }

    /// Keys of the cells not incident to the infinite vertex.
    pub fn finite_cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.contains_vertex(self.infinite_vertex))
            .map(|(key, _)| key)
    }

    /// Index of a finite vertex in the input order.
    #[must_use]
    pub fn site_index(&self, v: VertexKey) -> Option<usize> {
        self.sites.iter().position(|&s| s == v)
    }

    /// Canonical key of the edge `(c, i)`.
    ///
    /// In dimension 1 the edge is the cell itself and `i` is ignored.
    #[must_use]
    pub fn edge_key(&self, c: CellKey, i: CellIndex) -> Option<EdgeKey> {
        let cell = self.cells.get(c)?;
        match self.dimension {
            2 if i < 3 => Some(EdgeKey::new(cell.vertex(ccw(i)), cell.vertex(cw(i)))),
            1 => Some(EdgeKey::new(cell.vertex(0), cell.vertex(1))),
            _ => None,
        }
    }

    /// Each edge exactly once, as seen from the cell with the smaller key.
    pub fn edges(&self) -> impl Iterator<Item = DualEdge<CellKey>> + '_ {
        let dimension = self.dimension;
        self.cells.iter().flat_map(move |(key, cell)| {
            let range = if dimension == 2 { 0..3 } else { 0..0 };
            let planar = range
                .filter(move |&i| key < cell.neighbor(i))
                .map(move |i| DualEdge::new(key, i));
            let collinear = (dimension == 1).then_some(DualEdge::new(key, COLLINEAR_EDGE_INDEX));
            planar.chain(collinear)
        })
    }

    /// Cells around `v`, counterclockwise in dimension 2, each paired with the
    /// local index of `v` in it.
    #[must_use]
    pub fn incident_cells(&self, v: VertexKey) -> CellStar<'_, S> {
        let start = self.vertices.get(v).and_then(Vertex::incident_cell);
        CellStar {
            tds: self,
            vertex: v,
            start,
            current: start,
            remaining: self.cells.len(),
        }
    }

    /// Local index reached by one rotation step around the vertex at `i`.
    #[inline]
    fn star_step(&self, i: CellIndex) -> CellIndex {
        if self.dimension == 1 { 1 - i } else { ccw(i) }
    }
}

/// Iterator over the cells around a vertex; see [`Tds::incident_cells`].
///
/// The walk is bounded by the number of cells so a corrupted structure cannot
/// make it loop forever.
#[derive(Clone, Debug)]
pub struct CellStar<'a, S> {
    tds: &'a Tds<S>,
    vertex: VertexKey,
    start: Option<CellKey>,
    current: Option<CellKey>,
    remaining: usize,
}

impl<S> Iterator for CellStar<'_, S> {
    type Item = (CellKey, CellIndex);

    fn next(&mut self) -> Option<Self::Item> {
        let cell_key = self.current.take()?;
        let cell = self.tds.cells.get(cell_key)?;
        let i = cell.index_of(self.vertex)?;
        self.remaining = self.remaining.saturating_sub(1);
        let next = cell.neighbor(self.tds.star_step(i));
        if Some(next) != self.start && self.remaining > 0 {
            self.current = Some(next);
        }
        Some((cell_key, i))
    }
}

// =============================================================================
// FLIPS
// =============================================================================

impl<S> Tds<S> {
    /// Flips the edge `(cell, index)`: the two triangles sharing it are
    /// replaced by the two triangles sharing the other diagonal of their
    /// quadrilateral.
    ///
    /// Only the combinatorics change; keys of both cells are kept. Flipping an
    /// edge incident to the infinite vertex is allowed.
    ///
    /// # Errors
    ///
    /// Returns a [`FlipError`] if the triangulation is not 2D, the cell or
    /// index is invalid, or the flipped edge already exists.
    pub fn flip(&mut self, cell: CellKey, index: CellIndex) -> Result<(), FlipError> {
        if self.dimension != 2 {
            return Err(FlipError::UnsupportedDimension {
                dimension: self.dimension,
            });
        }
        if index > 2 {
            return Err(FlipError::InvalidIndex { index });
        }
        let Some(f_cell) = self.cells.get(cell) else {
            return Err(FlipError::MissingCell { cell });
        };

        let (f, i) = (cell, index);
        let n = f_cell.neighbor(i);
        let ni = self.mirror_index(f, i);
        let f_apex = f_cell.vertex(i);
        let n_apex = self.cells[n].vertex(ni);
        if f == n || f_apex == n_apex || self.incident_vertices(f_apex).any(|w| w == n_apex) {
            return Err(FlipError::ApexesAdjacent { cell, index });
        }

        let v_cw = f_cell.vertex(cw(i));
        let v_ccw = f_cell.vertex(ccw(i));
        // tr == top right, bl == bottom left
        let tr = f_cell.neighbor(ccw(i));
        let tri = self.mirror_index(f, ccw(i));
        let bl = self.cells[n].neighbor(ccw(ni));
        let bli = self.mirror_index(n, ccw(ni));

        self.cells[f].set_vertex(cw(i), n_apex);
        self.cells[n].set_vertex(cw(ni), f_apex);

        self.cells[f].set_neighbor(i, bl);
        self.cells[bl].set_neighbor(bli, f);
        self.cells[f].set_neighbor(ccw(i), n);
        self.cells[n].set_neighbor(ccw(ni), f);
        self.cells[n].set_neighbor(ni, tr);
        self.cells[tr].set_neighbor(tri, n);

        if self.vertices[v_cw].incident_cell == Some(f) {
            self.vertices[v_cw].incident_cell = Some(n);
        }
        if self.vertices[v_ccw].incident_cell == Some(n) {
            self.vertices[v_ccw].incident_cell = Some(f);
        }

        tracing::trace!("[tds] flipped edge ({f:?}, {i}) with neighbor {n:?}");
        Ok(())
    }
}

// =============================================================================
// VALIDATION & CONSISTENCY CHECKS
// =============================================================================

impl<S> Tds<S> {
    /// Checks cell shapes and that every referenced key is live.
    ///
    /// # Errors
    ///
    /// Returns the first [`TdsValidationError`] found.
    pub fn validate_cells(&self) -> Result<(), TdsValidationError> {
        if self.dimension < 1 && !self.cells.is_empty() {
            return Err(TdsValidationError::UnexpectedCells {
                dimension: self.dimension,
                cells: self.cells.len(),
            });
        }
        for (key, cell) in &self.cells {
            cell.is_valid(self.dimension)
                .map_err(|source| TdsValidationError::InvalidCell { cell: key, source })?;
            if !cell.vertices().iter().all(|&v| self.vertices.contains_key(v)) {
                return Err(TdsValidationError::DanglingReference {
                    cell: key,
                    entity: EntityKind::Vertex,
                });
            }
            if !cell.neighbors().iter().all(|&c| self.cells.contains_key(c)) {
                return Err(TdsValidationError::DanglingReference {
                    cell: key,
                    entity: EntityKind::Cell,
                });
            }
        }
        Ok(())
    }

    /// Checks that neighbor relations are mutual and consistent with the
    /// shared facets.
    ///
    /// # Errors
    ///
    /// Returns the first [`TdsValidationError::InvalidNeighbors`] found.
    pub fn validate_neighbors(&self) -> Result<(), TdsValidationError> {
        for (key, cell) in &self.cells {
            for (index, &neighbor_key) in (0..).zip(cell.neighbors()) {
                let fail = |message: &str| TdsValidationError::InvalidNeighbors {
                    cell: key,
                    index,
                    message: message.to_string(),
                };
                if neighbor_key == key {
                    return Err(fail("cell is its own neighbor"));
                }
                let Some(neighbor) = self.cells.get(neighbor_key) else {
                    return Err(fail("neighbor is not stored"));
                };
                let Some(mirror) = cell.mirror_facet_index(index, neighbor) else {
                    return Err(fail("cells do not share the facet"));
                };
                if neighbor.neighbor(mirror) != key {
                    return Err(fail("neighbor relation is not mutual"));
                }
                if self.dimension == 2 && cell.vertex(ccw(index)) != neighbor.vertex(cw(mirror)) {
                    return Err(fail("shared edge has the same orientation in both cells"));
                }
            }
        }
        Ok(())
    }

    /// Checks that rotating around each vertex visits every cell containing it.
    ///
    /// # Errors
    ///
    /// Returns the first [`TdsValidationError::InvalidVertexStar`] found.
    pub fn validate_vertex_stars(&self) -> Result<(), TdsValidationError> {
        if self.dimension < 1 {
            return Ok(());
        }
        let mut containing: FastHashMap<VertexKey, usize> =
            fast_hash_map_with_capacity(self.vertices.len());
        for cell in self.cells.values() {
            for &v in cell.vertices() {
                *containing.entry(v).or_default() += 1;
            }
        }

        for (v, vertex) in &self.vertices {
            let fail = |message: String| TdsValidationError::InvalidVertexStar { vertex: v, message };
            let Some(start) = vertex.incident_cell else {
                return Err(fail("no incident cell".to_string()));
            };
            let Some(start_cell) = self.cells.get(start) else {
                return Err(fail(format!("incident cell {start:?} is not stored")));
            };
            let Some(mut i) = start_cell.index_of(v) else {
                return Err(fail(format!("incident cell {start:?} does not contain the vertex")));
            };

            let expected = containing.get(&v).copied().unwrap_or(0);
            let mut current = start;
            let mut visited = 0_usize;
            loop {
                visited += 1;
                if visited > expected {
                    return Err(fail(format!(
                        "rotation does not return to {start:?} within {expected} steps"
                    )));
                }
                let next = self.cells[current].neighbor(self.star_step(i));
                if next == start {
                    break;
                }
                let Some(next_index) = self.cells.get(next).and_then(|c| c.index_of(v)) else {
                    return Err(fail(format!("rotation leaves the star at {next:?}")));
                };
                current = next;
                i = next_index;
            }
            if visited != expected {
                return Err(fail(format!(
                    "rotation visits {visited} cells but {expected} contain the vertex"
                )));
            }
        }
        Ok(())
    }

    /// Checks the Euler characteristic: 2 for a sphere in dimension 2, 0 for a
    /// circle in dimension 1.
    ///
    /// # Errors
    ///
    /// Returns [`TdsValidationError::EulerCharacteristic`] on mismatch.
    pub fn validate_euler_characteristic(&self) -> Result<(), TdsValidationError> {
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let (expected, actual) = match self.dimension {
            2 => {
                let v = count(self.vertices.len());
                let f = count(self.cells.len());
                // Each edge is shared by two cells; an odd facet count is already broken.
                let e = count(self.cells.len() * 3) / 2;
                let actual = if (3 * f) % 2 == 0 { v - e + f } else { i64::MIN };
                (2, actual)
            }
            1 => (0, count(self.vertices.len()) - count(self.cells.len())),
            _ => return Ok(()),
        };
        if actual == expected {
            Ok(())
        } else {
            Err(TdsValidationError::EulerCharacteristic { expected, actual })
        }
    }

    /// Runs all structural checks and returns the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`TdsValidationError`] found.
    pub fn is_valid(&self) -> Result<(), TdsValidationError> {
        self.validate_cells()?;
        self.validate_neighbors()?;
        self.validate_vertex_stars()?;
        self.validate_euler_characteristic()
    }

    /// Runs every structural check and returns a report containing **all**
    /// failed invariants.
    ///
    /// The Euler characteristic is only checked when requested in `options`.
    ///
    /// # Errors
    ///
    /// Returns a [`TdsValidationReport`] if any check fails.
    pub fn validation_report(&self, options: ValidationOptions) -> Result<(), TdsValidationReport> {
        let mut violations = Vec::new();

        if let Err(error) = self.validate_cells() {
            violations.push(InvariantViolation {
                kind: InvariantKind::CellValidity,
                error,
            });
        }
        if let Err(error) = self.validate_neighbors() {
            violations.push(InvariantViolation {
                kind: InvariantKind::NeighborConsistency,
                error,
            });
        }
        if let Err(error) = self.validate_vertex_stars() {
            violations.push(InvariantViolation {
                kind: InvariantKind::VertexStars,
                error,
            });
        }
        if options.check_euler_characteristic
            && let Err(error) = self.validate_euler_characteristic()
        {
            violations.push(InvariantViolation {
                kind: InvariantKind::EulerCharacteristic,
                error,
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            for violation in &violations {
                tracing::debug!("[tds] {:?} violated: {}", violation.kind, violation.error);
            }
            Err(TdsValidationReport { violations })
        }
    }
}

// =============================================================================
// DUAL GRAPH
// =============================================================================

impl<S> DualGraph for Tds<S> {
    type VertexHandle = VertexKey;
    type FaceHandle = CellKey;

    #[inline]
    fn dimension(&self) -> i32 {
        self.dimension
    }

    #[inline]
    fn infinite_vertex(&self) -> VertexKey {
        self.infinite_vertex
    }

    fn is_infinite_face(&self, f: CellKey) -> bool {
        self.cells[f].contains_vertex(self.infinite_vertex)
    }

    #[inline]
    fn vertex(&self, f: CellKey, i: CellIndex) -> VertexKey {
        self.cells[f].vertex(i)
    }

    #[inline]
    fn neighbor(&self, f: CellKey, i: CellIndex) -> CellKey {
        self.cells[f].neighbor(i)
    }

    fn mirror_index(&self, f: CellKey, i: CellIndex) -> CellIndex {
        let cell = &self.cells[f];
        let n = cell.neighbor(i);
        let Some(j) = cell.mirror_facet_index(i, &self.cells[n]) else {
            panic!("cells {f:?} and {n:?} do not share the facet opposite index {i}");
        };
        j
    }

    fn index_of(&self, f: CellKey, v: VertexKey) -> Option<CellIndex> {
        self.cells.get(f)?.index_of(v)
    }

    fn contains_vertex(&self, v: VertexKey) -> bool {
        self.vertices.contains_key(v)
    }

    fn contains_face(&self, f: CellKey) -> bool {
        self.cells.contains_key(f)
    }

    fn number_of_faces(&self) -> usize {
        self.cells.len()
    }

    fn incident_vertices(&self, v: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.incident_cells(v)
            .map(move |(c, i)| self.cells[c].vertex(self.star_step(i)))
    }

    fn incident_edges(&self, v: VertexKey) -> impl Iterator<Item = (CellKey, CellIndex)> + '_ {
        let collinear = self.dimension == 1;
        self.incident_cells(v).map(move |(c, i)| {
            if collinear {
                (c, COLLINEAR_EDGE_INDEX)
            } else {
                (c, cw(i))
            }
        })
    }

    fn finite_vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.site_keys()
    }

    fn faces(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.keys()
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// How the sites of a serialized [`Tds`] are connected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Layout {
    /// Counterclockwise triangles over site indices.
    Triangles(Vec<[usize; 3]>),
    /// Sites in order along a line.
    Collinear,
}

#[derive(Serialize)]
struct TdsRef<'a, S> {
    sites: Vec<&'a S>,
    layout: Layout,
}

#[derive(Deserialize)]
struct TdsData<S> {
    sites: Vec<S>,
    layout: Layout,
}

impl<S: Serialize> Serialize for Tds<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let sites: Vec<&S> = self.sites.iter().filter_map(|&v| self.site(v)).collect();
        let layout = if self.dimension == 2 {
            let index: FastHashMap<VertexKey, usize> =
                self.sites.iter().enumerate().map(|(i, &v)| (v, i)).collect();
            let triangles = self
                .finite_cells()
                .map(|c| {
                    let cell = &self.cells[c];
                    [0, 1, 2].map(|i| index.get(&cell.vertex(i)).copied().unwrap_or(usize::MAX))
                })
                .collect();
            Layout::Triangles(triangles)
        } else {
            Layout::Collinear
        };
        TdsRef { sites, layout }.serialize(serializer)
    }
}

impl<'de, S: Deserialize<'de>> Deserialize<'de> for Tds<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = TdsData::<S>::deserialize(deserializer)?;
        match data.layout {
            Layout::Triangles(triangles) => {
                Self::from_triangles(data.sites, &triangles).map_err(de::Error::custom)
            }
            Layout::Collinear => Ok(Self::from_collinear(data.sites)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
