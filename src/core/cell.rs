//! Cells (faces) of the 2D triangulation data structure.
//!
//! A `Cell` stores only keys: the keys of its vertices, in counterclockwise
//! order, and the keys of its neighbors, with `neighbors[i]` lying opposite
//! `vertices[i]`. In dimension 1 a cell is a segment with two vertices and two
//! neighbors under the same indexing rule.

// =============================================================================
// IMPORTS
// =============================================================================

use super::triangulation_data_structure::{CellKey, VertexKey};
use crate::core::collections::{CellIndex, CellVertexBuffer, FastHashSet, NeighborBuffer};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during cell validation.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::cell::CellValidationError;
///
/// let err = CellValidationError::DuplicateVertices;
/// assert!(matches!(err, CellValidationError::DuplicateVertices));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CellValidationError {
    /// The cell contains duplicate vertices.
    #[error("Duplicate vertices: cell contains non-unique vertices which is not allowed")]
    DuplicateVertices,
    /// The cell does not have `dimension + 1` vertices.
    #[error(
        "Insufficient vertices: cell has {actual} vertices; expected exactly {expected} for a {dimension}D simplex"
    )]
    InsufficientVertices {
        /// The actual number of vertices in the cell.
        actual: usize,
        /// The expected number of vertices.
        expected: usize,
        /// The dimension of the triangulation.
        dimension: i32,
    },
    /// The neighbors buffer length differs from the vertex count.
    #[error("Invalid neighbors length: got {actual}, expected {expected}")]
    InvalidNeighborsLength {
        /// The actual neighbors length.
        actual: usize,
        /// The expected neighbors length.
        expected: usize,
    },
}

// =============================================================================
// CELL
// =============================================================================

/// A maximal cell of the triangulation: a triangle in 2D, a segment in 1D.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    vertices: CellVertexBuffer,
    pub(crate) neighbors: NeighborBuffer,
}

impl Cell {
    /// Creates a cell from its vertex and neighbor keys.
    pub(crate) const fn new(vertices: CellVertexBuffer, neighbors: NeighborBuffer) -> Self {
        Self {
            vertices,
            neighbors,
        }
    }

    /// Vertex keys in counterclockwise order.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[VertexKey] {
        &self.vertices
    }

    /// Neighbor keys; `neighbors()[i]` lies opposite `vertices()[i]`.
    #[inline]
    #[must_use]
    pub fn neighbors(&self) -> &[CellKey] {
        &self.neighbors
    }

    /// The `i`-th vertex.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid local index for this cell.
    #[inline]
    #[must_use]
    pub fn vertex(&self, i: CellIndex) -> VertexKey {
        self.vertices[usize::from(i)]
    }

    /// The neighbor opposite the `i`-th vertex.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid local index for this cell.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, i: CellIndex) -> CellKey {
        self.neighbors[usize::from(i)]
    }

    /// Number of vertices (3 for a triangle, 2 for a segment).
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if `vkey` is one of the vertices of this cell.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, vkey: VertexKey) -> bool {
        self.vertices.contains(&vkey)
    }

    /// Local index of `vkey` in this cell.
    #[must_use]
    pub fn index_of(&self, vkey: VertexKey) -> Option<CellIndex> {
        self.vertices
            .iter()
            .position(|&v| v == vkey)
            .and_then(|i| CellIndex::try_from(i).ok())
    }

    /// Local index of `neighbor` among this cell's neighbors.
    #[must_use]
    pub fn index_of_neighbor(&self, neighbor: CellKey) -> Option<CellIndex> {
        self.neighbors
            .iter()
            .position(|&c| c == neighbor)
            .and_then(|i| CellIndex::try_from(i).ok())
    }

    /// Given the facet opposite `facet_idx` in this cell and the neighbor cell
    /// across that facet, returns the index of the neighbor's vertex that is not
    /// on the shared facet.
    ///
    /// Returns `None` if `facet_idx` is out of range or if the two cells do not
    /// share exactly that facet.
    pub(crate) fn mirror_facet_index(
        &self,
        facet_idx: CellIndex,
        neighbor_cell: &Self,
    ) -> Option<CellIndex> {
        let facet_idx = usize::from(facet_idx);
        if facet_idx >= self.vertices.len() {
            return None;
        }

        debug_assert_eq!(
            self.vertices.len(),
            neighbor_cell.vertices.len(),
            "mirror_facet_index requires cells with matching vertex counts",
        );

        let mut facet_vertices: CellVertexBuffer = CellVertexBuffer::new();
        for (i, &vkey) in self.vertices.iter().enumerate() {
            if i != facet_idx {
                facet_vertices.push(vkey);
            }
        }

        let mut mirror_idx: Option<usize> = None;
        for (idx, &neighbor_vkey) in neighbor_cell.vertices.iter().enumerate() {
            if !facet_vertices.contains(&neighbor_vkey) {
                if mirror_idx.is_some() {
                    return None;
                }
                mirror_idx = Some(idx);
            }
        }

        mirror_idx.and_then(|i| CellIndex::try_from(i).ok())
    }

    pub(crate) fn set_vertex(&mut self, i: CellIndex, vkey: VertexKey) {
        self.vertices[usize::from(i)] = vkey;
    }

    pub(crate) fn set_neighbor(&mut self, i: CellIndex, ckey: CellKey) {
        self.neighbors[usize::from(i)] = ckey;
    }

    /// Checks the cell shape for a triangulation of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns a [`CellValidationError`] if the cell does not have
    /// `dimension + 1` distinct vertices and as many neighbors.
    pub fn is_valid(&self, dimension: i32) -> Result<(), CellValidationError> {
        let expected = usize::try_from(dimension + 1).unwrap_or(0);
        if self.vertices.len() != expected {
            return Err(CellValidationError::InsufficientVertices {
                actual: self.vertices.len(),
                expected,
                dimension,
            });
        }

        let mut seen: FastHashSet<VertexKey> = FastHashSet::default();
        for &vkey in &self.vertices {
            if !seen.insert(vkey) {
                return Err(CellValidationError::DuplicateVertices);
            }
        }

        if self.neighbors.len() != expected {
            return Err(CellValidationError::InvalidNeighborsLength {
                actual: self.neighbors.len(),
                expected,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys() -> (Vec<VertexKey>, Vec<CellKey>) {
        let mut vertices: SlotMap<VertexKey, ()> = SlotMap::with_key();
        let mut cells: SlotMap<CellKey, ()> = SlotMap::with_key();
        let v = (0..5).map(|_| vertices.insert(())).collect();
        let c = (0..4).map(|_| cells.insert(())).collect();
        (v, c)
    }

    #[test]
    fn mirror_facet_index_finds_apex_of_neighbor() {
        let (v, c) = keys();
        // Two triangles sharing edge (v1, v2).
        let left = Cell::new(
            CellVertexBuffer::from_slice(&[v[0], v[1], v[2]]),
            NeighborBuffer::from_slice(&[c[1], c[2], c[3]]),
        );
        let right = Cell::new(
            CellVertexBuffer::from_slice(&[v[3], v[2], v[1]]),
            NeighborBuffer::from_slice(&[c[0], c[2], c[3]]),
        );

        assert_eq!(left.mirror_facet_index(0, &right), Some(0));
        assert_eq!(right.mirror_facet_index(0, &left), Some(0));
        // Edge opposite v1 is (v2, v0); `right` does not contain it.
        assert_eq!(left.mirror_facet_index(1, &right), None);
        assert_eq!(left.mirror_facet_index(3, &right), None);
    }

    #[test]
    fn mirror_facet_index_works_for_segments() {
        let (v, c) = keys();
        let first = Cell::new(
            CellVertexBuffer::from_slice(&[v[0], v[1]]),
            NeighborBuffer::from_slice(&[c[1], c[2]]),
        );
        let second = Cell::new(
            CellVertexBuffer::from_slice(&[v[1], v[2]]),
            NeighborBuffer::from_slice(&[c[2], c[0]]),
        );
        assert_eq!(first.mirror_facet_index(0, &second), Some(1));
        assert_eq!(second.mirror_facet_index(1, &first), Some(0));
    }

    #[test]
    fn is_valid_rejects_bad_shapes() {
        let (v, c) = keys();
        let ok = Cell::new(
            CellVertexBuffer::from_slice(&[v[0], v[1], v[2]]),
            NeighborBuffer::from_slice(&[c[0], c[1], c[2]]),
        );
        assert!(ok.is_valid(2).is_ok());
        assert!(matches!(
            ok.is_valid(1),
            Err(CellValidationError::InsufficientVertices { actual: 3, expected: 2, .. })
        ));

        let duplicate = Cell::new(
            CellVertexBuffer::from_slice(&[v[0], v[0], v[2]]),
            NeighborBuffer::from_slice(&[c[0], c[1], c[2]]),
        );
        assert_eq!(duplicate.is_valid(2), Err(CellValidationError::DuplicateVertices));

        let short = Cell::new(
            CellVertexBuffer::from_slice(&[v[0], v[1], v[2]]),
            NeighborBuffer::from_slice(&[c[0]]),
        );
        assert_eq!(
            short.is_valid(2),
            Err(CellValidationError::InvalidNeighborsLength {
                actual: 1,
                expected: 3
            })
        );
    }

    #[test]
    fn index_lookups() {
        let (v, c) = keys();
        let cell = Cell::new(
            CellVertexBuffer::from_slice(&[v[0], v[1], v[2]]),
            NeighborBuffer::from_slice(&[c[0], c[1], c[2]]),
        );
        assert_eq!(cell.index_of(v[2]), Some(2));
        assert_eq!(cell.index_of(v[4]), None);
        assert_eq!(cell.index_of_neighbor(c[1]), Some(1));
        assert!(cell.contains_vertex(v[1]));
        assert_eq!(cell.vertex(1), v[1]);
        assert_eq!(cell.neighbor(2), c[2]);
        assert_eq!(cell.number_of_vertices(), 3);
    }
}
