//! Edge identifiers for the 2D triangulation data structure.
//!
//! Edges are not stored explicitly. An edge is addressed either by the pair
//! `(cell, index)` of a cell and the local index of the vertex opposite the
//! edge ([`DualEdge`]), or canonically by its two endpoint keys
//! ([`EdgeKey`]), which is what hash-based edge sets use.
//!
//! ## Determinism
//!
//! `EdgeKey` ordering is **not** guaranteed to be deterministic across processes or
//! serialization round-trips, because [`VertexKey`] ordering is derived from internal
//! slotmap keys.

use crate::core::{collections::CellIndex, triangulation_data_structure::VertexKey};
use serde::{Deserialize, Serialize};
use slotmap::Key;

/// Canonical identifier for an (undirected) edge.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::edge::EdgeKey;
/// use voronoi_adaptor::core::triangulation_data_structure::VertexKey;
/// use slotmap::KeyData;
///
/// let a = VertexKey::from(KeyData::from_ffi(1));
/// let b = VertexKey::from(KeyData::from_ffi(2));
/// let edge = EdgeKey::new(a, b);
/// assert_eq!(edge, EdgeKey::new(b, a));
/// assert_eq!(edge.endpoints(), (edge.v0(), edge.v1()));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    v0: VertexKey,
    v1: VertexKey,
}

impl EdgeKey {
    /// Creates a new canonical edge key.
    ///
    /// The endpoints are reordered so that `v0 <= v1` under the raw key order.
    #[must_use]
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        let a_raw = a.data().as_ffi();
        let b_raw = b.data().as_ffi();

        if a_raw <= b_raw {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// Returns the first (canonical) endpoint.
    #[inline]
    #[must_use]
    pub const fn v0(self) -> VertexKey {
        self.v0
    }

    /// Returns the second (canonical) endpoint.
    #[inline]
    #[must_use]
    pub const fn v1(self) -> VertexKey {
        self.v1
    }

    /// Returns the two endpoints as a tuple.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (VertexKey, VertexKey) {
        (self.v0, self.v1)
    }

    /// Returns `true` if `v` is one of the endpoints.
    #[inline]
    #[must_use]
    pub fn contains(self, v: VertexKey) -> bool {
        self.v0 == v || self.v1 == v
    }
}

impl From<(VertexKey, VertexKey)> for EdgeKey {
    #[inline]
    fn from((a, b): (VertexKey, VertexKey)) -> Self {
        Self::new(a, b)
    }
}

/// A triangulation edge seen from one of its two incident cells.
///
/// In dimension 2 `index` is the local index of the vertex opposite the edge.
/// In dimension 1 the cell *is* the edge and `index` is
/// [`COLLINEAR_EDGE_INDEX`](crate::core::traits::dual_graph::COLLINEAR_EDGE_INDEX).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DualEdge<F> {
    /// The cell the edge is seen from.
    pub cell: F,
    /// Local index of the edge in `cell`.
    pub index: CellIndex,
}

impl<F> DualEdge<F> {
    /// Creates a new edge descriptor.
    #[inline]
    #[must_use]
    pub const fn new(cell: F, index: CellIndex) -> Self {
        Self { cell, index }
    }
}
