use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

// Import slotmap types for storage backend
#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

use crate::core::triangulation_data_structure::{CellKey, VertexKey};

/// Local index of a vertex (or of the opposite edge) inside a cell.
///
/// A 2D cell has three vertices, so the valid range is `0..=2`; in dimension 1
/// a cell is a segment and only `0..=1` index vertices.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::collections::CellIndex;
///
/// let i: CellIndex = 2;
/// assert_eq!(usize::from(i), 2);
/// ```
pub type CellIndex = u8;

/// Number of vertices (and neighbors) of a 2D cell.
pub const CELL_SIZE: usize = 3;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Internal storage backend for the triangulation data structure.
///
/// # Feature Flags
///
/// - **default**: Uses `DenseSlotMap` (enabled via the default `dense-slotmap` feature)
/// - **--no-default-features**: Uses `SlotMap`
///
/// Both backends hand out generation-checked keys, so a key that outlives the
/// element it named fails lookups instead of aliasing a new element.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Internal storage backend for the triangulation data structure.
#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Optimized `HashMap` type for internal, non-adversarial keys.
///
/// ⚠️ **Not DoS-resistant**: do not use with attacker-controlled keys.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Build hasher that instantiates [`FastHasher`].
pub type FastBuildHasher = FxBuildHasher;

/// Optimized `HashSet` type for internal membership tests.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<u64> = FastHashSet::default();
/// set.insert(7);
/// assert!(set.contains(&7));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Small-optimized Vec that stays on the stack for up to `N` elements.
///
/// # Examples
///
/// ```rust
/// use voronoi_adaptor::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
/// buffer.push(1);
/// assert_eq!(buffer.len(), 1);
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// DOMAIN-SPECIFIC TYPES
// =============================================================================

/// Vertex keys of a single cell (2 in dimension 1, 3 in dimension 2).
pub type CellVertexBuffer = SmallBuffer<VertexKey, CELL_SIZE>;

/// Neighbor keys of a single cell, `neighbors[i]` opposite `vertices[i]`.
pub type NeighborBuffer = SmallBuffer<CellKey, CELL_SIZE>;

/// Set of vertex keys.
pub type VertexKeySet = FastHashSet<VertexKey>;
