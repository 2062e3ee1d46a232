//! Vertices of the 2D triangulation data structure.
//!
//! A vertex carries the site it stands for and a hint to one incident cell.
//! The infinite vertex carries no site.

use super::triangulation_data_structure::CellKey;

/// A vertex of the triangulation.
///
/// `S` is the site payload (a [`Point`](crate::geometry::point::Point) for
/// geometric triangulations, any label for purely combinatorial ones).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex<S> {
    site: Option<S>,
    pub(crate) incident_cell: Option<CellKey>,
}

impl<S> Vertex<S> {
    /// A finite vertex standing for `site`.
    pub(crate) const fn finite(site: S) -> Self {
        Self {
            site: Some(site),
            incident_cell: None,
        }
    }

    /// The vertex at infinity.
    pub(crate) const fn infinite() -> Self {
        Self {
            site: None,
            incident_cell: None,
        }
    }

    /// The site, or `None` for the infinite vertex.
    #[inline]
    #[must_use]
    pub const fn site(&self) -> Option<&S> {
        self.site.as_ref()
    }

    /// Returns `true` for the infinite vertex.
    #[inline]
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        self.site.is_none()
    }

    /// Some cell containing this vertex, if the triangulation has cells.
    #[inline]
    #[must_use]
    pub const fn incident_cell(&self) -> Option<CellKey> {
        self.incident_cell
    }
}
