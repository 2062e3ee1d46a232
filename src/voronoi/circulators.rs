//! Circulators over the Voronoi view.
//!
//! Both iterators walk a cyclic sequence once, starting at the halfedge they
//! were created from, and stop when the walk closes. A walk that never closes
//! is cut off after as many steps as the dual graph has edge positions.

use super::halfedge::Halfedge;
use crate::core::traits::{
    degeneracy::{EdgeDegeneracyTester, FaceDegeneracyTester},
    dual_graph::DualGraph,
};

fn step_limit<G, E, F>(h: &Halfedge<'_, G, E, F>) -> usize
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    3 * h.diagram().dual().number_of_faces() + 2
}

/// Halfedges along the boundary of one face, following [`Halfedge::next`].
pub struct Ccb<'a, G: DualGraph + ?Sized, E, F> {
    start: Halfedge<'a, G, E, F>,
    current: Option<Halfedge<'a, G, E, F>>,
    remaining: usize,
}

impl<'a, G, E, F> Ccb<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    pub(crate) fn new(start: Halfedge<'a, G, E, F>) -> Self {
        Self {
            remaining: step_limit(&start),
            start,
            current: Some(start),
        }
    }
}

impl<'a, G, E, F> Iterator for Ccb<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    type Item = Halfedge<'a, G, E, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        self.remaining = self.remaining.saturating_sub(1);
        let next = current.next();
        if next != self.start && next != current && self.remaining > 0 {
            self.current = Some(next);
        }
        Some(current)
    }
}

/// Halfedges pointing at one output vertex, following `next().opposite()`.
pub struct HalfedgesAroundVertex<'a, G: DualGraph + ?Sized, E, F> {
    start: Halfedge<'a, G, E, F>,
    current: Option<Halfedge<'a, G, E, F>>,
    remaining: usize,
}

impl<'a, G, E, F> HalfedgesAroundVertex<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    pub(crate) fn new(start: Halfedge<'a, G, E, F>) -> Self {
        Self {
            remaining: step_limit(&start),
            start,
            current: Some(start),
        }
    }
}

impl<'a, G, E, F> Iterator for HalfedgesAroundVertex<'a, G, E, F>
where
    G: DualGraph + ?Sized,
    E: EdgeDegeneracyTester<G>,
    F: FaceDegeneracyTester<G>,
{
    type Item = Halfedge<'a, G, E, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        self.remaining = self.remaining.saturating_sub(1);
        let next = current.next().opposite();
        if next != self.start && next != current && self.remaining > 0 {
            self.current = Some(next);
        }
        Some(current)
    }
}
