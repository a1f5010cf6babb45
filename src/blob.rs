//! Blobs and the collection owning them.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::{Color, Point};

// Generations are unique across all sets, so that a renderer never
// mistakes one set for another with the same history length.
static GENERATIONS: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 { GENERATIONS.fetch_add(1, Ordering::Relaxed) }

/// A colored disk of influence.
///
/// Positions are in device units with the y axis pointing up.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    x: f64,
    y: f64,
    radius: f64, // > 0
    color: Color,
}

impl Blob {
    /// A blob at `p`.  The radius is not checked: blobs with a radius
    /// that is not positive are refused by
    /// [`PaletteSpace`](crate::PaletteSpace) and make the
    /// [`Compositor`](crate::Compositor) fail to build its kernel.
    pub fn new(p: Point, radius: f64, color: Color) -> Self {
        Blob { x: p.x, y: p.y, radius, color }
    }

    #[inline]
    pub fn x(&self) -> f64 { self.x }

    #[inline]
    pub fn y(&self) -> f64 { self.y }

    #[inline]
    pub fn position(&self) -> Point { Point::new(self.x, self.y) }

    #[inline]
    pub fn radius(&self) -> f64 { self.radius }

    #[inline]
    pub fn color(&self) -> Color { self.color }
}

/// An ordered collection of blobs.
///
/// Every mutation bumps the [`generation`](BlobSet::generation) of the
/// set, which is how renderers know their cached state is stale.  A
/// blob is never mutated behind the back of its set.  Generations are
/// drawn from a process wide counter: two sets (clones included) only
/// share a generation while they hold the same blobs.
#[derive(Clone, Debug)]
pub struct BlobSet {
    blobs: Vec<Blob>,
    generation: u64,
}

impl BlobSet {
    pub fn new() -> Self {
        BlobSet { blobs: vec![], generation: next_generation() }
    }

    /// Identifier renewed by every change to the set or its blobs.
    #[inline]
    pub fn generation(&self) -> u64 { self.generation }

    #[inline]
    fn touch(&mut self) { self.generation = next_generation() }

    /// Append `blob` and return its index.
    pub fn push(&mut self, blob: Blob) -> usize {
        self.blobs.push(blob);
        self.touch();
        self.blobs.len() - 1
    }

    /// Move the blob `i` to `p`.  Return `false` if there is no such
    /// blob.
    pub fn move_to(&mut self, i: usize, p: Point) -> bool {
        match self.blobs.get_mut(i) {
            Some(b) => { b.x = p.x;  b.y = p.y }
            None => return false,
        }
        self.touch();
        true
    }

    /// Change the radius of the blob `i`.  Return `false` if there is
    /// no such blob.
    pub fn set_radius(&mut self, i: usize, radius: f64) -> bool {
        match self.blobs.get_mut(i) {
            Some(b) => b.radius = radius,
            None => return false,
        }
        self.touch();
        true
    }

    /// Replace the position of every blob by `f` applied to it.
    pub fn map_positions(&mut self, mut f: impl FnMut(Point) -> Point) {
        for b in &mut self.blobs {
            let p = f(b.position());
            b.x = p.x;
            b.y = p.y;
        }
        self.touch();
    }

    pub fn clear(&mut self) {
        self.blobs.clear();
        self.touch();
    }
}

impl Default for BlobSet {
    fn default() -> Self { Self::new() }
}

impl Deref for BlobSet {
    type Target = [Blob];

    fn deref(&self) -> &[Blob] { &self.blobs }
}

impl<'a> IntoIterator for &'a BlobSet {
    type Item = &'a Blob;
    type IntoIter = std::slice::Iter<'a, Blob>;

    fn into_iter(self) -> Self::IntoIter { self.blobs.iter() }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn red(x: f64, y: f64) -> Blob {
        Blob::new(Point::new(x, y), 10., Color::new(255, 0, 0))
    }

    #[test]
    fn every_mutation_bumps_generation() {
        let mut set = BlobSet::new();
        let g0 = set.generation();
        let i = set.push(red(1., 2.));
        assert_eq!(i, 0);
        let g1 = set.generation();
        assert!(g1 != g0);
        assert!(set.move_to(0, Point::new(3., 4.)));
        assert_eq!(set[0].position(), Point::new(3., 4.));
        let g2 = set.generation();
        assert!(g2 != g1);
        assert!(set.set_radius(0, 20.));
        assert_eq!(set[0].radius(), 20.);
        let g3 = set.generation();
        assert!(g3 != g2);
        set.clear();
        assert!(set.is_empty());
        assert!(set.generation() != g3);
    }

    #[test]
    fn unknown_index_is_left_alone() {
        let mut set = BlobSet::new();
        set.push(red(0., 0.));
        let g = set.generation();
        assert!(!set.move_to(1, Point::new(3., 4.)));
        assert!(!set.set_radius(5, 3.));
        assert_eq!(set.generation(), g);
    }

    #[test]
    fn add_and_remove_in_one_go_still_invalidates() {
        let mut set = BlobSet::new();
        set.push(red(0., 0.));
        let g = set.generation();
        set.clear();
        set.push(red(0., 0.));
        assert_eq!(set.len(), 1);
        assert!(set.generation() != g);
    }

    #[test]
    fn clones_diverge_in_generation() {
        let mut a = BlobSet::new();
        a.push(red(5., 5.));
        let mut b = a.clone();
        assert_eq!(a.generation(), b.generation());
        a.move_to(0, Point::new(2., 2.));
        b.move_to(0, Point::new(8., 8.));
        assert!(a.generation() != b.generation());
        assert!(BlobSet::new().generation() != BlobSet::new().generation());
    }
}
