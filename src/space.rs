//! The disk on which blobs are dropped.
//!
//! Positions passed to [`PaletteSpace`] are display coordinates (y
//! pointing down, in display units).  They are converted to device
//! coordinates by scaling with the pixel ratio and flipping the y
//! axis.

use log::debug;
use crate::{Blob, BlendField, BlobPolicy, BlobSet, Color, ColorWheel,
            Compositor, Coverage, Frame, History, Point, RandomPolicy,
            MAX_BLOBS};

/// Default ratio between device pixels and display units.
pub const PIXEL_RATIO: f64 = 2.;

/// Default radius of the usable disk, relative to half the smallest
/// viewport dimension.
pub const DISK_RATIO: f64 = 0.6;

/// Move `p` radially onto the circle of radius `radius` centered at
/// `center` if it lies outside.
fn clamp(p: Point, center: Point, radius: f64) -> Point {
    let v = p - center;
    let d = v.norm();
    if d > radius { center + v * (radius / d) } else { p }
}

/// Configure a [`PaletteSpace`].
///
/// Created by [`PaletteSpace::builder`].
pub struct SpaceBuilder {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    disk_ratio: f64,
    coverage: Coverage,
    policy: Option<Box<dyn BlobPolicy>>,
    wheel: Option<ColorWheel>,
}

impl SpaceBuilder {
    /// Device pixels per display unit (default 2).
    pub fn pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Radius of the usable disk relative to half the smallest
    /// viewport dimension (default 0.6).
    pub fn disk_ratio(mut self, ratio: f64) -> Self {
        self.disk_ratio = ratio;
        self
    }

    /// Coverage threshold of the field (default [`Coverage::RadiusAware`]).
    pub fn coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// How new blobs are colored and sized (default [`RandomPolicy`]).
    pub fn policy(mut self, policy: impl BlobPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// The wheel collecting used colors (default [`ColorWheel::default`]).
    pub fn wheel(mut self, wheel: ColorWheel) -> Self {
        self.wheel = Some(wheel);
        self
    }

    pub fn build(self) -> PaletteSpace {
        let field = BlendField::new(self.coverage);
        let mut space = PaletteSpace {
            blobs: BlobSet::new(),
            compositor: Compositor::new(self.width, self.height, field),
            history: History::new(),
            wheel: self.wheel.unwrap_or_default(),
            policy: self.policy
                .unwrap_or_else(|| Box::new(RandomPolicy::new())),
            width: self.width,
            height: self.height,
            radius: 0.,
            pixel_ratio: self.pixel_ratio,
            disk_ratio: self.disk_ratio,
        };
        space.radius = space.disk_radius();
        space
    }
}

/// A viewport holding at most [`MAX_BLOBS`] blobs, all within a disk
/// centered on the viewport.
pub struct PaletteSpace {
    blobs: BlobSet,
    compositor: Compositor,
    history: History,
    wheel: ColorWheel,
    policy: Box<dyn BlobPolicy>,
    width: u32,
    height: u32,
    radius: f64,
    pixel_ratio: f64,
    disk_ratio: f64,
}

impl PaletteSpace {
    /// Configure a space whose viewport is `width`×`height` device
    /// pixels.
    pub fn builder(width: u32, height: u32) -> SpaceBuilder {
        SpaceBuilder { width, height,
                       pixel_ratio: PIXEL_RATIO,
                       disk_ratio: DISK_RATIO,
                       coverage: Coverage::default(),
                       policy: None,
                       wheel: None }
    }

    /// A space with the default configuration.
    pub fn new(width: u32, height: u32) -> Self {
        Self::builder(width, height).build()
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn pixel_ratio(&self) -> f64 { self.pixel_ratio }

    /// Radius of the usable disk, in device pixels.
    pub fn radius(&self) -> f64 { self.radius }

    /// Largest radius given to new blobs: the radius of the disk.
    pub fn max_blob_radius(&self) -> f64 { self.radius }

    /// Center of the viewport, in device coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.width as f64 / 2., self.height as f64 / 2.)
    }

    pub fn blobs(&self) -> &BlobSet { &self.blobs }

    pub fn history(&self) -> &History { &self.history }

    pub fn wheel(&self) -> &ColorWheel { &self.wheel }

    pub fn compositor(&self) -> &Compositor { &self.compositor }

    fn disk_radius(&self) -> f64 {
        self.width.min(self.height) as f64 / 2. * self.disk_ratio
    }

    /// Convert display coordinates to device coordinates.
    pub fn to_internal(&self, p: Point) -> Point {
        Point::new(p.x * self.pixel_ratio,
                   self.height as f64 - p.y * self.pixel_ratio)
    }

    /// Add a blob at `p` and return its index.  Return `None`, leaving
    /// the space untouched, if there are already [`MAX_BLOBS`] blobs,
    /// if `p` is outside the disk or if the policy gives a radius that
    /// is not positive (e.g. on an empty viewport).
    pub fn add_blob(&mut self, p: Point) -> Option<usize> {
        if self.blobs.len() >= MAX_BLOBS { return None }
        let p = self.to_internal(p);
        if !(p.distance(self.center()) <= self.radius) { return None }
        let radius = self.policy.radius(self.max_blob_radius());
        if !(radius > 0. && radius.is_finite()) { return None }
        let color = self.policy.color(self.blobs.len());
        Some(self.blobs.push(Blob::new(p, radius, color)))
    }

    /// Move the blob `i` to `p`, or to the closest point of the disk
    /// boundary if `p` is outside.  Return the new position (in device
    /// coordinates) or `None`, leaving the blob in place, if there is
    /// no such blob or `p` is not finite.
    pub fn move_blob(&mut self, i: usize, p: Point) -> Option<Point> {
        if i >= self.blobs.len() || !(p.x.is_finite() && p.y.is_finite()) {
            return None
        }
        let p = clamp(self.to_internal(p), self.center(), self.radius);
        self.blobs.move_to(i, p);
        Some(p)
    }

    /// Change the radius of the blob `i`.  Return `false` if there is
    /// no such blob or `radius` is not positive.
    pub fn set_blob_radius(&mut self, i: usize, radius: f64) -> bool {
        radius > 0. && radius.is_finite() && self.blobs.set_radius(i, radius)
    }

    pub fn clear_blobs(&mut self) { self.blobs.clear() }

    /// Set the viewport size (in device pixels).  A missing dimension
    /// keeps its current value.  Blobs are moved so that their
    /// position relative to the viewport is preserved, then brought
    /// back onto the disk if needed.
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) {
        let (w0, h0) = (self.width, self.height);
        self.compositor.resize(width, height);
        self.width = self.compositor.width();
        self.height = self.compositor.height();
        self.radius = self.disk_radius();
        if (w0, h0) == (self.width, self.height) || self.blobs.is_empty() {
            return
        }
        let sx = if w0 == 0 { 1. } else { self.width as f64 / w0 as f64 };
        let sy = if h0 == 0 { 1. } else { self.height as f64 / h0 as f64 };
        let (center, radius) = (self.center(), self.radius);
        self.blobs.map_positions(|p| {
            clamp(Point::new(p.x * sx, p.y * sy), center, radius) });
        debug!("{} blobs rescaled by {}×{}", self.blobs.len(), sx, sy);
    }

    /// Render the current blobs.
    pub fn render(&mut self) -> &Frame {
        self.compositor.render(&self.blobs)
    }

    /// The color at `p`, or `None` if there is no color there.
    pub fn pick_color(&mut self, p: Point) -> Option<Color> {
        let p = self.to_internal(p);
        self.compositor.sample_at(p, &self.blobs)
    }

    /// Like [`PaletteSpace::pick_color`] but also record the color in
    /// the history and the color wheel.
    pub fn use_color(&mut self, p: Point) -> Option<Color> {
        let color = self.pick_color(p)?;
        let q = self.to_internal(p);
        let (w, h) = (self.width as f64, self.height as f64);
        self.wheel.insert(color);
        self.history.add_record(&self.blobs, self.wheel.colors(),
                                q.x / w, (h - q.y) / h, color);
        Some(color)
    }

    /// Start a new history snapshot with the current blobs.
    pub fn create_snapshot(&mut self) {
        self.history.create_new_snapshot(&self.blobs, self.wheel.colors());
    }
}
