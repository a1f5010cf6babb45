//! Rasterization of the blend field and color picking.
//!
//! The blob attributes are uploaded into a fixed size kernel together
//! with the number of active slots.  The kernel is rebuilt only when
//! the blob set changed since the last build (its generation or its
//! length differ); otherwise the last frame is reused as is.

use log::{debug, error, info};
use rgb::{ComponentBytes, RGBA8};
use crate::field::Splat;
use crate::{BlendField, BlobSet, Color, Error, Point, RGBColor, Result};

/// Number of slots of the evaluation kernel.
pub const MAX_BLOBS: usize = 7;

/// Mid-gray the frame is cleared to before compositing.  Compositing
/// overwrites every pixel, so it never shows in a returned frame.
pub const BACKGROUND: RGBA8 = RGBA8 { r: 128, g: 128, b: 128, a: 0 };

/// Pixels not covered by any blob, displayed as opaque white.  A
/// degraded compositor returns frames made only of these.
const NO_COVERAGE: RGBA8 = RGBA8 { r: 255, g: 255, b: 255, a: 0 };

/// A rendered frame.
///
/// Rows are stored top-down.  The alpha channel says whether the
/// pixel is covered (255) or not (0); the color channels always hold
/// the color to display.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<RGBA8>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Frame { width, height,
                pixels: vec![BACKGROUND; width as usize * height as usize] }
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    /// The pixels, row by row from the top of the frame.
    pub fn pixels(&self) -> &[RGBA8] { &self.pixels }

    /// The pixels as RGBA bytes, row by row from the top.
    pub fn as_bytes(&self) -> &[u8] { self.pixels.as_bytes() }

    /// The pixel in column `x` and row `y`, rows being counted from
    /// the bottom of the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBA8> {
        if x >= self.width || y >= self.height { return None }
        let row = (self.height - 1 - y) as usize;
        Some(self.pixels[row * self.width as usize + x as usize])
    }

    /// The color of the pixel `(x, y)` (see [`Frame::pixel`]) or
    /// `None` if it is not covered.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.pixel(x, y).filter(|p| p.a != 0).map(|p| p.rgb())
    }
}

/// Attributes of the blobs for one generation of the blob set.
struct Kernel {
    splats: [Splat; MAX_BLOBS],
    count: usize,
    generation: u64,
}

impl Kernel {
    fn build(blobs: &BlobSet, width: u32, height: u32) -> Result<Kernel> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyViewport { width, height })
        }
        if blobs.len() > MAX_BLOBS {
            return Err(Error::KernelCapacity { count: blobs.len(),
                                               capacity: MAX_BLOBS })
        }
        let mut splats = [Splat::ZERO; MAX_BLOBS];
        for (index, b) in blobs.iter().enumerate() {
            if !(b.radius() > 0. && b.radius().is_finite()
                 && b.x().is_finite() && b.y().is_finite()) {
                return Err(Error::InvalidBlob { index })
            }
            splats[index] = Splat::from(b);
        }
        Ok(Kernel { splats, count: blobs.len(),
                    generation: blobs.generation() })
    }

    #[inline]
    fn active(&self) -> &[Splat] { &self.splats[.. self.count] }
}

enum State {
    Unbuilt,
    Ready(Kernel),
    // What the failed build was attempted with, to only retry once
    // something changed.
    Failed { generation: u64, count: usize, width: u32, height: u32 },
}

/// Renders a [`BlobSet`] through a [`BlendField`].
pub struct Compositor {
    field: BlendField,
    width: u32,
    height: u32,
    state: State,
    frame: Frame,
    frame_valid: bool,
    rebuilds: usize,
}

impl Compositor {
    /// A compositor for a viewport of `width`×`height` device pixels.
    pub fn new(width: u32, height: u32, field: BlendField) -> Self {
        Compositor { field, width, height,
                     state: State::Unbuilt,
                     frame: Frame::new(width, height),
                     frame_valid: false,
                     rebuilds: 0 }
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn field(&self) -> &BlendField { &self.field }

    /// Number of successful kernel builds so far.
    pub fn rebuilds(&self) -> usize { self.rebuilds }

    /// Whether the last kernel build failed, in which case frames are
    /// not covered anywhere.
    pub fn is_degraded(&self) -> bool {
        matches!(self.state, State::Failed { .. })
    }

    /// Set the viewport size.  A missing dimension keeps its current
    /// value (the drawing surface was resized by someone else).
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) {
        let width = width.unwrap_or(self.width);
        let height = height.unwrap_or(self.height);
        if (width, height) != (self.width, self.height) {
            debug!("viewport {}×{} → {}×{}",
                   self.width, self.height, width, height);
            self.width = width;
            self.height = height;
            self.frame_valid = false;
        }
    }

    /// Rebuild the kernel if the blob set changed, and return whether
    /// a build was attempted.
    fn update(&mut self, blobs: &BlobSet) -> bool {
        let stale = match &self.state {
            State::Unbuilt => true,
            State::Ready(k) =>
                k.generation != blobs.generation() || k.count != blobs.len(),
            State::Failed { generation, count, width, height } =>
                *generation != blobs.generation() || *count != blobs.len()
                || *width != self.width || *height != self.height,
        };
        if !stale { return false }
        match Kernel::build(blobs, self.width, self.height) {
            Ok(k) => {
                if self.is_degraded() {
                    info!("evaluation kernel available again");
                }
                debug!("evaluation kernel rebuilt for {} blobs", k.count);
                self.rebuilds += 1;
                self.state = State::Ready(k);
            }
            Err(e) => {
                if !self.is_degraded() {
                    error!("cannot build the evaluation kernel: {}", e);
                }
                self.state = State::Failed {
                    generation: blobs.generation(), count: blobs.len(),
                    width: self.width, height: self.height };
            }
        }
        true
    }

    fn rasterize(&mut self) {
        let (w, h) = (self.width, self.height);
        if self.frame.width != w || self.frame.height != h {
            self.frame = Frame::new(w, h);
        } else {
            self.frame.pixels.fill(BACKGROUND);
        }
        if w == 0 || h == 0 {
            self.frame_valid = true;
            return
        }
        let k = match &self.state {
            State::Ready(k) => k,
            _ => {
                self.frame.pixels.fill(NO_COVERAGE);
                self.frame_valid = true;
                return
            }
        };
        let splats = k.active();
        let field = &self.field;
        for (row, line) in self.frame.pixels
            .chunks_mut(w as usize).enumerate() {
            // Pixel centers, y pointing up.
            let y = (h as usize - 1 - row) as f64 + 0.5;
            for (col, px) in line.iter_mut().enumerate() {
                let p = Point::new(col as f64 + 0.5, y);
                *px = match field.blend(p, splats.iter().copied()) {
                    Some(c) => RGBA8::from_rgba(c.to_rgba()),
                    None => NO_COVERAGE,
                };
            }
        }
        self.frame_valid = true;
    }

    /// Render the blobs, rebuilding the kernel only when needed.
    pub fn render(&mut self, blobs: &BlobSet) -> &Frame {
        if self.update(blobs) || !self.frame_valid {
            self.rasterize();
        }
        &self.frame
    }

    /// Render the blobs and return the color of the pixel containing
    /// `p` (device coordinates, y measured from the bottom).  Return
    /// `None` if `p` is outside the viewport or not covered.
    pub fn sample_at(&mut self, p: Point, blobs: &BlobSet) -> Option<Color> {
        let frame = self.render(blobs);
        if !(p.x >= 0. && p.y >= 0.) { return None }
        // Saturating casts; out of range points are rejected by `color_at`.
        frame.color_at(p.x.floor() as u32, p.y.floor() as u32)
    }
}
