//! How new blobs get their color and radius.

use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use crate::{Color, ColorRange, RGBColor, MAX_BLOBS};

/// Chooses the color and radius of the blobs added to a
/// [`PaletteSpace`](crate::PaletteSpace).
pub trait BlobPolicy {
    /// Color of the blob about to be inserted at position `index`.
    fn color(&mut self, index: usize) -> Color;

    /// Radius of a new blob, given the largest radius a blob may have.
    fn radius(&mut self, max_radius: f64) -> f64;
}

impl<P: BlobPolicy + ?Sized> BlobPolicy for Box<P> {
    fn color(&mut self, index: usize) -> Color { (**self).color(index) }

    fn radius(&mut self, max_radius: f64) -> f64 { (**self).radius(max_radius) }
}

/// SplitMix64 generator.
#[derive(Clone, Debug)]
struct SplitMix(u64);

impl SplitMix {
    fn from_clock() -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        SplitMix(now ^ 0x9E37_79B9_7F4A_7C15)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in \[0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn byte(&mut self) -> u8 { (self.next_u64() >> 56) as u8 }

    /// Uniform in \[0.5, 1) × `max_radius`.
    fn radius(&mut self, max_radius: f64) -> f64 {
        max_radius * (0.5 + 0.5 * self.unit())
    }
}

/// Uniformly random colors and radii.
#[derive(Clone, Debug)]
pub struct RandomPolicy { rng: SplitMix }

impl RandomPolicy {
    /// A policy seeded from the system clock.
    pub fn new() -> Self { RandomPolicy { rng: SplitMix::from_clock() } }

    /// A reproducible policy.
    pub fn seeded(seed: u64) -> Self { RandomPolicy { rng: SplitMix(seed) } }
}

impl Default for RandomPolicy {
    fn default() -> Self { Self::new() }
}

impl BlobPolicy for RandomPolicy {
    fn color(&mut self, _: usize) -> Color {
        Color::new(self.rng.byte(), self.rng.byte(), self.rng.byte())
    }

    fn radius(&mut self, max_radius: f64) -> f64 { self.rng.radius(max_radius) }
}

lazy_static! {
    /// Pure primary and secondary colors, in the order they are
    /// handed out by [`PrimaryPolicy`].
    pub static ref PRIMARIES: Vec<Color> = vec![
        Color::new(255, 0, 0),
        Color::new(0, 0, 255),
        Color::new(255, 255, 0),
        Color::new(0, 255, 0),
        Color::new(255, 0, 255),
        Color::new(0, 255, 255),
        Color::new(255, 255, 255),
    ];
}

/// Colors taken from [`struct@PRIMARIES`] by insertion index, random
/// radii.
#[derive(Clone, Debug)]
pub struct PrimaryPolicy { rng: SplitMix }

impl PrimaryPolicy {
    pub fn new() -> Self { PrimaryPolicy { rng: SplitMix::from_clock() } }

    pub fn seeded(seed: u64) -> Self { PrimaryPolicy { rng: SplitMix(seed) } }
}

impl Default for PrimaryPolicy {
    fn default() -> Self { Self::new() }
}

impl BlobPolicy for PrimaryPolicy {
    fn color(&mut self, index: usize) -> Color {
        PRIMARIES[index % PRIMARIES.len()]
    }

    fn radius(&mut self, max_radius: f64) -> f64 { self.rng.radius(max_radius) }
}

/// Hues evenly spread around the hue circle, one per possible blob,
/// random radii.
#[derive(Clone, Debug)]
pub struct SpreadPolicy { rng: SplitMix }

impl SpreadPolicy {
    pub fn new() -> Self { SpreadPolicy { rng: SplitMix::from_clock() } }

    pub fn seeded(seed: u64) -> Self { SpreadPolicy { rng: SplitMix(seed) } }
}

impl Default for SpreadPolicy {
    fn default() -> Self { Self::new() }
}

impl BlobPolicy for SpreadPolicy {
    fn color(&mut self, index: usize) -> Color {
        Color::HUE.rgb((index % MAX_BLOBS) as f64 / MAX_BLOBS as f64)
    }

    fn radius(&mut self, max_radius: f64) -> f64 { self.rng.radius(max_radius) }
}
