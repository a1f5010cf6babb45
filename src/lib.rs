//! Mix colored blobs dropped on a disk into a continuous color field.
//!
//! - [`PaletteSpace`]: the bounded disk holding the blobs.
//! - [`BlendField`]: the color at any point of the field.
//! - [`Compositor`]: rasterizes the field into a [`Frame`] and picks
//!   colors from it.
//! - [`History`] and [`ColorWheel`]: bookkeeping of the colors used.
//!
//! Colors are [`rgb::RGB8`] values; the derived operations (hex
//! encoding, hue, distance) are provided by the [`RGBColor`] trait.
//!
//! ```
//! use blob_palette::{PaletteSpace, Point, RGBColor};
//! let mut space = PaletteSpace::builder(200, 200).pixel_ratio(1.).build();
//! let i = space.add_blob(Point::new(100., 100.)).unwrap();
//! let c = space.pick_color(Point::new(100., 100.)).unwrap();
//! assert_eq!(c, space.blobs()[i].color());
//! assert_eq!(c.to_hex().len(), 7);
//! ```

use std::marker::PhantomData;
use std::ops::{Add, Mul, Sub};
use rgb::{RGBA, RGB8, RGBA8};

mod blob;
mod compositor;
mod error;
mod field;
mod history;
mod policy;
mod space;
mod wheel;

pub use blob::{Blob, BlobSet};
pub use compositor::{Compositor, Frame, BACKGROUND, MAX_BLOBS};
pub use error::{Error, Result};
pub use field::{BlendField, Coverage};
pub use history::{History, HistoryRecord, HistorySnapshot,
                  changed_sufficiently, CHANGE_THRESHOLD};
pub use policy::{BlobPolicy, PrimaryPolicy, RandomPolicy, SpreadPolicy,
                 PRIMARIES};
pub use space::{PaletteSpace, SpaceBuilder};
pub use wheel::{ColorWheel, Sector};

/// The color of a blob or of a point of the field.
pub type Color = RGB8;

/// A “continuous” range of colors parametrized by reals in \[0, 1\].
pub trait ColorRange<Color> {
    /// Returns the color corresponding to `t` ∈ \[0., 1.\].
    fn rgb(&self, t: f64) -> Color;
}

/// Specifies the methods a RGB color encoding must provide.
pub trait RGBColor: Sized {
    /// Return the red, green, blue and alpha components of the color
    /// (in \[0, 255\]).
    fn to_rgba(&self) -> RGBA<f64>;

    /// Create a color from its RGBA components (in \[0, 255\]).
    fn from_rgba(rgba: RGBA<f64>) -> Self;

    /// Return the color corresponding to the hue `h` ∈ \[0., 1.\].
    ///
    /// # Example
    ///
    /// ```
    /// use rgb::RGB8;
    /// use blob_palette::{RGBColor, ColorRange};
    /// let cyan = RGB8::HUE.rgb(0.5);
    /// assert_eq!(cyan, RGB8::new(0, 255, 255));
    /// ```
    const HUE: Hue<Self> = Hue { color: PhantomData };

    /// The red, green and blue channels, rounded to \[0, 255\].
    fn to_array(&self) -> [u8; 3] {
        let RGBA { r, g, b, .. } = self.to_rgba();
        [channel(r), channel(g), channel(b)]
    }

    /// CSS notation `#rrggbb`, lowercase and zero-padded.
    ///
    /// ```
    /// use rgb::RGB8;
    /// use blob_palette::RGBColor;
    /// assert_eq!(RGB8::new(255, 8, 160).to_hex(), "#ff08a0");
    /// ```
    fn to_hex(&self) -> String {
        let [r, g, b] = self.to_array();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Hue in degrees, in \[0, 360).  Achromatic colors have hue 0.
    fn hue(&self) -> f64 {
        let RGBA { r, g, b, .. } = self.to_rgba();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta == 0. { return 0. }
        let h = {
            if max == r { ((g - b) / delta).rem_euclid(6.) }
            else if max == g { (b - r) / delta + 2. }
            else { (r - g) / delta + 4. } };
        let h = 60. * h;
        if h >= 360. { h - 360. } else { h }
    }

    /// Mean squared difference of the normalized channels, in \[0, 1\].
    /// Alpha is ignored.
    fn distance(&self, other: &Self) -> f64 {
        let c0 = self.to_rgba();
        let c1 = other.to_rgba();
        let dr = (c0.r - c1.r) / 255.;
        let dg = (c0.g - c1.g) / 255.;
        let db = (c0.b - c1.b) / 255.;
        (dr * dr + dg * dg + db * db) / 3.
    }
}

#[inline]
fn channel(x: f64) -> u8 { x.round().clamp(0., 255.) as u8 }

impl RGBColor for RGB8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64, a: 255. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB8 { r: channel(c.r), g: channel(c.g), b: channel(c.b) }
    }
}

impl RGBColor for RGBA8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64,
              a: self.a as f64 }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA8 { r: channel(c.r), g: channel(c.g), b: channel(c.b),
                a: channel(c.a) }
    }
}

/// Hue
///
/// Fully saturated colors going around the hue circle: red at `t = 0`,
/// green at `t = 1/3`, blue at `t = 2/3`.
pub struct Hue<Color> { color: PhantomData<Color> }

impl<Color: RGBColor> ColorRange<Color> for Hue<Color> {
    fn rgb(&self, t: f64) -> Color {
        let t = 6. * t;
        let f = 255. * t.fract();
        let ti = t.trunc().rem_euclid(6.);
        let rgba = {
            if ti == 0.      { RGBA{ r: 255., g: f,     b: 0.,      a: 255.} }
            else if ti == 1. { RGBA{ r: 255. - f, g: 255., b: 0.,   a: 255.} }
            else if ti == 2. { RGBA{ r: 0.,   g: 255.,  b: f,       a: 255.} }
            else if ti == 3. { RGBA{ r: 0.,   g: 255. - f, b: 255., a: 255.} }
            else if ti == 4. { RGBA{ r: f,    g: 0.,    b: 255.,    a: 255.} }
            else             { RGBA{ r: 255., g: 0.,    b: 255. - f, a: 255.} }
        };
        Color::from_rgba(rgba)
    }
}


/// A position, either in display coordinates (as supplied by the
/// user interface) or in the internal device coordinates of the
/// field (y pointing up).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self { Point { x, y } }

    /// Euclidean norm of the point seen as a vector.
    #[inline]
    pub fn norm(self) -> f64 { self.x.hypot(self.y) }

    #[inline]
    pub fn distance(self, other: Point) -> f64 { (self - other).norm() }
}

impl Add for Point {
    type Output = Point;
    fn add(self, p: Point) -> Point { Point::new(self.x + p.x, self.y + p.y) }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, p: Point) -> Point { Point::new(self.x - p.x, self.y - p.y) }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point { Point::new(k * self.x, k * self.y) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(RGB8::new(0, 0, 0).to_hex(), "#000000");
        assert_eq!(RGB8::new(10, 171, 255).to_hex(), "#0aabff");
        assert_eq!(RGB8::new(1, 2, 3).to_array(), [1, 2, 3]);
    }

    #[test]
    fn hue_of_primaries() {
        assert_eq!(RGB8::new(255, 0, 0).hue(), 0.);
        assert_eq!(RGB8::new(0, 255, 0).hue(), 120.);
        assert_eq!(RGB8::new(0, 0, 255).hue(), 240.);
        assert_eq!(RGB8::new(255, 0, 255).hue(), 300.);
        assert_eq!(RGB8::new(90, 90, 90).hue(), 0.);
        let h = RGB8::new(255, 0, 43).hue();
        assert!(h > 349. && h < 360., "{}", h);
    }

    #[test]
    fn distance_bounds() {
        let black = RGB8::new(0, 0, 0);
        let white = RGB8::new(255, 255, 255);
        assert_eq!(black.distance(&black), 0.);
        assert_eq!(black.distance(&white), 1.);
        assert_eq!(RGB8::new(255, 0, 0).distance(&black), 1. / 3.);
        assert_eq!(white.distance(&black), black.distance(&white));
    }

    #[test]
    fn hue_range_follows_hue() {
        for i in 0 .. 36 {
            let t = i as f64 / 36.;
            let h = RGB8::HUE.rgb(t).hue();
            assert!((h - 360. * t).abs() < 1.,
                    "{} ≉ {}", h, 360. * t);
        }
    }

    #[test]
    fn from_rgba_rounds_and_saturates() {
        let c = RGB8::from_rgba(RGBA { r: 254.6, g: -3., b: 300., a: 1. });
        assert_eq!(c, RGB8::new(255, 0, 255));
    }

    #[test]
    fn frame_pixels_keep_their_alpha() {
        let px = RGBA8::from_rgba(RGB8::new(12, 34, 56).to_rgba());
        assert_eq!(px, RGBA8::new(12, 34, 56, 255));
        assert_eq!(px.to_hex(), "#0c2238");
        let clear = RGBA8::new(255, 255, 255, 0);
        assert_eq!(clear.distance(&RGBA8::new(255, 255, 255, 255)), 0.);
    }
}
