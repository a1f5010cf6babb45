//! Colors already used, ordered by hue around a wheel.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, TAU};
use crate::{Color, RGBColor};

/// Geometry of the ring sector displaying one color.  Angles are in
/// radians, with the y axis pointing down, so that increasing angles
/// go clockwise and −π/2 is 12 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    pub color: Color,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

/// The distinct colors used so far, sorted by increasing hue.
#[derive(Clone, Debug)]
pub struct ColorWheel {
    colors: Vec<Color>,
    max_sector_angle: f64,
    inner_radius: f64,
    outer_radius: f64,
}

impl Default for ColorWheel {
    fn default() -> Self { ColorWheel::new(0.6, 1.) }
}

impl ColorWheel {
    /// An empty wheel whose sectors span the ring between
    /// `inner_radius` and `outer_radius`.  Sectors are at most 30°
    /// wide; see [`ColorWheel::max_sector_angle`].
    pub fn new(inner_radius: f64, outer_radius: f64) -> Self {
        ColorWheel { colors: vec![], max_sector_angle: FRAC_PI_6,
                     inner_radius, outer_radius }
    }

    /// Set the largest angle (in radians) a sector may span.
    pub fn max_sector_angle(mut self, angle: f64) -> Self {
        self.max_sector_angle = angle;
        self
    }

    pub fn len(&self) -> usize { self.colors.len() }

    pub fn is_empty(&self) -> bool { self.colors.is_empty() }

    /// The colors, by increasing hue.
    pub fn colors(&self) -> &[Color] { &self.colors }

    pub fn contains(&self, color: &Color) -> bool {
        self.colors.contains(color)
    }

    /// Insert `color` after all colors with a smaller hue and return
    /// its position.  Return `None` if the color is already present.
    ///
    /// ```
    /// use blob_palette::{Color, ColorWheel};
    /// let mut w = ColorWheel::default();
    /// assert_eq!(w.insert(Color::new(0, 0, 255)), Some(0));
    /// assert_eq!(w.insert(Color::new(255, 0, 0)), Some(0));
    /// assert_eq!(w.insert(Color::new(0, 0, 255)), None);
    /// ```
    pub fn insert(&mut self, color: Color) -> Option<usize> {
        if self.contains(&color) { return None }
        let hue = color.hue();
        let i = self.colors.iter().filter(|c| c.hue() < hue).count();
        self.colors.insert(i, color);
        Some(i)
    }

    /// Angle spanned by each sector.
    pub fn sector_angle(&self) -> f64 {
        if self.colors.is_empty() { return self.max_sector_angle }
        (TAU / self.colors.len() as f64).min(self.max_sector_angle)
    }

    pub fn sector(&self, i: usize) -> Option<Sector> {
        let color = *self.colors.get(i)?;
        let w = self.sector_angle();
        let start_angle = -FRAC_PI_2 + i as f64 * w;
        Some(Sector { color, start_angle, end_angle: start_angle + w,
                      inner_radius: self.inner_radius,
                      outer_radius: self.outer_radius })
    }

    /// The sectors, clockwise from 12 o'clock.
    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        (0 .. self.colors.len()).filter_map(move |i| self.sector(i))
    }
}
