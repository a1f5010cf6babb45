//! The blend field: the color at a point given a set of blobs.

use rgb::{RGB, RGBA};
use crate::{Blob, Color, Point, RGBColor};

/// Squared influence radius, relative to the blob radius (the
/// influence vanishes at half the blob radius).
pub(crate) const B2: f64 = 0.25;
const B4: f64 = B2 * B2;
const B6: f64 = B4 * B2;

/// Influences below this are ignored.
const INFLUENCE_FLOOR: f64 = 0.001;

/// Minimum accumulated influence for a point to have a color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coverage {
    /// Threshold 0.2, for blobs all sharing the same radius.
    PointDisk,
    /// Threshold 0.4, for blobs with individual radii.
    RadiusAware,
    /// Any other threshold.
    Custom(f64),
}

impl Coverage {
    pub fn threshold(self) -> f64 {
        match self {
            Coverage::PointDisk => 0.2,
            Coverage::RadiusAware => 0.4,
            Coverage::Custom(t) => t,
        }
    }
}

impl Default for Coverage {
    fn default() -> Self { Coverage::RadiusAware }
}

/// The attributes of a blob the field depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Splat {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) radius: f64,
    pub(crate) color: RGB<f64>,
}

impl Splat {
    pub(crate) const ZERO: Splat = Splat {
        x: 0., y: 0., radius: 1., color: RGB { r: 0., g: 0., b: 0. } };
}

impl From<&Blob> for Splat {
    fn from(blob: &Blob) -> Self {
        let RGBA { r, g, b, .. } = blob.color().to_rgba();
        Splat { x: blob.x(), y: blob.y(), radius: blob.radius(),
                color: RGB { r, g, b } }
    }
}

/// Weight of a blob at normalized squared distance `d2`.
///
/// The falloff is a polynomial of degree 6 in the distance: it equals
/// 1 at the center of the blob and 0 at `d2 = 0.25`, and it is 0
/// beyond.  Weights below 0.001 are rounded down to 0.
///
/// ```
/// use blob_palette::BlendField;
/// assert_eq!(BlendField::influence(0.), 1.);
/// assert_eq!(BlendField::influence(0.3), 0.);
/// ```
pub fn influence(d2: f64) -> f64 {
    if !(d2 <= B2) { return 0. }
    let d4 = d2 * d2;
    let w = 1. - (4. * d4 * d2 / B6 - 17. * d4 / B4 + 22. * d2 / B2) / 9.;
    if w < INFLUENCE_FLOOR { 0. } else { w }
}

/// Blends the colors of blobs weighted by their influence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlendField {
    coverage: Coverage,
}

impl BlendField {
    pub fn new(coverage: Coverage) -> Self { BlendField { coverage } }

    pub fn coverage(&self) -> Coverage { self.coverage }

    /// Weight of a blob at normalized squared distance `d2`.
    #[inline]
    pub fn influence(d2: f64) -> f64 { influence(d2) }

    /// Return the blended color at `p`, or `None` if the blobs do not
    /// cover `p` enough.
    ///
    /// ```
    /// use blob_palette::{BlendField, Blob, Color, Point};
    /// let red = Blob::new(Point::new(0., 0.), 10., Color::new(255, 0, 0));
    /// let field = BlendField::default();
    /// assert_eq!(field.evaluate(Point::new(0., 0.), [&red]),
    ///            Some(Color::new(255, 0, 0)));
    /// assert_eq!(field.evaluate(Point::new(6., 0.), [&red]), None);
    /// ```
    pub fn evaluate<'a, I>(&self, p: Point, blobs: I) -> Option<Color>
    where I: IntoIterator<Item = &'a Blob> {
        self.blend(p, blobs.into_iter().map(Splat::from))
    }

    /// The evaluation shared by single point queries and the
    /// rasterization of whole frames.
    pub(crate) fn blend<I>(&self, p: Point, splats: I) -> Option<Color>
    where I: IntoIterator<Item = Splat> {
        let mut sum = RGB { r: 0., g: 0., b: 0. };
        let mut weight = 0.;
        for s in splats {
            let dx = p.x - s.x;
            let dy = p.y - s.y;
            let w = influence((dx * dx + dy * dy) / (s.radius * s.radius));
            if w == 0. { continue }
            sum.r += s.color.r * w;
            sum.g += s.color.g * w;
            sum.b += s.color.b * w;
            weight += w;
        }
        if weight < self.coverage.threshold() {
            None
        } else {
            Some(Color::from_rgba(RGBA { r: sum.r / weight, g: sum.g / weight,
                                         b: sum.b / weight, a: 255. }))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn blob(x: f64, y: f64, r: f64, c: [u8; 3]) -> Blob {
        Blob::new(Point::new(x, y), r, Color::new(c[0], c[1], c[2]))
    }

    #[test]
    fn influence_endpoints() {
        assert_eq!(influence(0.), 1.);
        assert!(influence(B2).abs() < 1e-12);
        assert_eq!(influence(B2 + 1e-9), 0.);
        assert_eq!(influence(f64::NAN), 0.);
    }

    #[test]
    fn influence_decreases() {
        let mut prev = influence(0.);
        for i in 1 ..= 100 {
            let w = influence(B2 * i as f64 / 100.);
            assert!(w <= prev, "{} > {} at step {}", w, prev, i);
            prev = w;
        }
    }

    #[test]
    fn single_blob_center_is_exact() {
        let b = blob(12.5, -3., 40., [17, 200, 93]);
        let field = BlendField::new(Coverage::PointDisk);
        assert_eq!(field.evaluate(b.position(), [&b]),
                   Some(Color::new(17, 200, 93)));
    }

    #[test]
    fn empty_set_has_no_coverage() {
        let field = BlendField::default();
        assert_eq!(field.evaluate(Point::new(0., 0.), std::iter::empty()), None);
    }

    #[test]
    fn order_does_not_matter() {
        let a = blob(0., 0., 100., [255, 0, 0]);
        let b = blob(30., 10., 80., [0, 40, 255]);
        let field = BlendField::default();
        for i in 0 .. 20 {
            let p = Point::new(i as f64 * 2., 5.);
            assert_eq!(field.evaluate(p, [&a, &b]), field.evaluate(p, [&b, &a]));
        }
    }

    #[test]
    fn two_blobs_mix_in_between() {
        let a = blob(0., 0., 100., [255, 0, 0]);
        let b = blob(20., 0., 100., [0, 0, 255]);
        let field = BlendField::default();
        let c = field.evaluate(Point::new(10., 0.), [&a, &b]).unwrap();
        assert_eq!(c.g, 0);
        assert!((c.r as i32 - c.b as i32).abs() <= 1, "{:?}", c);
    }

    #[test]
    fn threshold_depends_on_coverage() {
        let b = blob(0., 0., 100., [0, 0, 0]);
        // Find a distance where the influence is between 0.2 and 0.4.
        let d2 = (1 ..= 100).map(|i| B2 * i as f64 / 100.)
            .find(|&d2| { let w = influence(d2); w > 0.25 && w < 0.35 })
            .unwrap();
        let p = Point::new(100. * d2.sqrt(), 0.);
        assert!(BlendField::new(Coverage::PointDisk).evaluate(p, [&b]).is_some());
        assert!(BlendField::new(Coverage::RadiusAware).evaluate(p, [&b]).is_none());
    }
}
