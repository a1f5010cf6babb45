//! Log of the colors used, grouped by blob configuration.

use log::debug;
use crate::{Blob, Color, RGBColor};

/// Two blob configurations whose blobs have colors closer than this
/// (see [`RGBColor::distance`]) are considered the same.
pub const CHANGE_THRESHOLD: f64 = 0.2;

/// A color used at some point of the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRecord {
    /// Abscissa relative to the viewport width, in \[0, 1\].
    pub x: f64,
    /// Ordinate relative to the viewport height, in \[0, 1\], from the
    /// top.
    pub y: f64,
    /// The color, as `#rrggbb`.
    pub color: String,
}

impl HistoryRecord {
    pub fn new(x: f64, y: f64, color: Color) -> Self {
        HistoryRecord { x, y, color: color.to_hex() }
    }
}

/// A copy of the blobs together with the records made with them.
#[derive(Clone, Debug, PartialEq)]
pub struct HistorySnapshot {
    records: Vec<HistoryRecord>,
    blobs: Vec<Blob>,
    used_colors: Vec<Color>,
    parent: Option<usize>,
}

impl HistorySnapshot {
    fn new(blobs: &[Blob], used_colors: &[Color],
           parent: Option<usize>) -> Self {
        HistorySnapshot { records: vec![], blobs: blobs.to_vec(),
                          used_colors: used_colors.to_vec(), parent }
    }

    pub fn records(&self) -> &[HistoryRecord] { &self.records }

    pub fn blobs(&self) -> &[Blob] { &self.blobs }

    /// The colors used so far when the snapshot was opened.
    pub fn used_colors(&self) -> &[Color] { &self.used_colors }

    /// Index in [`History::snapshots`] of the snapshot opened just
    /// before this one.
    pub fn parent(&self) -> Option<usize> { self.parent }
}

/// Append-only sequence of [`HistorySnapshot`]s.
#[derive(Clone, Debug, Default)]
pub struct History {
    snapshots: Vec<HistorySnapshot>,
    // Blobs of the last snapshot opened by `add_record`.
    last_blobs: Vec<Blob>,
}

/// Whether the configuration `b` differs enough from `a`: a different
/// number of blobs or a blob whose color moved away by more than
/// [`CHANGE_THRESHOLD`].
pub fn changed_sufficiently(a: &[Blob], b: &[Blob]) -> bool {
    a.len() != b.len()
        || a.iter().zip(b).any(|(a, b)| {
            a.color().distance(&b.color()) > CHANGE_THRESHOLD })
}

impl History {
    pub fn new() -> Self { Self::default() }

    pub fn snapshots(&self) -> &[HistorySnapshot] { &self.snapshots }

    pub fn last(&self) -> Option<&HistorySnapshot> { self.snapshots.last() }

    pub fn len(&self) -> usize { self.snapshots.len() }

    pub fn is_empty(&self) -> bool { self.snapshots.is_empty() }

    fn open(&mut self, blobs: &[Blob], used_colors: &[Color]) -> usize {
        let parent = self.snapshots.len().checked_sub(1);
        self.snapshots.push(HistorySnapshot::new(blobs, used_colors, parent));
        debug!("history snapshot {} opened", self.snapshots.len());
        self.snapshots.len() - 1
    }

    /// Record that `color` was used at `(x, y)` (relative coordinates)
    /// with the configuration `blobs`, `used_colors` being all colors
    /// used so far.  The record opens a new snapshot if `blobs` changed
    /// sufficiently since the last recorded one; otherwise it is
    /// dropped.  Return whether it was kept.
    pub fn add_record(&mut self, blobs: &[Blob], used_colors: &[Color],
                      x: f64, y: f64, color: Color) -> bool {
        if !changed_sufficiently(&self.last_blobs, blobs) { return false }
        let i = self.open(blobs, used_colors);
        self.snapshots[i].records.push(HistoryRecord::new(x, y, color));
        self.last_blobs = blobs.to_vec();
        true
    }

    /// Open a new, empty snapshot of `blobs` regardless of how much
    /// they changed.
    pub fn create_new_snapshot(&mut self, blobs: &[Blob],
                               used_colors: &[Color]) {
        self.open(blobs, used_colors);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn blobs(colors: &[[u8; 3]]) -> Vec<Blob> {
        colors.iter().enumerate().map(|(i, c)| {
            Blob::new(Point::new(i as f64, 0.), 10.,
                      Color::new(c[0], c[1], c[2])) })
            .collect()
    }

    #[test]
    fn thresholding() {
        let mut h = History::new();
        let a = blobs(&[[0, 0, 0], [10, 10, 10]]);
        let b = blobs(&[[100, 0, 0], [10, 10, 10]]);
        let c = blobs(&[[255, 40, 0], [10, 10, 10]]);
        assert!(a[0].color().distance(&b[0].color()) <= 0.2);
        assert!(a[0].color().distance(&c[0].color()) > 0.3);

        assert!(h.add_record(&a, &[], 0.5, 0.5, Color::new(1, 2, 3)));
        assert!(!h.add_record(&b, &[], 0.1, 0.2, Color::new(4, 5, 6)));
        assert_eq!(h.len(), 1);
        assert!(h.add_record(&c, &[], 0.3, 0.4, Color::new(7, 8, 9)));
        assert_eq!(h.len(), 2);

        let s = h.last().unwrap();
        assert_eq!(s.blobs(), &c[..]);
        assert_eq!(s.records(), &[HistoryRecord { x: 0.3, y: 0.4,
                                                  color: "#070809".into() }]);
        assert_eq!(h.snapshots()[0].records()[0].color, "#010203");
    }

    #[test]
    fn count_change_is_sufficient() {
        let a = blobs(&[[0, 0, 0]]);
        let b = blobs(&[[0, 0, 0], [0, 0, 0]]);
        assert!(changed_sufficiently(&a, &b));
        assert!(!changed_sufficiently(&a, &a));
        assert!(!changed_sufficiently(&[], &[]));
    }

    #[test]
    fn empty_configuration_is_not_recorded_first() {
        let mut h = History::new();
        assert!(!h.add_record(&[], &[], 0., 0., Color::new(0, 0, 0)));
        assert!(h.is_empty());
    }

    #[test]
    fn explicit_snapshot() {
        let mut h = History::new();
        let a = blobs(&[[0, 0, 0]]);
        h.create_new_snapshot(&a, &[]);
        h.create_new_snapshot(&a, &[]);
        assert_eq!(h.len(), 2);
        assert!(h.last().unwrap().records().is_empty());
        // Explicit snapshots do not count as the last recorded
        // configuration.
        assert!(h.add_record(&a, &[], 0., 0., Color::new(0, 0, 0)));
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn snapshots_keep_used_colors_and_parent() {
        let mut h = History::new();
        let a = blobs(&[[0, 0, 0]]);
        let b = blobs(&[[0, 0, 0], [255, 255, 255]]);
        let mut used = vec![Color::new(1, 2, 3)];
        assert!(h.add_record(&a, &used, 0., 0., Color::new(1, 2, 3)));
        used.push(Color::new(4, 5, 6));
        h.create_new_snapshot(&a, &used);
        assert!(h.add_record(&b, &used, 0., 0., Color::new(4, 5, 6)));
        used.clear();

        let s = h.snapshots();
        assert_eq!(s[0].parent(), None);
        assert_eq!(s[0].used_colors(), &[Color::new(1, 2, 3)]);
        assert_eq!(s[1].parent(), Some(0));
        assert_eq!(s[2].parent(), Some(1));
        assert_eq!(s[2].used_colors(),
                   &[Color::new(1, 2, 3), Color::new(4, 5, 6)]);
    }
}
