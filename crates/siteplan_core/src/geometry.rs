//! Axis-aligned rectangles in parcel coordinates.
//!
//! Units are feet. The origin is the parcel corner on the frontage; `x` runs
//! along the frontage and `y` grows away from it, into the parcel.

use serde::{Deserialize, Serialize};

/// Tolerance used for geometric comparisons (ft / sq ft).
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rectangle; negative or NaN extents collapse to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            width: finite_or_zero(width).max(0.0),
            height: finite_or_zero(height).max(0.0),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Shrink by `side` on the left and right, `front` at the top and
    /// `depth_total` overall in height. `None` when nothing is left.
    pub fn inset(&self, side: f64, front: f64, depth_total: f64) -> Option<Rect> {
        let width = self.width - 2.0 * side;
        let height = self.height - depth_total;
        if width > EPSILON && height > EPSILON {
            Some(Rect::new(self.x + side, self.y + front, width, height))
        } else {
            None
        }
    }

    /// True when the interiors overlap (shared edges do not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right() - EPSILON
            && other.x < self.right() - EPSILON
            && self.y < other.bottom() - EPSILON
            && other.y < self.bottom() - EPSILON
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_negative_and_nan() {
        let r = Rect::new(1.0, 2.0, -5.0, f64::NAN);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert!(r.is_empty());
        assert_eq!(r.area(), 0.0);
    }

    #[test]
    fn test_inset_building_footprint() {
        let lot = Rect::new(10.0, 50.0, 85.0, 60.0);
        let footprint = lot.inset(5.0, 10.0, 20.0).unwrap();
        assert_eq!(footprint, Rect::new(15.0, 60.0, 75.0, 40.0));
        assert!(lot.contains(&footprint));
    }

    #[test]
    fn test_inset_too_small_is_none() {
        let tiny = Rect::new(0.0, 0.0, 8.0, 30.0);
        assert!(tiny.inset(5.0, 10.0, 20.0).is_none());
    }

    #[test]
    fn test_shared_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
