//! Axis-aligned rectangle geometry
//!
//! Origin is the bottom-left corner, `width`/`height` extend toward +x/+y.
//! Overlap is strict: boxes that only share an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move so the center sits on `center`, keeping the size
    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    /// Copy of this rectangle shifted by (dx, dy)
    #[inline]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Positive-area intersection test
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_positive_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Shares the right edge
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        // Shares the top edge
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        // Shares only a corner
        assert!(!a.overlaps(&Rect::new(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(0.0, 0.0, 32.0, 32.0);
        let inner = Rect::new(12.0, 12.0, 8.0, 8.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_centered_and_set_center() {
        let mut r = Rect::centered(Vec2::new(50.0, 50.0), 20.0);
        assert_eq!(r.position(), Vec2::new(40.0, 40.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));

        r.set_center(Vec2::new(0.0, 0.0));
        assert_eq!(r.position(), Vec2::new(-10.0, -10.0));
        assert_eq!(r.center(), Vec2::ZERO);
    }

    #[test]
    fn test_translated_keeps_size() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translated(10.0, -2.0);
        assert_eq!(r, Rect::new(11.0, 0.0, 3.0, 4.0));
    }
}
