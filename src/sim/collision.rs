//! Axis-aligned collision helpers
//!
//! Everything in the runner is a box: tiles, obstacles, the player hitbox,
//! and hearts (tested by their bounding square).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontal spans overlap (ignores y)
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Shift left by `dx`
    pub fn scroll(&mut self, dx: f32) {
        self.x -= dx;
    }
}

/// Collision box narrower than the drawn sprite, centred horizontally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Offset of the hitbox from the sprite's left edge
    pub inset: f32,
    pub width: f32,
}

impl Hitbox {
    /// Hitbox covering `ratio` of a sprite `sprite_w` wide
    pub fn for_sprite(sprite_w: f32, ratio: f32) -> Self {
        let width = sprite_w * ratio;
        Self {
            inset: (sprite_w - width) / 2.0,
            width,
        }
    }

    /// World rect for a sprite at `x` spanning `top..bottom`
    pub fn rect_at(&self, x: f32, top: f32, bottom: f32) -> Rect {
        Rect::new(x + self.inset, top, self.width, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 5.0, 5.0);
        let below = Rect::new(0.0, 10.0, 5.0, 5.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_overlaps_x_ignores_height() {
        let a = Rect::new(0.0, 0.0, 10.0, 1.0);
        let b = Rect::new(5.0, 100.0, 10.0, 1.0);
        assert!(a.overlaps_x(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_centered_square() {
        let r = Rect::centered(Vec2::new(10.0, 20.0), 4.0);
        assert_eq!(r, Rect::new(8.0, 18.0, 4.0, 4.0));
    }

    #[test]
    fn test_hitbox_is_centered_and_narrower() {
        let hb = Hitbox::for_sprite(60.0, 0.8);
        assert!((hb.width - 48.0).abs() < 1e-5);
        assert!((hb.inset - 6.0).abs() < 1e-5);

        let r = hb.rect_at(50.0, 100.0, 155.0);
        assert!((r.left() - 56.0).abs() < 1e-5);
        assert!((r.right() - 104.0).abs() < 1e-5);
        assert!((r.bottom() - 155.0).abs() < 1e-5);
    }
}
