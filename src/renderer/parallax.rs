//! Scrolling city backdrop
//!
//! Each layer is a screen-wide image drawn twice side by side and shifted
//! left a fixed amount per frame, wrapping every image width.

use serde::{Deserialize, Serialize};

use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    /// DOM id of the `<img>` supplying this layer
    pub image_id: String,
    /// Pixels per frame
    pub speed: f32,
    /// Image width relative to the viewport width
    pub scale: f32,
    /// Vertical placement: 0 = top, 1 = bottom
    pub y_offset: f32,
    /// Image height / width, updated once the image has loaded
    pub aspect: f32,
    /// Current scroll offset in (-width, 0]
    pub x: f32,
}

impl ParallaxLayer {
    pub fn new(image_id: &str, speed: f32, y_offset: f32) -> Self {
        Self {
            image_id: image_id.to_string(),
            speed,
            scale: 1.0,
            y_offset,
            aspect: 0.5,
            x: 0.0,
        }
    }

    pub fn width(&self, view_w: f32) -> f32 {
        view_w * self.scale
    }

    /// Scroll one frame
    pub fn advance(&mut self, view_w: f32) {
        let w = self.width(view_w);
        if w <= 0.0 {
            return;
        }
        self.x = (self.x - self.speed) % w;
    }

    /// The two side-by-side copies to draw this frame
    pub fn placements(&self, view_w: f32, view_h: f32) -> [Rect; 2] {
        let w = self.width(view_w);
        let h = w * self.aspect;
        let y = (view_h - h) * self.y_offset;
        [Rect::new(self.x, y, w, h), Rect::new(self.x + w, y, w, h)]
    }
}

/// Back-to-front stack of layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    pub layers: Vec<ParallaxLayer>,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::city()
    }
}

impl Backdrop {
    /// Far, mid and front skyline
    pub fn city() -> Self {
        Self {
            layers: vec![
                ParallaxLayer::new("city_far", 0.1, 0.7),
                ParallaxLayer::new("city_mid", 0.2, 0.6),
                ParallaxLayer::new("city_front", 0.4, 0.5),
            ],
        }
    }

    pub fn advance(&mut self, view_w: f32) {
        for layer in &mut self.layers {
            layer.advance(view_w);
        }
    }

    pub fn set_aspect(&mut self, index: usize, aspect: f32) {
        if let Some(layer) = self.layers.get_mut(index) {
            if aspect.is_finite() && aspect > 0.0 {
                layer.aspect = aspect;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_wraps_within_width() {
        let mut layer = ParallaxLayer::new("l", 0.4, 0.5);
        for _ in 0..10_000 {
            layer.advance(800.0);
            assert!(layer.x <= 0.0 && layer.x > -800.0);
        }
    }

    #[test]
    fn test_placements_tile_seamlessly() {
        let mut layer = ParallaxLayer::new("l", 0.1, 0.7);
        layer.advance(800.0);
        let [a, b] = layer.placements(800.0, 600.0);
        assert_eq!(a.right(), b.left());
        assert!(a.left() <= 0.0 && b.right() >= 800.0);
        // 800 wide at aspect 0.5 → 400 tall, 70% of the leftover 200
        assert!((a.y - 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_far_layers_move_slower() {
        let mut backdrop = Backdrop::city();
        backdrop.advance(800.0);
        let xs: Vec<f32> = backdrop.layers.iter().map(|l| l.x).collect();
        assert!(xs[0] > xs[1] && xs[1] > xs[2]);
    }

    #[test]
    fn test_set_aspect_ignores_garbage() {
        let mut backdrop = Backdrop::city();
        backdrop.set_aspect(0, f32::NAN);
        backdrop.set_aspect(9, 1.0);
        assert_eq!(backdrop.layers[0].aspect, 0.5);
        backdrop.set_aspect(0, 0.25);
        assert_eq!(backdrop.layers[0].aspect, 0.25);
    }
}
