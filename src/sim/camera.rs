//! Scrolling camera
//!
//! The camera trails its target: each tick it covers a fixed fraction of the
//! remaining distance. Drawing uses the floored scroll so tiles land on whole
//! pixels even while the camera itself moves by fractions of a pixel.

use glam::{IVec2, Vec2};

use crate::consts::CAMERA_SMOOTHING;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position of the top-left corner of the view
    pub scroll: Vec2,
    smoothing: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CAMERA_SMOOTHING)
    }
}

impl Camera {
    pub fn new(smoothing: f32) -> Self {
        Self {
            scroll: Vec2::ZERO,
            smoothing: smoothing.max(1.0),
        }
    }

    /// Ease toward centering `target` in a viewport of `viewport` pixels
    pub fn follow(&mut self, target: Vec2, viewport: Vec2) {
        self.scroll += (target - viewport / 2.0 - self.scroll) / self.smoothing;
    }

    /// Move by `direction * speed` (manual panning)
    pub fn pan(&mut self, direction: Vec2, speed: f32) {
        self.scroll += direction * speed;
    }

    /// Whole-pixel offset to subtract from world positions when drawing
    #[inline]
    pub fn render_offset(&self) -> IVec2 {
        self.scroll.floor().as_ivec2()
    }

    pub fn reset(&mut self) {
        self.scroll = Vec2::ZERO;
    }
}
