//! Axis-aligned rectangles in pixel space
//!
//! Edges follow screen conventions: y grows downward, so `top < bottom`.

use glam::{IVec2, Vec2};

/// An axis-aligned rectangle (top-left corner + extent)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
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

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// The pixel rectangle covered by a grid cell
    pub fn from_cell(cell: IVec2, tile_size: i32) -> Self {
        let size = tile_size as f32;
        Self::new(cell.x as f32 * size, cell.y as f32 * size, size, size)
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

    /// Move so the left edge sits at `x`
    pub fn set_left(&mut self, x: f32) {
        self.x = x;
    }

    /// Move so the right edge sits at `x`
    pub fn set_right(&mut self, x: f32) {
        self.x = x - self.w;
    }

    pub fn set_top(&mut self, y: f32) {
        self.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.y = y - self.h;
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Interiors intersect; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }
}
