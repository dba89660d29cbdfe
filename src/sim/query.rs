//! Spatial queries against the tile grid
//!
//! Physics never scans the map. An entity's bounding box is turned into a
//! short list of cells to probe, so per-tick work depends on the entity's
//! footprint and not on the size of the level.

use glam::{IVec2, Vec2};

use super::rect::Rect;
use super::tile::Tile;
use super::tilemap::Tilemap;

/// Cells on the border of a `(span.x + 2) x (span.y + 2)` box whose top-left
/// cell is `anchor`: top and bottom rows first (interleaved, left to right),
/// then the left and right columns between them. Interior cells are skipped.
pub fn border_ring(anchor: IVec2, span: IVec2) -> impl Iterator<Item = IVec2> {
    let rows = (0..span.x + 2).flat_map(move |i| {
        [
            anchor + IVec2::new(i, 0),
            anchor + IVec2::new(i, span.y + 1),
        ]
    });
    let sides = (1..=span.y).flat_map(move |i| {
        [
            anchor + IVec2::new(0, i),
            anchor + IVec2::new(span.x + 1, i),
        ]
    });
    rows.chain(sides)
}

impl Tilemap {
    /// Grid cell containing a pixel position
    #[inline]
    pub fn cell_at(&self, pixel: Vec2) -> IVec2 {
        (pixel / self.tile_size() as f32).floor().as_ivec2()
    }

    /// Number of cells an extent covers on each axis; partial cells count
    pub fn span_of(&self, size: Vec2) -> IVec2 {
        (size / self.tile_size() as f32).ceil().as_ivec2()
    }

    /// Grid tiles on the ring of cells around an entity.
    ///
    /// The ring is anchored one cell up and left of the entity's position
    /// rounded (half to even) to the nearest cell.
    pub fn tiles_around(&self, pos: Vec2, size: Vec2) -> Vec<&Tile> {
        let tile_size = self.tile_size() as f32;
        let anchor = IVec2::new(
            (pos.x / tile_size).round_ties_even() as i32,
            (pos.y / tile_size).round_ties_even() as i32,
        ) - IVec2::ONE;

        border_ring(anchor, self.span_of(size))
            .filter_map(|cell| self.get(cell))
            .collect()
    }

    /// Pixel rectangles of the solid tiles around an entity
    pub fn physics_rects_around(&self, pos: Vec2, size: Vec2) -> Vec<Rect> {
        self.tiles_around(pos, size)
            .into_iter()
            .filter(|tile| tile.kind.is_physics())
            .map(|tile| Rect::from_cell(tile.pos, self.tile_size()))
            .collect()
    }

    /// The solid tile under a pixel, if any
    pub fn solid_check(&self, pixel: Vec2) -> Option<&Tile> {
        self.get(self.cell_at(pixel))
            .filter(|tile| tile.kind.is_physics())
    }
}
