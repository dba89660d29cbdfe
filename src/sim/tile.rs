//! Tile categories and the two tile placement forms
//!
//! A grid tile lives at an integer cell and is addressed by that cell. A
//! placed tile carries a pixel position: it is how off-grid decorations are
//! stored and how grid tiles are handed out by `Tilemap::extract`.

use glam::{DVec2, IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Tile category, serialized by its asset directory name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Decor,
    Grass,
    LargeDecor,
    #[serde(rename = "yellowblock")]
    YellowBlock,
    Stone,
    Castle,
    Pipe,
    /// Entity start markers, consumed at level load
    Spawners,
}

/// Categories that block movement
pub const PHYSICS_TILES: [TileKind; 5] = [
    TileKind::Grass,
    TileKind::Stone,
    TileKind::Castle,
    TileKind::Pipe,
    TileKind::YellowBlock,
];

/// Categories whose variant is chosen by the autotiler
pub const AUTOTILE_TYPES: [TileKind; 2] = [TileKind::Grass, TileKind::Stone];

impl TileKind {
    /// Every category, in editor palette order
    pub const ALL: [TileKind; 8] = [
        TileKind::Decor,
        TileKind::Grass,
        TileKind::LargeDecor,
        TileKind::YellowBlock,
        TileKind::Stone,
        TileKind::Castle,
        TileKind::Pipe,
        TileKind::Spawners,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Decor => "decor",
            TileKind::Grass => "grass",
            TileKind::LargeDecor => "large_decor",
            TileKind::YellowBlock => "yellowblock",
            TileKind::Stone => "stone",
            TileKind::Castle => "castle",
            TileKind::Pipe => "pipe",
            TileKind::Spawners => "spawners",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Solid for collision purposes
    #[inline]
    pub fn is_physics(self) -> bool {
        PHYSICS_TILES.contains(&self)
    }

    /// Eligible for neighbor-based variant rewriting
    #[inline]
    pub fn is_autotile(self) -> bool {
        AUTOTILE_TYPES.contains(&self)
    }
}

/// A (category, variant) pair identifying one piece of tile art
pub type TileId = (TileKind, usize);

/// A grid-aligned tile; `pos` is in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub variant: usize,
    pub pos: IVec2,
}

impl Tile {
    pub fn new(kind: TileKind, variant: usize, pos: IVec2) -> Self {
        Self { kind, variant, pos }
    }

    #[inline]
    pub fn id(&self) -> TileId {
        (self.kind, self.variant)
    }

    /// Copy of this tile with its position converted to pixels
    pub fn to_pixels(&self, tile_size: i32) -> PlacedTile {
        PlacedTile {
            kind: self.kind,
            variant: self.variant,
            pos: (self.pos * tile_size).as_dvec2(),
        }
    }
}

/// A tile at an arbitrary pixel position. The position keeps the full
/// precision of the map file; `position` narrows it for drawing and physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub variant: usize,
    pub pos: DVec2,
}

impl PlacedTile {
    pub fn new(kind: TileKind, variant: usize, pos: Vec2) -> Self {
        Self::exact(kind, variant, pos.as_dvec2())
    }

    pub fn exact(kind: TileKind, variant: usize, pos: DVec2) -> Self {
        Self { kind, variant, pos }
    }

    /// Pixel position in world space
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos.as_vec2()
    }

    #[inline]
    pub fn id(&self) -> TileId {
        (self.kind, self.variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_str(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(TileKind::from_str("lava"), None);
    }

    #[test]
    fn test_classification() {
        assert!(TileKind::Grass.is_physics());
        assert!(TileKind::YellowBlock.is_physics());
        assert!(!TileKind::Decor.is_physics());
        assert!(!TileKind::Spawners.is_physics());

        assert!(TileKind::Stone.is_autotile());
        assert!(!TileKind::Castle.is_autotile());
    }

    #[test]
    fn test_tile_json_shape() {
        let tile = Tile::new(TileKind::LargeDecor, 2, IVec2::new(-3, 7));
        let value = serde_json::to_value(tile).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "large_decor", "variant": 2, "pos": [-3, 7]})
        );
    }

    #[test]
    fn test_to_pixels() {
        let tile = Tile::new(TileKind::Spawners, 1, IVec2::new(3, -2));
        let placed = tile.to_pixels(16);
        assert_eq!(placed.position(), Vec2::new(48.0, -32.0));
        assert_eq!(placed.id(), (TileKind::Spawners, 1));
    }
}
