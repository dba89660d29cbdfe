//! Sparse tile grid
//!
//! Grid tiles are keyed by their integer cell; most cells are empty, so the
//! grid is a hash map rather than a dense array. Off-grid decorations are kept
//! in placement order, which is also their draw order.

use std::collections::HashMap;
use std::path::Path;

use glam::IVec2;

use super::tile::{PlacedTile, Tile, TileId};
use crate::consts::TILE_SIZE;
use crate::persistence::{self, MapError};

/// The level: grid tiles plus free-floating decorations
#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_size: i32,
    tiles: HashMap<IVec2, Tile>,
    offgrid: Vec<PlacedTile>,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}

impl Tilemap {
    /// Create an empty map.
    ///
    /// # Panics
    ///
    /// Panics if `tile_size` is not positive. Use [`Tilemap::with_tile_size`]
    /// for sizes that come from configuration.
    pub fn new(tile_size: i32) -> Self {
        assert!(tile_size > 0, "tile size must be positive, got {tile_size}");
        Self {
            tile_size,
            tiles: HashMap::new(),
            offgrid: Vec::new(),
        }
    }

    /// Assemble a map from already-validated parts (keys must match tile positions)
    pub(crate) fn from_parts(tile_size: i32, tiles: HashMap<IVec2, Tile>, offgrid: Vec<PlacedTile>) -> Self {
        debug_assert!(tiles.iter().all(|(cell, tile)| *cell == tile.pos));
        Self {
            tile_size,
            tiles,
            offgrid,
        }
    }

    /// Create an empty map, rejecting a non-positive tile size
    pub fn with_tile_size(tile_size: i32, source: &Path) -> Result<Self, MapError> {
        if tile_size <= 0 {
            return Err(MapError::InvalidTileSize {
                path: source.to_path_buf(),
                tile_size,
            });
        }
        Ok(Self::new(tile_size))
    }

    #[inline]
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Place a tile, replacing whatever occupied the cell. The tile's
    /// position is rewritten to `cell` so key and position never disagree.
    pub fn set(&mut self, cell: IVec2, mut tile: Tile) -> Option<Tile> {
        tile.pos = cell;
        self.tiles.insert(cell, tile)
    }

    /// Remove the tile at `cell`, if any
    pub fn remove(&mut self, cell: IVec2) -> Option<Tile> {
        self.tiles.remove(&cell)
    }

    #[inline]
    pub fn get(&self, cell: IVec2) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    /// Number of grid tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.offgrid.is_empty()
    }

    /// Grid tiles in arbitrary order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub(crate) fn get_mut(&mut self, cell: IVec2) -> Option<&mut Tile> {
        self.tiles.get_mut(&cell)
    }

    pub(crate) fn grid(&self) -> &HashMap<IVec2, Tile> {
        &self.tiles
    }

    /// Off-grid tiles in draw order
    pub fn offgrid(&self) -> &[PlacedTile] {
        &self.offgrid
    }

    /// Append an off-grid tile on top of the existing ones
    pub fn push_offgrid(&mut self, tile: PlacedTile) {
        self.offgrid.push(tile);
    }

    /// Drop every off-grid tile matching `pred`; returns how many were removed
    pub fn remove_offgrid_where(&mut self, mut pred: impl FnMut(&PlacedTile) -> bool) -> usize {
        let before = self.offgrid.len();
        self.offgrid.retain(|tile| !pred(tile));
        before - self.offgrid.len()
    }

    /// Pull out every tile whose (kind, variant) is in `ids`.
    ///
    /// Off-grid matches come first, in draw order, followed by grid matches
    /// ordered by row then column. Returned positions are in pixels: grid
    /// tiles are scaled by the tile size, off-grid tiles already are. Unless
    /// `keep` is set, matched tiles are removed from the map.
    pub fn extract(&mut self, ids: &[TileId], keep: bool) -> Vec<PlacedTile> {
        let mut matches = Vec::new();

        self.offgrid.retain(|tile| {
            let hit = ids.contains(&tile.id());
            if hit {
                matches.push(*tile);
            }
            keep || !hit
        });

        let mut cells: Vec<IVec2> = self
            .tiles
            .values()
            .filter(|tile| ids.contains(&tile.id()))
            .map(|tile| tile.pos)
            .collect();
        cells.sort_by_key(|cell| (cell.y, cell.x));

        for cell in cells {
            let tile = if keep {
                self.tiles.get(&cell).copied()
            } else {
                self.tiles.remove(&cell)
            };
            if let Some(tile) = tile {
                matches.push(tile.to_pixels(self.tile_size));
            }
        }

        matches
    }

    /// Read a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        persistence::read_map(path.as_ref())
    }

    /// Read a map file, starting from an empty map of `tile_size` when it
    /// does not exist yet
    pub fn load_or_empty(path: impl AsRef<Path>, tile_size: i32) -> Result<Self, MapError> {
        match Self::load(path) {
            Err(MapError::NotFound { path }) => {
                log::info!("No map at {}, starting with an empty map", path.display());
                Self::with_tile_size(tile_size, &path)
            }
            other => other,
        }
    }

    /// Write this map to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        persistence::write_map(path.as_ref(), self)
    }
}
