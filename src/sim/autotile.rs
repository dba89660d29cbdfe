//! Neighbor-based variant selection
//!
//! Grass and stone art comes in nine variants: four corners, four edges and
//! a fill. The right one follows from which orthogonal neighbors share the
//! tile's category.

use glam::IVec2;

use super::tile::Tile;
use super::tilemap::Tilemap;

const RIGHT: u8 = 1 << 0;
const LEFT: u8 = 1 << 1;
const UP: u8 = 1 << 2;
const DOWN: u8 = 1 << 3;

/// Orthogonal neighbor offsets and the bit each one sets
const NEIGHBOR_SHIFTS: [(IVec2, u8); 4] = [
    (IVec2::new(1, 0), RIGHT),
    (IVec2::new(-1, 0), LEFT),
    (IVec2::new(0, -1), UP),
    (IVec2::new(0, 1), DOWN),
];

/// Neighbor set -> variant
const AUTOTILE_MAP: [(u8, usize); 9] = [
    (RIGHT | DOWN, 0),
    (RIGHT | DOWN | LEFT, 1),
    (LEFT | DOWN, 2),
    (LEFT | UP | DOWN, 3),
    (LEFT | UP, 4),
    (LEFT | UP | RIGHT, 5),
    (RIGHT | UP, 6),
    (RIGHT | UP | DOWN, 7),
    (RIGHT | LEFT | DOWN | UP, 8),
];

/// Set of same-category orthogonal neighbors.
///
/// Stored as a bitmask, which is its own canonical form: two sets built in
/// any order compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NeighborSet(u8);

impl NeighborSet {
    pub fn insert(&mut self, shift: IVec2) {
        if let Some((_, bit)) = NEIGHBOR_SHIFTS.iter().find(|(s, _)| *s == shift) {
            self.0 |= bit;
        }
    }

    pub fn contains(&self, shift: IVec2) -> bool {
        NEIGHBOR_SHIFTS
            .iter()
            .any(|(s, bit)| *s == shift && self.0 & bit != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn from_shifts(shifts: &[IVec2]) -> Self {
        let mut set = Self::default();
        for shift in shifts {
            set.insert(*shift);
        }
        set
    }
}

/// Variant for a neighbor set, if the set is one of the nine known shapes
pub fn autotile_variant(neighbors: NeighborSet) -> Option<usize> {
    AUTOTILE_MAP
        .iter()
        .find(|(mask, _)| *mask == neighbors.0)
        .map(|(_, variant)| *variant)
}

impl Tilemap {
    /// Orthogonal neighbors of `tile` that share its category
    pub fn same_kind_neighbors(&self, tile: &Tile) -> NeighborSet {
        let mut set = NeighborSet::default();
        for (shift, _) in NEIGHBOR_SHIFTS {
            if self
                .get(tile.pos + shift)
                .is_some_and(|neighbor| neighbor.kind == tile.kind)
            {
                set.insert(shift);
            }
        }
        set
    }

    /// Rewrite the variant of every autotile-eligible grid tile from its
    /// neighbors. Tiles with an unrecognized neighbor set keep their variant.
    /// Only variants change, never categories, so a second pass is a no-op.
    ///
    /// Returns the number of tiles whose variant changed.
    pub fn autotile(&mut self) -> usize {
        let updates: Vec<(IVec2, usize)> = self
            .tiles()
            .filter(|tile| tile.kind.is_autotile())
            .filter_map(|tile| {
                autotile_variant(self.same_kind_neighbors(tile))
                    .filter(|variant| *variant != tile.variant)
                    .map(|variant| (tile.pos, variant))
            })
            .collect();

        for (cell, variant) in &updates {
            if let Some(tile) = self.get_mut(*cell) {
                tile.variant = *variant;
            }
        }

        log::info!("Autotile pass updated {} tiles", updates.len());
        updates.len()
    }
}
