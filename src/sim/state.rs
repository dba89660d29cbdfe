//! Game state and level lifecycle
//!
//! Everything the simulation touches lives here. The RNG is seeded so a run
//! replays identically from the same seed and inputs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Actor, Enemy, Matt, Player, Potts};
use super::animation::AnimationLibrary;
use super::camera::Camera;
use super::clouds::Clouds;
use super::effects::Effects;
use super::rect::Rect;
use super::tile::{TileId, TileKind};
use super::tilemap::Tilemap;
use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Trees that shed leaves
pub const LEAF_TREE: TileId = (TileKind::LargeDecor, 2);

/// Spawner variants
pub const SPAWN_PLAYER: usize = 0;
pub const SPAWN_ENEMY: usize = 1;
pub const SPAWN_MATT: usize = 2;
pub const SPAWN_POTTS: usize = 3;

/// Where the player stands when a level has no player spawner
const DEFAULT_PLAYER_POS: Vec2 = Vec2::new(50.0, 50.0);

/// Fixed parameters of a game session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Size of the low-resolution display in pixels
    pub viewport: Vec2,
    pub cloud_count: usize,
    /// Number of distinct cloud images
    pub cloud_images: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(DISPLAY_WIDTH as f32, DISPLAY_HEIGHT as f32),
            cloud_count: 16,
            cloud_images: 1,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    /// Identifier of the loaded level, e.g. `"02"`
    pub level_id: String,
    /// The level as loaded, kept for respawning
    level: Tilemap,
    /// The live map (spawners removed)
    pub tilemap: Tilemap,
    pub animations: AnimationLibrary,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub matt: Option<Matt>,
    pub potts: Option<Potts>,
    pub effects: Effects,
    /// Areas under leaf trees where falling leaves appear
    pub leaf_spawners: Vec<Rect>,
    pub clouds: Clouds,
    pub camera: Camera,
    pub viewport: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a game with an empty level
    pub fn new(seed: u64, animations: AnimationLibrary, config: GameConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let clouds = Clouds::new(&mut rng, config.cloud_images, config.cloud_count);
        let player = Player::new(DEFAULT_PLAYER_POS, &animations);
        Self {
            seed,
            rng,
            level_id: String::new(),
            level: Tilemap::default(),
            tilemap: Tilemap::default(),
            animations,
            player,
            enemies: Vec::new(),
            matt: None,
            potts: None,
            effects: Effects::new(),
            leaf_spawners: Vec::new(),
            clouds,
            camera: Camera::default(),
            viewport: config.viewport,
            time_ticks: 0,
        }
    }

    /// Install `map` as the current level and start it
    pub fn load_level(&mut self, level_id: &str, map: Tilemap) {
        self.level_id = level_id.to_string();
        self.level = map;
        self.restart_level();
    }

    /// Start the current level over from its pristine copy
    pub fn restart_level(&mut self) {
        self.tilemap = self.level.clone();

        self.leaf_spawners = self
            .tilemap
            .extract(&[LEAF_TREE], true)
            .into_iter()
            .map(|tree| {
                let pos = tree.position();
                Rect::new(pos.x + 4.0, pos.y + 4.0, 23.0, 13.0)
            })
            .collect();

        self.player = Player::new(DEFAULT_PLAYER_POS, &self.animations);
        self.enemies.clear();
        self.matt = None;
        self.potts = None;

        let spawner_ids: Vec<TileId> = [SPAWN_PLAYER, SPAWN_ENEMY, SPAWN_MATT, SPAWN_POTTS]
            .into_iter()
            .map(|variant| (TileKind::Spawners, variant))
            .collect();
        for spawner in self.tilemap.extract(&spawner_ids, false) {
            match spawner.variant {
                SPAWN_PLAYER => self.player.place(spawner.position()),
                SPAWN_MATT => self.matt = Some(Matt::new(spawner.position(), &self.animations)),
                SPAWN_POTTS => self.potts = Some(Potts::new(spawner.position(), &self.animations)),
                _ => self.enemies.push(Enemy::new(spawner.position(), &self.animations)),
            }
        }

        self.effects.clear();
        self.camera.reset();

        log::info!(
            "Level {:?} started: {} tiles, {} enemies, {} leaf trees, player at ({:.0}, {:.0})",
            self.level_id,
            self.tilemap.len(),
            self.enemies.len(),
            self.leaf_spawners.len(),
            self.player.body().pos.x,
            self.player.body().pos.y
        );
    }

    pub fn is_dead(&self) -> bool {
        self.effects.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::{PlacedTile, Tile};
    use glam::IVec2;

    fn level() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in 0..10 {
            map.set(IVec2::new(x, 5), Tile::new(TileKind::Grass, 1, IVec2::ZERO));
        }
        map.set(IVec2::new(1, 3), Tile::new(TileKind::Spawners, SPAWN_PLAYER, IVec2::ZERO));
        map.set(IVec2::new(6, 4), Tile::new(TileKind::Spawners, SPAWN_ENEMY, IVec2::ZERO));
        map.set(IVec2::new(8, 4), Tile::new(TileKind::Spawners, SPAWN_ENEMY, IVec2::ZERO));
        map.set(IVec2::new(3, 3), Tile::new(TileKind::Spawners, SPAWN_POTTS, IVec2::ZERO));
        map.push_offgrid(PlacedTile::new(TileKind::LargeDecor, 2, Vec2::new(100.0, 20.0)));
        map
    }

    fn state() -> GameState {
        GameState::new(42, AnimationLibrary::standard(|_| 4), GameConfig::default())
    }

    #[test]
    fn test_load_level_spawns_actors() {
        let mut state = state();
        state.load_level("02", level());

        assert_eq!(state.player.body().pos, Vec2::new(16.0, 48.0));
        assert_eq!(state.enemies.len(), 2);
        assert!(state.matt.is_none());
        assert_eq!(state.potts.as_ref().map(|p| p.body().pos), Some(Vec2::new(48.0, 48.0)));
        assert_eq!(state.leaf_spawners, vec![Rect::new(104.0, 24.0, 23.0, 13.0)]);

        // Spawners are gone from the live map, trees stay
        assert_eq!(state.tilemap.len(), 10);
        assert_eq!(state.tilemap.offgrid().len(), 1);
    }

    #[test]
    fn test_restart_restores_pristine_level() {
        let mut state = state();
        state.load_level("02", level());
        state.enemies.clear();
        state.tilemap.remove(IVec2::new(0, 5));
        state.effects.register_death();
        state.camera.scroll = Vec2::new(100.0, 100.0);

        state.restart_level();

        assert_eq!(state.enemies.len(), 2);
        assert!(state.tilemap.get(IVec2::new(0, 5)).is_some());
        assert!(!state.is_dead());
        assert_eq!(state.camera.scroll, Vec2::ZERO);
    }

    #[test]
    fn test_clouds_seeded() {
        let a = state();
        let b = state();
        let pa: Vec<Vec2> = a.clouds.iter().map(|c| c.pos).collect();
        let pb: Vec<Vec2> = b.clouds.iter().map(|c| c.pos).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.clouds.len(), 16);
    }
}
