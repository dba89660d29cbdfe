//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Tile grid read through coordinate lookups, never by scanning

pub mod actor;
pub mod animation;
pub mod autotile;
pub mod camera;
pub mod clouds;
pub mod collision;
pub mod effects;
pub mod query;
pub mod rect;
pub mod state;
pub mod tick;
pub mod tile;
pub mod tilemap;

pub use actor::{Actor, ActorContext, ActorKind, Enemy, Matt, Player, PlayerSnapshot, Potts};
pub use animation::{Animation, AnimationLibrary, AnimationSpec};
pub use autotile::{NeighborSet, autotile_variant};
pub use camera::Camera;
pub use clouds::{Cloud, Clouds};
pub use collision::{Collisions, PhysicsBody, resolve_movement};
pub use effects::{Effects, Particle, ParticleKind, Projectile, Spark};
pub use rect::Rect;
pub use state::{GameConfig, GameState};
pub use tick::{MoveIntent, TickInput, tick};
pub use tile::{AUTOTILE_TYPES, PHYSICS_TILES, PlacedTile, Tile, TileId, TileKind};
pub use tilemap::Tilemap;
