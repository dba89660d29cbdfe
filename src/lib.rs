//! Ninja Platformer - a tile-based 2D platformer and its level editor
//!
//! Core modules:
//! - `sim`: Tile grid, autotiling, spatial queries, collision, camera, actors
//! - `renderer`: Surface/asset collaborator traits and the frame compositor
//! - `platform`: Input events, key mapping and frame pacing
//! - `persistence`: JSON map file format
//! - `editor`: Level editor session over the same tile grid
//! - `session`: Frame loops driving the game and the editor
//! - `settings`: File-backed configuration

pub mod editor;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use editor::Editor;
pub use persistence::MapError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Edge length of one grid cell in pixels
    pub const TILE_SIZE: i32 = 16;

    /// Low-resolution display the game renders into before scaling
    pub const DISPLAY_WIDTH: i32 = 455;
    pub const DISPLAY_HEIGHT: i32 = 270;

    /// Downward acceleration added to vertical velocity each tick
    pub const GRAVITY: f32 = 0.1;
    /// Terminal fall speed (pixels per tick)
    pub const MAX_FALL_SPEED: f32 = 5.0;

    /// Camera closes 1/N of the distance to its target every tick
    pub const CAMERA_SMOOTHING: f32 = 30.0;
    /// Editor pan speed (pixels per tick)
    pub const EDITOR_PAN_SPEED: f32 = 2.0;

    /// Ticks spent dead before the level reloads
    pub const RESPAWN_DELAY_TICKS: u32 = 40;
    /// Screenshake applied on deaths and kills
    pub const IMPACT_SHAKE: f32 = 16.0;

    /// Player and companion hitbox
    pub const HUMANOID_SIZE: (f32, f32) = (12.0, 29.0);
    /// Enemy hitbox
    pub const ENEMY_SIZE: (f32, f32) = (8.0, 12.0);
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
