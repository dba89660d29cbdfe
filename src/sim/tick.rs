//! Fixed timestep simulation tick
//!
//! One call advances the whole game by one frame: camera, ambient effects,
//! actors, then projectiles and short-lived effects.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::actor::{Actor, ActorContext, DASH_FAST_UNTIL};
use super::effects::ParticleKind;
use super::state::GameState;
use crate::consts::{IMPACT_SHAKE, RESPAWN_DELAY_TICKS};

/// Leaf chance per tick is the emitter area divided by this
const LEAF_RARITY: f32 = 49_999.0;
const LEAF_VELOCITY: Vec2 = Vec2::new(-0.1, 0.3);

/// Held left/right keys for one character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// -1, 0 or 1; opposite keys cancel
    pub fn axis(&self) -> f32 {
        self.right as i32 as f32 - self.left as i32 as f32
    }

    pub fn movement(&self) -> Vec2 {
        Vec2::new(self.axis(), 0.0)
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub player: MoveIntent,
    pub matt: MoveIntent,
    pub potts: MoveIntent,
    /// Pressed this tick
    pub jump: bool,
    pub dash: bool,
    pub matt_jump: bool,
    pub potts_jump: bool,
    /// Held
    pub matt_angry: bool,
    pub potts_milk: bool,
    pub potts_surprised: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    apply_commands(state, input);

    state.effects.screenshake = (state.effects.screenshake - 1.0).max(0.0);

    if state.effects.is_dead() {
        state.effects.dead += 1;
        if state.effects.dead > RESPAWN_DELAY_TICKS {
            log::info!("Respawning in level {:?}", state.level_id);
            state.restart_level();
        }
    }

    let target = state.player.body().rect().center();
    state.camera.follow(target, state.viewport);

    spawn_leaves(state);
    state.clouds.update();

    let mut ctx = ActorContext {
        tilemap: &state.tilemap,
        animations: &state.animations,
        effects: &mut state.effects,
        rng: &mut state.rng,
        player: state.player.snapshot(),
    };

    state.enemies.retain_mut(|enemy| !enemy.update(&mut ctx, Vec2::ZERO));
    if let Some(matt) = state.matt.as_mut() {
        matt.update(&mut ctx, input.matt.movement());
    }
    if let Some(potts) = state.potts.as_mut() {
        potts.update(&mut ctx, input.potts.movement());
    }
    if !ctx.effects.is_dead() {
        state.player.update(&mut ctx, input.player.movement());
    }

    update_projectiles(state);

    state.effects.sparks.retain_mut(|spark| !spark.update());
    state.effects.particles.retain_mut(|particle| !particle.update());

    state.time_ticks += 1;
}

fn apply_commands(state: &mut GameState, input: &TickInput) {
    if input.jump {
        state.player.jump();
    }
    if input.dash {
        state.player.dash();
    }
    if let Some(matt) = state.matt.as_mut() {
        if input.matt_jump {
            matt.jump();
        }
        matt.angry = input.matt_angry;
    }
    if let Some(potts) = state.potts.as_mut() {
        if input.potts_jump {
            potts.jump();
        }
        potts.milk = input.potts_milk;
        potts.surprised = input.potts_surprised;
    }
}

fn spawn_leaves(state: &mut GameState) {
    for area in &state.leaf_spawners {
        if state.rng.random::<f32>() * LEAF_RARITY < area.area() {
            let pos = Vec2::new(
                area.x + state.rng.random::<f32>() * area.w,
                area.y + state.rng.random::<f32>() * area.h,
            );
            let frame = state.rng.random_range(0..=20);
            state.effects.spawn_particle(
                &state.animations,
                ParticleKind::Leaf,
                pos,
                LEAF_VELOCITY,
                frame,
            );
        }
    }
}

/// Move every projectile and resolve its hits against walls and the player
fn update_projectiles(state: &mut GameState) {
    let player = state.player.snapshot();
    let projectiles = std::mem::take(&mut state.effects.projectiles);
    let mut remaining = Vec::with_capacity(projectiles.len());

    for mut shot in projectiles {
        shot.advance();
        if state.tilemap.solid_check(shot.pos).is_some() {
            let back = if shot.speed > 0.0 { PI } else { 0.0 };
            state.effects.spray(&mut state.rng, shot.pos, back, 4);
        } else if shot.expired() {
            log::trace!("Projectile expired at ({:.1}, {:.1})", shot.pos.x, shot.pos.y);
        } else if player.dashing.abs() < DASH_FAST_UNTIL && player.rect.contains_point(shot.pos) {
            state.effects.shake(IMPACT_SHAKE);
            state.effects.register_death();
            state
                .effects
                .burst(&mut state.rng, &state.animations, player.rect.center());
            log::info!("Player shot at ({:.1}, {:.1})", shot.pos.x, shot.pos.y);
        } else {
            remaining.push(shot);
        }
    }

    state.effects.projectiles = remaining;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::AnimationLibrary;
    use crate::sim::effects::Projectile;
    use crate::sim::state::{GameConfig, SPAWN_ENEMY, SPAWN_MATT, SPAWN_PLAYER};
    use crate::sim::tile::{Tile, TileKind};
    use crate::sim::tilemap::Tilemap;
    use glam::IVec2;

    fn level() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in -5..15 {
            map.set(IVec2::new(x, 8), Tile::new(TileKind::Grass, 1, IVec2::ZERO));
        }
        // Enemy platform far below, out of shooting range
        for x in 18..30 {
            map.set(IVec2::new(x, 20), Tile::new(TileKind::Stone, 1, IVec2::ZERO));
        }
        map.set(IVec2::new(2, 5), Tile::new(TileKind::Spawners, SPAWN_PLAYER, IVec2::ZERO));
        map.set(IVec2::new(20, 18), Tile::new(TileKind::Spawners, SPAWN_ENEMY, IVec2::ZERO));
        map.set(IVec2::new(5, 5), Tile::new(TileKind::Spawners, SPAWN_MATT, IVec2::ZERO));
        map
    }

    fn state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, AnimationLibrary::standard(|_| 4), GameConfig::default());
        state.load_level("test", level());
        state
    }

    #[test]
    fn test_player_falls_to_floor_and_walks() {
        let mut state = state(1);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.body().rect().bottom(), 128.0);
        assert!(!state.is_dead());

        let start_x = state.player.body().pos.x;
        let walk = TickInput {
            player: MoveIntent { left: false, right: true },
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &walk);
        }
        assert_eq!(state.player.body().pos.x, start_x + 10.0);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut state = state(1);
        for _ in 0..300 {
            tick(&mut state, &TickInput::default());
        }
        let center = state.player.body().rect().center();
        let goal = center - state.viewport / 2.0;
        assert!((state.camera.scroll - goal).length() < 1.0);
    }

    #[test]
    fn test_companion_input() {
        let mut state = state(1);
        let input = TickInput {
            matt: MoveIntent { left: true, right: false },
            matt_angry: true,
            ..Default::default()
        };
        let start = state.matt.as_ref().map(|m| m.body().pos.x);
        tick(&mut state, &input);
        let matt = state.matt.as_ref().map(|m| (m.body().pos.x, m.angry));
        assert_eq!(matt, start.map(|x| (x - 1.0, true)));
    }

    #[test]
    fn test_projectile_hits_player_and_level_restarts() {
        let mut state = state(1);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        let rect = state.player.body().rect();
        state.effects.projectiles.clear();
        state
            .effects
            .projectiles
            .push(Projectile::new(Vec2::new(rect.x - 1.0, rect.center().y), 1.5));

        tick(&mut state, &TickInput::default());
        assert!(state.is_dead());
        assert!(state.effects.projectiles.is_empty());
        assert_eq!(state.effects.screenshake, IMPACT_SHAKE);

        let dead_pos = state.player.body().pos;
        for _ in 0..RESPAWN_DELAY_TICKS {
            tick(&mut state, &TickInput::default());
            if !state.is_dead() {
                break;
            }
            // Player is frozen while dead
            assert_eq!(state.player.body().pos, dead_pos);
        }
        assert!(!state.is_dead());
        assert_eq!(state.player.body().pos.x, 32.0);
    }

    #[test]
    fn test_projectile_stopped_by_wall() {
        let mut state = state(1);
        state.effects.projectiles.clear();
        state
            .effects
            .projectiles
            .push(Projectile::new(Vec2::new(100.0, 130.0), -1.5));
        tick(&mut state, &TickInput::default());
        assert!(state.effects.projectiles.is_empty());
        assert!(state.effects.sparks.len() >= 4);
    }

    #[test]
    fn test_dashing_player_is_invulnerable() {
        let mut state = state(1);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        tick(&mut state, &dash);
        let rect = state.player.body().rect();
        state.effects.projectiles.clear();
        state
            .effects
            .projectiles
            .push(Projectile::new(rect.center() - Vec2::new(1.5, 0.0), 1.5));

        tick(&mut state, &TickInput::default());
        assert!(!state.is_dead());
    }

    #[test]
    fn test_determinism() {
        let mut a = state(99_999);
        let mut b = state(99_999);
        let inputs = [
            TickInput {
                player: MoveIntent { left: false, right: true },
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                dash: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.body().pos, b.player.body().pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.effects.particles.len(), b.effects.particles.len());
        assert_eq!(a.effects.projectiles, b.effects.projectiles);
    }
}
