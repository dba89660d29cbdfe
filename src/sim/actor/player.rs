//! The player character
//!
//! Runs, jumps (once per landing, or off a wall while sliding) and dashes.
//! A fast dash hides the sprite and kills enemies it passes through.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{Actor, ActorContext, ActorCore, ActorKind, AirTime, PlayerSnapshot};
use crate::consts::HUMANOID_SIZE;
use crate::polar_to_cartesian;
use crate::sim::animation::AnimationLibrary;
use crate::sim::effects::ParticleKind;

/// Airborne ticks before a fall is fatal
pub const PLAYER_FALL_LIMIT: u32 = 120;
/// Length of a dash, cooldown included
pub const DASH_TICKS: i32 = 60;
/// While `|dashing|` is above this the player is fast, invisible and invulnerable
pub const DASH_FAST_UNTIL: i32 = 50;

const JUMP_VELOCITY: f32 = -3.5;
const WALL_JUMP_VELOCITY: Vec2 = Vec2::new(3.5, -2.5);
const WALL_SLIDE_MAX_FALL: f32 = 0.5;
const DASH_SPEED: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Player {
    core: ActorCore,
    pub air: AirTime,
    pub wall_slide: bool,
    /// Signed dash timer: counts from ±60 toward zero, sign is the direction
    pub dashing: i32,
}

impl Player {
    pub fn new(pos: Vec2, animations: &AnimationLibrary) -> Self {
        Self {
            core: ActorCore::new(ActorKind::Player, pos, Vec2::from(HUMANOID_SIZE), animations),
            air: AirTime::new(PLAYER_FALL_LIMIT),
            wall_slide: false,
            dashing: 0,
        }
    }

    /// Teleport to a spawn point without tripping the fall timer
    pub fn place(&mut self, pos: Vec2) {
        self.core.body.pos = pos;
        self.air.reset();
    }

    /// Jump, or kick off the wall while wall sliding. Returns whether a jump
    /// happened.
    pub fn jump(&mut self) -> bool {
        let body = &mut self.core.body;
        if self.wall_slide {
            let away = if body.flip && body.last_movement.x < 0.0 {
                1.0
            } else if !body.flip && body.last_movement.x > 0.0 {
                -1.0
            } else {
                return false;
            };
            body.velocity = Vec2::new(WALL_JUMP_VELOCITY.x * away, WALL_JUMP_VELOCITY.y);
            self.air.ticks = 5;
            self.air.jumps = self.air.jumps.saturating_sub(1);
            return true;
        }
        self.air.jump(body, JUMP_VELOCITY)
    }

    /// Start a dash in the facing direction unless one is in progress
    pub fn dash(&mut self) {
        if self.dashing == 0 {
            self.dashing = if self.core.body.flip { -DASH_TICKS } else { DASH_TICKS };
        }
    }

    pub fn dashing_fast(&self) -> bool {
        self.dashing.abs() > DASH_FAST_UNTIL
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            pos: self.core.body.pos,
            rect: self.core.body.rect(),
            dashing: self.dashing,
        }
    }

    fn update_wall_slide(&mut self, animations: &AnimationLibrary) {
        let body = &mut self.core.body;
        self.wall_slide = body.collisions.horizontal() && self.air.airborne();
        if self.wall_slide {
            body.velocity.y = body.velocity.y.min(WALL_SLIDE_MAX_FALL);
            body.flip = !body.collisions.right;
            self.core.set_action("wall_slide", animations);
        }
    }

    fn update_dash(&mut self, ctx: &mut ActorContext<'_>) {
        let center = self.core.body.rect().center();

        if self.dashing.abs() == DASH_TICKS || self.dashing.abs() == DASH_FAST_UNTIL {
            for _ in 0..20 {
                let angle = ctx.rng.random::<f32>() * TAU;
                let speed = ctx.rng.random::<f32>() * 0.5 + 0.5;
                let frame = ctx.rng.random_range(0..=7);
                ctx.effects.spawn_particle(
                    ctx.animations,
                    ParticleKind::Particle,
                    center,
                    polar_to_cartesian(speed, angle),
                    frame,
                );
            }
        }

        self.dashing -= self.dashing.signum();

        if self.dashing_fast() {
            let direction = self.dashing.signum() as f32;
            let body = &mut self.core.body;
            body.velocity.x = direction * DASH_SPEED;
            if self.dashing.abs() == DASH_FAST_UNTIL + 1 {
                body.velocity.x *= 0.1;
            }
            let stream = Vec2::new(direction * ctx.rng.random::<f32>() * 3.0, 0.0);
            let frame = ctx.rng.random_range(0..=7);
            ctx.effects
                .spawn_particle(ctx.animations, ParticleKind::Particle, center, stream, frame);
        }
    }
}

impl Actor for Player {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, movement: Vec2) -> bool {
        self.core.step(ctx.tilemap, movement);
        self.air.tick(&self.core.body, ctx.effects);

        self.update_wall_slide(ctx.animations);
        if !self.wall_slide {
            let action = if self.air.airborne() {
                "jump"
            } else if movement.x != 0.0 {
                "run"
            } else {
                "idle"
            };
            self.core.set_action(action, ctx.animations);
        }

        self.update_dash(ctx);
        self.core.body.decay_horizontal();
        false
    }

    fn visible(&self) -> bool {
        !self.dashing_fast()
    }
}
