//! Patrolling enemy
//!
//! Walks in short random bursts, turns at walls and ledges, and shoots
//! along its facing when the player is level with it.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::{Actor, ActorContext, ActorCore, ActorKind};
use crate::consts::{ENEMY_SIZE, IMPACT_SHAKE};
use crate::sim::animation::AnimationLibrary;
use crate::sim::effects::{Projectile, Spark};

use super::player::DASH_FAST_UNTIL;

/// Chance per idle tick to start walking
const WALK_CHANCE: f32 = 0.01;
const WALK_SPEED: f32 = 0.5;
/// Ledge probe: ahead of the center, and below the top edge
const PROBE_AHEAD: f32 = 7.0;
const PROBE_DOWN: f32 = 23.0;
/// Player must be within this many pixels vertically to be shot at
const SIGHT_HEIGHT: f32 = 32.0;
const PROJECTILE_SPEED: f32 = 1.5;

/// A patrolling gunner
#[derive(Debug, Clone)]
pub struct Enemy {
    core: ActorCore,
    /// Ticks of walking left; 0 while standing
    pub walking: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, animations: &AnimationLibrary) -> Self {
        Self {
            core: ActorCore::new(ActorKind::Enemy, pos, Vec2::from(ENEMY_SIZE), animations),
            walking: 0,
        }
    }

    /// Walk forward, turning at walls and ledges
    fn patrol(&mut self, ctx: &ActorContext<'_>, movement: &mut Vec2) {
        let body = &mut self.core.body;
        let ahead = if body.flip { -PROBE_AHEAD } else { PROBE_AHEAD };
        let probe = Vec2::new(body.rect().center().x + ahead, body.pos.y + PROBE_DOWN);

        if ctx.tilemap.solid_check(probe).is_some() {
            if body.collisions.horizontal() {
                body.flip = !body.flip;
            } else {
                movement.x += if body.flip { -WALK_SPEED } else { WALK_SPEED };
            }
        } else {
            body.flip = !body.flip;
        }
    }

    /// Fire at the player if they stand level with us in the facing direction
    fn shoot(&self, ctx: &mut ActorContext<'_>) {
        let body = &self.core.body;
        let distance = ctx.player.pos - body.pos;
        if distance.y.abs() >= SIGHT_HEIGHT {
            return;
        }
        let center = body.rect().center();
        let (direction, angle) = match (body.flip, distance.x) {
            (true, dx) if dx < 0.0 => (-1.0, PI),
            (false, dx) if dx > 0.0 => (1.0, 0.0),
            _ => return,
        };
        let muzzle = Vec2::new(center.x + PROBE_AHEAD * direction, center.y);
        ctx.effects
            .projectiles
            .push(Projectile::new(muzzle, PROJECTILE_SPEED * direction));
        ctx.effects.spray(ctx.rng, muzzle, angle, 4);
        log::debug!("Enemy at ({:.1}, {:.1}) fired", body.pos.x, body.pos.y);
    }

    /// Being dashed through kills; returns true if it did
    fn check_dash_hit(&self, ctx: &mut ActorContext<'_>) -> bool {
        if ctx.player.dashing.abs() < DASH_FAST_UNTIL {
            return false;
        }
        let rect = self.core.body.rect();
        if !rect.overlaps(&ctx.player.rect) {
            return false;
        }

        let center = rect.center();
        ctx.effects.shake(IMPACT_SHAKE);
        ctx.effects.burst(ctx.rng, ctx.animations, center);
        for angle in [0.0, PI] {
            let speed = 5.0 + ctx.rng.random::<f32>();
            ctx.effects.sparks.push(Spark::new(center, angle, speed));
        }
        log::info!("Enemy at ({:.1}, {:.1}) destroyed", rect.x, rect.y);
        true
    }
}

impl Actor for Enemy {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, movement: Vec2) -> bool {
        let mut movement = movement;
        if self.walking > 0 {
            self.patrol(ctx, &mut movement);
            self.walking -= 1;
            if self.walking == 0 {
                self.shoot(ctx);
            }
        } else if ctx.rng.random::<f32>() < WALK_CHANCE {
            self.walking = ctx.rng.random_range(30..=120);
        }

        self.core.step(ctx.tilemap, movement);
        let action = if movement.x != 0.0 { "run" } else { "idle" };
        self.core.set_action(action, ctx.animations);

        self.check_dash_hit(ctx)
    }
}
