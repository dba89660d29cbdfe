//! Companion characters steered by their own keys

use glam::Vec2;

use super::{Actor, ActorContext, ActorCore, ActorKind, AirTime};
use crate::consts::HUMANOID_SIZE;
use crate::sim::animation::AnimationLibrary;

const COMPANION_JUMP_VELOCITY: f32 = -3.0;
pub const MATT_FALL_LIMIT: u32 = 240;
pub const POTTS_FALL_LIMIT: u32 = 120;

#[derive(Debug, Clone)]
pub struct Matt {
    core: ActorCore,
    pub air: AirTime,
    pub angry: bool,
}

impl Matt {
    pub fn new(pos: Vec2, animations: &AnimationLibrary) -> Self {
        Self {
            core: ActorCore::new(ActorKind::Matt, pos, Vec2::from(HUMANOID_SIZE), animations),
            air: AirTime::new(MATT_FALL_LIMIT),
            angry: false,
        }
    }

    pub fn jump(&mut self) -> bool {
        self.air.jump(&mut self.core.body, COMPANION_JUMP_VELOCITY)
    }
}

impl Actor for Matt {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, movement: Vec2) -> bool {
        self.core.step(ctx.tilemap, movement);
        self.air.tick(&self.core.body, ctx.effects);

        let action = if self.air.airborne() {
            "jump"
        } else if movement.x != 0.0 {
            "walk"
        } else if self.angry {
            "angry"
        } else {
            "idle"
        };
        self.core.set_action(action, ctx.animations);
        self.core.body.decay_horizontal();
        false
    }
}

#[derive(Debug, Clone)]
pub struct Potts {
    core: ActorCore,
    pub air: AirTime,
    pub milk: bool,
    pub surprised: bool,
}

impl Potts {
    pub fn new(pos: Vec2, animations: &AnimationLibrary) -> Self {
        Self {
            core: ActorCore::new(ActorKind::Potts, pos, Vec2::from(HUMANOID_SIZE), animations),
            air: AirTime::new(POTTS_FALL_LIMIT),
            milk: false,
            surprised: false,
        }
    }

    pub fn jump(&mut self) -> bool {
        self.air.jump(&mut self.core.body, COMPANION_JUMP_VELOCITY)
    }
}

impl Actor for Potts {
    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, movement: Vec2) -> bool {
        self.core.step(ctx.tilemap, movement);
        self.air.tick(&self.core.body, ctx.effects);

        let action = if self.air.airborne() {
            "jump"
        } else if movement.x != 0.0 {
            "walk"
        } else if self.milk {
            "milk"
        } else if self.surprised {
            "surprised"
        } else {
            "idle"
        };
        self.core.set_action(action, ctx.animations);
        self.core.body.decay_horizontal();
        false
    }
}
