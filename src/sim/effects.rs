//! Projectiles, sparks and particles
//!
//! `Effects` is the sink actors write into while they update: they spawn
//! effects and report deaths here instead of reaching into the game state.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::animation::{Animation, AnimationLibrary};
use crate::consts::IMPACT_SHAKE;
use crate::polar_to_cartesian;

/// Ticks a projectile survives without hitting anything
pub const PROJECTILE_LIFETIME: u32 = 360;

/// Sparks and particles spawned by an impact
pub const BURST_COUNT: usize = 30;

/// A shot travelling horizontally
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Signed horizontal speed (pixels per tick)
    pub speed: f32,
    /// Ticks alive
    pub timer: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self { pos, speed, timer: 0 }
    }

    pub fn advance(&mut self) {
        self.pos.x += self.speed;
        self.timer += 1;
    }

    pub fn expired(&self) -> bool {
        self.timer > PROJECTILE_LIFETIME
    }
}

/// A short streak that slows down and vanishes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Move one tick; returns true once the spark has stopped
    pub fn update(&mut self) -> bool {
        self.pos += polar_to_cartesian(self.speed, self.angle);
        self.speed = (self.speed - 0.1).max(0.0);
        self.speed == 0.0
    }

    /// Diamond outline in screen space: long along the heading, thin across
    pub fn polygon(&self, offset: Vec2) -> [Vec2; 4] {
        let center = self.pos - offset;
        [
            center + polar_to_cartesian(self.speed * 3.0, self.angle),
            center + polar_to_cartesian(self.speed * 0.5, self.angle + FRAC_PI_2),
            center + polar_to_cartesian(self.speed * 3.0, self.angle + PI),
            center + polar_to_cartesian(self.speed * 0.5, self.angle - FRAC_PI_2),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Leaf,
    Particle,
}

impl ParticleKind {
    pub fn animation_key(self) -> &'static str {
        match self {
            ParticleKind::Leaf => "particle/leaf",
            ParticleKind::Particle => "particle/particle",
        }
    }
}

/// An animated particle that lives for one play of its animation
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub animation: Animation,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, velocity: Vec2, animation: Animation) -> Self {
        Self {
            kind,
            pos,
            velocity,
            animation,
        }
    }

    /// Advance one tick; returns true if the animation had already finished
    pub fn update(&mut self) -> bool {
        let finished = self.animation.done();
        self.pos += self.velocity;
        self.animation.update();
        if self.kind == ParticleKind::Leaf {
            self.pos.x += (self.animation.frame() as f32 * 0.035).sin() * 0.3;
        }
        finished
    }
}

/// Live effects plus the shared screenshake and death counters
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub projectiles: Vec<Projectile>,
    pub sparks: Vec<Spark>,
    pub particles: Vec<Particle>,
    /// Remaining shake magnitude (pixels), decays by one per tick
    pub screenshake: f32,
    /// Ticks since the death was registered; 0 while alive
    pub dead: u32,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the shake to at least `amount`
    pub fn shake(&mut self, amount: f32) {
        self.screenshake = self.screenshake.max(amount);
    }

    /// Count a death tick; the first one also shakes the screen
    pub fn register_death(&mut self) {
        if self.dead == 0 {
            self.shake(IMPACT_SHAKE);
            log::info!("Death registered");
        }
        self.dead += 1;
    }

    pub fn is_dead(&self) -> bool {
        self.dead > 0
    }

    /// Drop every projectile, spark and particle and reset the counters
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.sparks.clear();
        self.particles.clear();
        self.dead = 0;
    }

    /// Spawn a particle whose animation starts at `frame`
    pub fn spawn_particle(
        &mut self,
        animations: &AnimationLibrary,
        kind: ParticleKind,
        pos: Vec2,
        velocity: Vec2,
        frame: u32,
    ) {
        let spec = animations.start(kind.animation_key()).spec();
        self.particles
            .push(Particle::new(kind, pos, velocity, Animation::starting_at(spec, frame)));
    }

    /// Sparks flying out of `center` within half a radian of `angle`
    pub fn spray(&mut self, rng: &mut Pcg32, center: Vec2, angle: f32, count: usize) {
        for _ in 0..count {
            let jitter = rng.random::<f32>() - 0.5;
            let speed = 2.0 + rng.random::<f32>();
            self.sparks.push(Spark::new(center, angle + jitter, speed));
        }
    }

    /// Impact explosion: sparks in every direction with particles thrown the
    /// opposite way
    pub fn burst(&mut self, rng: &mut Pcg32, animations: &AnimationLibrary, center: Vec2) {
        for _ in 0..BURST_COUNT {
            let angle = rng.random::<f32>() * TAU;
            let speed = rng.random::<f32>() * 5.0;
            self.sparks
                .push(Spark::new(center, angle, 2.0 + rng.random::<f32>()));
            let velocity = polar_to_cartesian(speed * 0.5, angle + PI);
            let frame = rng.random_range(0..=7);
            self.spawn_particle(animations, ParticleKind::Particle, center, velocity, frame);
        }
    }
}
