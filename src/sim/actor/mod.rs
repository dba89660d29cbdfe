//! Actors: the player, enemies and the two companion characters
//!
//! Every actor owns a `PhysicsBody` and an animation. The shared physics step
//! is the free function `resolve_movement`; each actor layers its own rules
//! (jumping, dashing, patrolling) on top. Actors never hold a reference to the
//! game: everything they read or write during an update comes in through
//! `ActorContext`.

mod companion;
mod enemy;
mod player;

pub use companion::{MATT_FALL_LIMIT, Matt, POTTS_FALL_LIMIT, Potts};
pub use enemy::Enemy;
pub use player::{DASH_FAST_UNTIL, DASH_TICKS, PLAYER_FALL_LIMIT, Player};

use glam::Vec2;
use rand_pcg::Pcg32;

use super::animation::{Animation, AnimationLibrary};
use super::collision::{PhysicsBody, resolve_movement};
use super::effects::Effects;
use super::rect::Rect;
use super::tilemap::Tilemap;

/// Sprites are larger than hitboxes; draw them shifted up and left by this
pub const ANIM_OFFSET: Vec2 = Vec2::new(-3.0, -3.0);

/// Airborne ticks after which the jump animation takes over
const JUMP_POSE_AFTER: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Enemy,
    Matt,
    Potts,
}

impl ActorKind {
    /// Prefix of this actor's animation keys
    pub fn as_str(self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::Enemy => "enemy",
            ActorKind::Matt => "matt",
            ActorKind::Potts => "potts",
        }
    }
}

/// What other actors may know about the player during an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub rect: Rect,
    /// Signed dash timer (see `Player::dashing`)
    pub dashing: i32,
}

/// World access for one actor update
pub struct ActorContext<'a> {
    pub tilemap: &'a Tilemap,
    pub animations: &'a AnimationLibrary,
    pub effects: &'a mut Effects,
    pub rng: &'a mut Pcg32,
    pub player: PlayerSnapshot,
}

/// State shared by every actor: body, current action and its animation
#[derive(Debug, Clone)]
pub struct ActorCore {
    pub body: PhysicsBody,
    kind: ActorKind,
    action: &'static str,
    animation: Animation,
}

impl ActorCore {
    pub fn new(kind: ActorKind, pos: Vec2, size: Vec2, animations: &AnimationLibrary) -> Self {
        let action = "idle";
        Self {
            body: PhysicsBody::new(pos, size),
            kind,
            action,
            animation: animations.start(&animation_key(kind, action)),
        }
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Switch action; the animation restarts only when the action changes
    pub fn set_action(&mut self, action: &'static str, animations: &AnimationLibrary) {
        if action != self.action {
            self.action = action;
            self.animation = animations.start(&animation_key(self.kind, action));
        }
    }

    /// Physics followed by one animation tick
    pub fn step(&mut self, tilemap: &Tilemap, movement: Vec2) {
        resolve_movement(&mut self.body, tilemap, movement);
        self.animation.update();
    }
}

fn animation_key(kind: ActorKind, action: &str) -> String {
    format!("{}/{}", kind.as_str(), action)
}

/// Air time and jump budget of the characters that can fall to their death
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirTime {
    pub ticks: u32,
    pub jumps: u32,
    limit: u32,
}

impl AirTime {
    pub fn new(limit: u32) -> Self {
        Self {
            ticks: 0,
            jumps: 1,
            limit,
        }
    }

    /// Count one tick after physics: falling too long is a death, touching
    /// the ground restores the jump
    pub fn tick(&mut self, body: &PhysicsBody, effects: &mut Effects) {
        self.ticks += 1;
        if self.ticks > self.limit {
            effects.register_death();
        }
        if body.collisions.down {
            self.ticks = 0;
            self.jumps = 1;
        }
    }

    pub fn airborne(&self) -> bool {
        self.ticks > JUMP_POSE_AFTER
    }

    /// Spend a jump for an upward kick of `vy`; false with no jump left
    pub fn jump(&mut self, body: &mut PhysicsBody, vy: f32) -> bool {
        if self.jumps == 0 {
            return false;
        }
        body.velocity.y = vy;
        self.jumps -= 1;
        self.ticks = JUMP_POSE_AFTER + 1;
        true
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

/// Common surface of everything that moves through the level
pub trait Actor {
    fn core(&self) -> &ActorCore;
    fn core_mut(&mut self) -> &mut ActorCore;

    /// Advance one tick with the given intent. Returns true when the actor
    /// should be removed from the level.
    fn update(&mut self, ctx: &mut ActorContext<'_>, movement: Vec2) -> bool;

    fn kind(&self) -> ActorKind {
        self.core().kind()
    }

    fn body(&self) -> &PhysicsBody {
        &self.core().body
    }

    fn body_mut(&mut self) -> &mut PhysicsBody {
        &mut self.core_mut().body
    }

    fn animation(&self) -> &Animation {
        self.core().animation()
    }

    /// Key of the animation currently playing, e.g. `"enemy/run"`
    fn animation_key(&self) -> String {
        animation_key(self.kind(), self.core().action())
    }

    fn visible(&self) -> bool {
        true
    }

    fn anim_offset(&self) -> Vec2 {
        ANIM_OFFSET
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::sim::tile::{Tile, TileKind};
    use glam::IVec2;
    use rand::SeedableRng;

    pub struct World {
        pub tilemap: Tilemap,
        pub animations: AnimationLibrary,
        pub effects: Effects,
        pub rng: Pcg32,
    }

    impl World {
        /// A stone floor along row `floor_row`, columns `from..to`
        pub fn with_floor(floor_row: i32, from: i32, to: i32) -> Self {
            let mut tilemap = Tilemap::new(16);
            for x in from..to {
                tilemap.set(IVec2::new(x, floor_row), Tile::new(TileKind::Stone, 1, IVec2::ZERO));
            }
            Self {
                tilemap,
                animations: AnimationLibrary::standard(|_| 4),
                effects: Effects::new(),
                rng: Pcg32::seed_from_u64(1),
            }
        }

        pub fn ctx(&mut self, player: PlayerSnapshot) -> ActorContext<'_> {
            ActorContext {
                tilemap: &self.tilemap,
                animations: &self.animations,
                effects: &mut self.effects,
                rng: &mut self.rng,
                player,
            }
        }
    }

    pub fn far_player() -> PlayerSnapshot {
        PlayerSnapshot {
            pos: Vec2::new(10_000.0, 10_000.0),
            rect: Rect::new(10_000.0, 10_000.0, 12.0, 29.0),
            dashing: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_air_time_death_and_landing() {
        let mut world = World::with_floor(10, 0, 4);
        let mut air = AirTime::new(3);
        let mut body = PhysicsBody::new(Vec2::ZERO, Vec2::new(12.0, 29.0));

        for _ in 0..3 {
            air.tick(&body, &mut world.effects);
        }
        assert!(!world.effects.is_dead());
        air.tick(&body, &mut world.effects);
        assert!(world.effects.is_dead());

        body.collisions.down = true;
        air.tick(&body, &mut world.effects);
        assert_eq!(air.ticks, 0);
        assert_eq!(air.jumps, 1);
    }

    #[test]
    fn test_air_time_single_jump() {
        let mut air = AirTime::new(120);
        let mut body = PhysicsBody::new(Vec2::ZERO, Vec2::ONE);
        assert!(air.jump(&mut body, -3.0));
        assert_eq!(body.velocity.y, -3.0);
        assert!(air.airborne());
        assert!(!air.jump(&mut body, -3.0));
    }

    #[test]
    fn test_set_action_restarts_only_on_change() {
        let animations = AnimationLibrary::standard(|_| 4);
        let mut core = ActorCore::new(ActorKind::Enemy, Vec2::ZERO, Vec2::new(8.0, 12.0), &animations);
        let tilemap = Tilemap::new(16);
        core.step(&tilemap, Vec2::ZERO);
        assert_eq!(core.animation().frame(), 1);

        core.set_action("idle", &animations);
        assert_eq!(core.animation().frame(), 1);
        core.set_action("run", &animations);
        assert_eq!(core.animation().frame(), 0);
        assert_eq!(core.action(), "run");
    }
}
