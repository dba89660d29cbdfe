//! Collision detection and response against the tile grid
//!
//! Movement is resolved one axis at a time: X is moved and clamped against
//! the solid tiles around the entity, then Y is moved and clamped against a
//! fresh set of candidates. Blocking on one axis therefore never stops motion
//! on the other, which is what lets an entity slide along floors and walls.

use glam::Vec2;

use super::rect::Rect;
use super::tilemap::Tilemap;
use crate::consts::{GRAVITY, MAX_FALL_SPEED};

/// Which sides touched a solid tile during the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    /// Touching a wall on either side
    #[inline]
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Touching a floor or ceiling
    #[inline]
    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

/// Physics state owned by every actor
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Top-left corner in pixels
    pub pos: Vec2,
    pub size: Vec2,
    /// Carried over between ticks (gravity, jumps, dashes)
    pub velocity: Vec2,
    /// Recomputed every tick
    pub collisions: Collisions,
    /// Facing left
    pub flip: bool,
    /// Intent passed to the last `resolve_movement` call
    pub last_movement: Vec2,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: Collisions::default(),
            flip: false,
            last_movement: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Bleed horizontal velocity toward zero by 0.1 per tick
    pub fn decay_horizontal(&mut self) {
        if self.velocity.x > 0.0 {
            self.velocity.x = (self.velocity.x - 0.1).max(0.0);
        } else {
            self.velocity.x = (self.velocity.x + 0.1).min(0.0);
        }
    }
}

/// Advance a body by one tick of `movement` plus its velocity.
///
/// Resets and refills `body.collisions`, updates facing from the sign of
/// `movement.x`, then applies gravity (capped at `MAX_FALL_SPEED`). Any
/// floor or ceiling contact cancels vertical velocity.
pub fn resolve_movement(body: &mut PhysicsBody, tilemap: &Tilemap, movement: Vec2) {
    body.collisions = Collisions::default();
    let frame_movement = movement + body.velocity;

    body.pos.x += frame_movement.x;
    let mut entity_rect = body.rect();
    for tile_rect in tilemap.physics_rects_around(body.pos, body.size) {
        if entity_rect.overlaps(&tile_rect) {
            if frame_movement.x > 0.0 {
                entity_rect.set_right(tile_rect.left());
                body.collisions.right = true;
            }
            if frame_movement.x < 0.0 {
                entity_rect.set_left(tile_rect.right());
                body.collisions.left = true;
            }
            body.pos.x = entity_rect.x;
        }
    }

    body.pos.y += frame_movement.y;
    let mut entity_rect = body.rect();
    for tile_rect in tilemap.physics_rects_around(body.pos, body.size) {
        if entity_rect.overlaps(&tile_rect) {
            if frame_movement.y > 0.0 {
                entity_rect.set_bottom(tile_rect.top());
                body.collisions.down = true;
            }
            if frame_movement.y < 0.0 {
                entity_rect.set_top(tile_rect.bottom());
                body.collisions.up = true;
            }
            body.pos.y = entity_rect.y;
        }
    }

    if movement.x > 0.0 {
        body.flip = false;
    }
    if movement.x < 0.0 {
        body.flip = true;
    }
    body.last_movement = movement;

    body.velocity.y = (body.velocity.y + GRAVITY).min(MAX_FALL_SPEED);
    if body.collisions.vertical() {
        body.velocity.y = 0.0;
    }

    log::trace!(
        "resolved body at ({:.2}, {:.2}) collisions={:?}",
        body.pos.x,
        body.pos.y,
        body.collisions
    );
}
