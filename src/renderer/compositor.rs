//! Frame composition
//!
//! Draw order for a game frame: background, clouds, tilemap, enemies,
//! companions, player, projectiles, sparks, particles. Everything is drawn
//! relative to the camera's whole-pixel offset.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::{AssetTable, Color, Sprite, Surface};
use crate::sim::actor::Actor;
use crate::sim::state::GameState;
use crate::sim::tilemap::Tilemap;

/// Inclusive range of grid cells overlapping a viewport at `offset`
pub fn visible_cells(offset: IVec2, viewport: IVec2, tile_size: i32) -> (IVec2, IVec2) {
    let first = IVec2::new(offset.x.div_euclid(tile_size), offset.y.div_euclid(tile_size));
    let far = offset + viewport;
    let last = IVec2::new(far.x.div_euclid(tile_size), far.y.div_euclid(tile_size));
    (first, last)
}

/// Draw off-grid tiles (in storage order), then the visible grid tiles
pub fn render_tilemap<S: Surface>(
    surface: &mut S,
    assets: &AssetTable<S::Image>,
    tilemap: &Tilemap,
    offset: IVec2,
) {
    let shift = offset.as_vec2();
    for tile in tilemap.offgrid() {
        if let Some(image) = assets.tile(tile.kind, tile.variant) {
            surface.blit(image, tile.position() - shift, false);
        }
    }

    let tile_size = tilemap.tile_size();
    let (first, last) = visible_cells(offset, surface.size().as_ivec2(), tile_size);
    for x in first.x..=last.x {
        for y in first.y..=last.y {
            let Some(tile) = tilemap.get(IVec2::new(x, y)) else {
                continue;
            };
            if let Some(image) = assets.tile(tile.kind, tile.variant) {
                surface.blit(image, (tile.pos * tile_size).as_vec2() - shift, false);
            }
        }
    }
}

/// Draw an actor's current animation frame, mirrored when it faces left
pub fn render_actor<S: Surface, A: Actor + ?Sized>(
    surface: &mut S,
    assets: &AssetTable<S::Image>,
    actor: &A,
    offset: IVec2,
) {
    if !actor.visible() {
        return;
    }
    let key = actor.animation_key();
    match assets.frame(&key, actor.animation().image_index()) {
        Some(image) => {
            let body = actor.body();
            let dest = body.pos - offset.as_vec2() + actor.anim_offset();
            surface.blit(image, dest, body.flip);
        }
        None => log::trace!("No frame for {key}"),
    }
}

/// Compose one game frame onto the display surface
pub fn render_game<S: Surface>(surface: &mut S, assets: &AssetTable<S::Image>, state: &GameState) {
    let offset = state.camera.render_offset();
    let shift = offset.as_vec2();

    if let Some(background) = &assets.background {
        surface.blit(background, Vec2::ZERO, false);
    }

    let surface_size = surface.size();
    for cloud in state.clouds.iter() {
        if let Some(image) = assets.clouds.get(cloud.image) {
            let dest = cloud.render_pos(shift, surface_size, image.size());
            surface.blit(image, dest, false);
        }
    }

    render_tilemap(surface, assets, &state.tilemap, offset);

    for enemy in &state.enemies {
        render_actor(surface, assets, enemy, offset);
    }
    if let Some(matt) = &state.matt {
        render_actor(surface, assets, matt, offset);
    }
    if let Some(potts) = &state.potts {
        render_actor(surface, assets, potts, offset);
    }
    if !state.is_dead() {
        render_actor(surface, assets, &state.player, offset);
    }

    if let Some(image) = &assets.projectile {
        for shot in &state.effects.projectiles {
            surface.blit(image, shot.pos - image.size() / 2.0 - shift, false);
        }
    }

    for spark in &state.effects.sparks {
        surface.fill_polygon(&spark.polygon(shift), Color::WHITE);
    }

    for particle in &state.effects.particles {
        let key = particle.kind.animation_key();
        if let Some(image) = assets.frame(key, particle.animation.image_index()) {
            let half = Vec2::new((image.width() / 2) as f32, (image.height() / 2) as f32);
            surface.blit(image, particle.pos - shift - half, false);
        }
    }
}

/// Random presentation offset for a shake of `magnitude` pixels
pub fn screenshake_offset(rng: &mut impl Rng, magnitude: f32) -> Vec2 {
    if magnitude <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random::<f32>() * magnitude - magnitude / 2.0,
        rng.random::<f32>() * magnitude - magnitude / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::{DrawCall, RecordingSurface, TestImage};
    use crate::sim::animation::ANIMATIONS;
    use crate::sim::effects::{Projectile, Spark};
    use crate::sim::state::{GameConfig, SPAWN_ENEMY, SPAWN_PLAYER};
    use crate::sim::tile::{PlacedTile, Tile, TileKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assets() -> AssetTable<TestImage> {
        let mut table = AssetTable::new();
        for kind in TileKind::ALL {
            let images = (0..9)
                .map(|v| TestImage::new(&format!("{}{v}", kind.as_str()), 16, 16))
                .collect();
            table.insert_tiles(kind, images);
        }
        for (key, _, _) in ANIMATIONS {
            table.insert_animation(key, vec![TestImage::new(key, 14, 34)]);
        }
        table.clouds = vec![TestImage::new("cloud", 40, 20)];
        table.background = Some(TestImage::new("background", 455, 270));
        table.projectile = Some(TestImage::new("projectile", 6, 4));
        table
    }

    #[test]
    fn test_visible_cells_floor_division() {
        assert_eq!(
            visible_cells(IVec2::new(0, 0), IVec2::new(455, 270), 16),
            (IVec2::new(0, 0), IVec2::new(28, 16))
        );
        assert_eq!(
            visible_cells(IVec2::new(-1, -17), IVec2::new(32, 32), 16),
            (IVec2::new(-1, -2), IVec2::new(1, 0))
        );
    }

    #[test]
    fn test_tilemap_offgrid_first_and_culled() {
        let mut map = Tilemap::new(16);
        map.set(IVec2::new(1, 1), Tile::new(TileKind::Grass, 2, IVec2::ZERO));
        map.set(IVec2::new(100, 1), Tile::new(TileKind::Stone, 0, IVec2::ZERO));
        map.push_offgrid(PlacedTile::new(TileKind::Decor, 3, Vec2::new(5.5, 7.0)));

        let mut surface = RecordingSurface::new(64.0, 64.0);
        render_tilemap(&mut surface, &assets(), &map, IVec2::new(4, 0));

        assert_eq!(
            surface.calls,
            vec![
                DrawCall::Blit {
                    name: "decor3".to_string(),
                    dest: Vec2::new(1.5, 7.0),
                    flip: false
                },
                DrawCall::Blit {
                    name: "grass2".to_string(),
                    dest: Vec2::new(12.0, 16.0),
                    flip: false
                },
            ]
        );
    }

    #[test]
    fn test_game_frame_order() {
        let mut map = Tilemap::new(16);
        for x in 0..8 {
            map.set(IVec2::new(x, 5), Tile::new(TileKind::Grass, 1, IVec2::ZERO));
        }
        map.set(IVec2::new(1, 3), Tile::new(TileKind::Spawners, SPAWN_PLAYER, IVec2::ZERO));
        map.set(IVec2::new(5, 4), Tile::new(TileKind::Spawners, SPAWN_ENEMY, IVec2::ZERO));

        let assets = assets();
        let config = GameConfig {
            cloud_count: 1,
            ..GameConfig::default()
        };
        let mut state = GameState::new(5, assets.library(), config);
        state.load_level("01", map);
        state.effects.projectiles.push(Projectile::new(Vec2::new(30.0, 30.0), 1.5));
        state.effects.sparks.push(Spark::new(Vec2::new(40.0, 40.0), 0.0, 2.0));

        let mut surface = RecordingSurface::new(455.0, 270.0);
        render_game(&mut surface, &assets, &state);

        let names = surface.blitted();
        assert_eq!(names[0], "background");
        assert_eq!(names[1], "cloud");
        let grass = names.iter().filter(|n| **n == "grass1").count();
        assert_eq!(grass, 8);
        let tail: Vec<&str> = names[2 + grass..].to_vec();
        assert_eq!(tail, vec!["enemy/idle", "player/idle", "projectile"]);
        assert!(matches!(surface.calls.last(), Some(DrawCall::Polygon { color, .. }) if *color == Color::WHITE));
    }

    #[test]
    fn test_actor_drawn_with_anim_offset_and_hidden_while_dashing() {
        let assets = assets();
        let mut state = GameState::new(5, assets.library(), GameConfig::default());
        state.player.body_mut().pos = Vec2::new(20.0, 30.0);
        state.player.body_mut().flip = true;

        let mut surface = RecordingSurface::new(100.0, 100.0);
        render_actor(&mut surface, &assets, &state.player, IVec2::new(10, 10));
        assert_eq!(
            surface.calls,
            vec![DrawCall::Blit {
                name: "player/idle".to_string(),
                dest: Vec2::new(7.0, 17.0),
                flip: true
            }]
        );

        state.player.dash();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        render_actor(&mut surface, &assets, &state.player, IVec2::ZERO);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_screenshake_offset_bounds() {
        let mut rng = Pcg32::seed_from_u64(11);
        assert_eq!(screenshake_offset(&mut rng, 0.0), Vec2::ZERO);
        for _ in 0..100 {
            let offset = screenshake_offset(&mut rng, 16.0);
            assert!(offset.x >= -8.0 && offset.x < 8.0);
            assert!(offset.y >= -8.0 && offset.y < 8.0);
        }
    }
}
