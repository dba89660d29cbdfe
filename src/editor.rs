//! Level editor session
//!
//! The editor paints on the same `Tilemap` the game plays. Mouse positions
//! arrive in window pixels and are divided by the render scale to get display
//! pixels; adding the camera scroll gives world pixels.
//!
//! Controls: wheel cycles tile groups (with shift: variants), left button
//! paints, right button erases, WASD/arrows pan, `G` toggles grid snapping,
//! `T` autotiles, `O` saves.

use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};

use crate::consts::EDITOR_PAN_SPEED;
use crate::persistence::MapError;
use crate::platform::{Event, Key, MouseButton};
use crate::renderer::{AssetError, AssetTable, Sprite, Surface, render_tilemap};
use crate::sim::camera::Camera;
use crate::sim::rect::Rect;
use crate::sim::tile::{PlacedTile, Tile, TileId, TileKind};
use crate::sim::tilemap::Tilemap;

/// Opacity of the placement preview
const GHOST_ALPHA: u8 = 100;
/// Where the selected tile is shown on screen
const SELECTION_PREVIEW: Vec2 = Vec2::new(5.0, 5.0);

/// One palette group: a tile kind and the pixel size of each variant
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub kind: TileKind,
    pub sizes: Vec<Vec2>,
}

impl PaletteEntry {
    pub fn variants(&self) -> usize {
        self.sizes.len()
    }
}

/// Held pan keys
#[derive(Debug, Clone, Copy, Default)]
struct Pan {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl Pan {
    fn direction(&self) -> Vec2 {
        Vec2::new(
            self.right as i32 as f32 - self.left as i32 as f32,
            self.down as i32 as f32 - self.up as i32 as f32,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    pub tilemap: Tilemap,
    map_path: PathBuf,
    palette: Vec<PaletteEntry>,
    tile_group: usize,
    tile_variant: usize,
    clicking: bool,
    right_clicking: bool,
    shift: bool,
    ongrid: bool,
    pan: Pan,
    pub camera: Camera,
    /// Mouse position in display pixels
    mouse: Vec2,
    render_scale: f32,
    quit: bool,
}

impl Editor {
    /// Start editing `tilemap`, saving to `map_path`
    pub fn new(
        tilemap: Tilemap,
        map_path: impl Into<PathBuf>,
        palette: Vec<PaletteEntry>,
        render_scale: f32,
    ) -> Result<Self, AssetError> {
        if palette.iter().all(|entry| entry.variants() == 0) {
            return Err(AssetError::Missing {
                what: "editor palette".to_string(),
            });
        }
        Ok(Self {
            tilemap,
            map_path: map_path.into(),
            palette: palette.into_iter().filter(|entry| entry.variants() > 0).collect(),
            tile_group: 0,
            tile_variant: 0,
            clicking: false,
            right_clicking: false,
            shift: false,
            ongrid: true,
            pan: Pan::default(),
            camera: Camera::default(),
            mouse: Vec2::ZERO,
            render_scale: if render_scale > 0.0 { render_scale } else { 1.0 },
            quit: false,
        })
    }

    /// Build the palette from every tile kind that has images
    pub fn with_assets<I: Sprite>(
        tilemap: Tilemap,
        map_path: impl Into<PathBuf>,
        assets: &AssetTable<I>,
        render_scale: f32,
    ) -> Result<Self, AssetError> {
        let palette = assets
            .palette()
            .into_iter()
            .map(|kind| PaletteEntry {
                kind,
                sizes: (0..assets.variant_count(kind))
                    .filter_map(|variant| assets.tile(kind, variant).map(Sprite::size))
                    .collect(),
            })
            .collect();
        Self::new(tilemap, map_path, palette, render_scale)
    }

    pub fn map_path(&self) -> &Path {
        &self.map_path
    }

    /// Currently selected (kind, variant)
    pub fn selected(&self) -> TileId {
        (self.palette[self.tile_group].kind, self.tile_variant)
    }

    pub fn ongrid(&self) -> bool {
        self.ongrid
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Mouse position in world pixels
    pub fn world_mouse(&self) -> Vec2 {
        self.mouse + self.camera.scroll
    }

    /// Grid cell under the mouse
    pub fn hovered_cell(&self) -> IVec2 {
        (self.world_mouse() / self.tilemap.tile_size() as f32)
            .floor()
            .as_ivec2()
    }

    /// React to one input event; only saving can fail
    pub fn handle_event(&mut self, event: Event) -> Result<(), MapError> {
        match event {
            Event::Quit | Event::KeyDown(Key::Escape) => self.quit = true,
            Event::MouseMotion(pos) => self.mouse = pos / self.render_scale,
            Event::MouseDown(button) => self.mouse_down(button),
            Event::MouseUp(MouseButton::Left) => self.clicking = false,
            Event::MouseUp(MouseButton::Right) => self.right_clicking = false,
            Event::MouseUp(_) => {}
            Event::KeyDown(key) => return self.key(key, true),
            Event::KeyUp(key) => return self.key(key, false),
        }
        Ok(())
    }

    fn mouse_down(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => {
                self.clicking = true;
                if !self.ongrid {
                    let (kind, variant) = self.selected();
                    self.tilemap
                        .push_offgrid(PlacedTile::new(kind, variant, self.world_mouse()));
                }
            }
            MouseButton::Right => self.right_clicking = true,
            MouseButton::WheelUp => self.cycle(-1),
            MouseButton::WheelDown => self.cycle(1),
            MouseButton::Middle => {}
        }
    }

    /// Step the group (or with shift held, the variant) with wraparound
    fn cycle(&mut self, step: i32) {
        if self.shift {
            let count = self.palette[self.tile_group].variants() as i32;
            self.tile_variant = (self.tile_variant as i32 + step).rem_euclid(count) as usize;
        } else {
            let count = self.palette.len() as i32;
            self.tile_group = (self.tile_group as i32 + step).rem_euclid(count) as usize;
            self.tile_variant = 0;
        }
    }

    fn key(&mut self, key: Key, down: bool) -> Result<(), MapError> {
        match key {
            Key::Left | Key::A => self.pan.left = down,
            Key::Right | Key::D => self.pan.right = down,
            Key::Up | Key::W => self.pan.up = down,
            Key::Down | Key::S => self.pan.down = down,
            Key::LeftShift => self.shift = down,
            Key::G if down => {
                self.ongrid = !self.ongrid;
                log::debug!("Grid snapping {}", if self.ongrid { "on" } else { "off" });
            }
            Key::T if down => {
                self.tilemap.autotile();
            }
            Key::O if down => self.save()?,
            _ => {}
        }
        Ok(())
    }

    /// Per-frame work: pan, then paint or erase while a button is held
    pub fn update(&mut self) {
        self.camera.pan(self.pan.direction(), EDITOR_PAN_SPEED);

        let cell = self.hovered_cell();
        if self.clicking && self.ongrid {
            let (kind, variant) = self.selected();
            self.tilemap.set(cell, Tile::new(kind, variant, cell));
        }
        if self.right_clicking {
            self.erase_at(cell);
        }
    }

    /// Remove the grid tile in `cell` and every off-grid tile under the mouse
    fn erase_at(&mut self, cell: IVec2) {
        self.tilemap.remove(cell);
        let mouse = self.world_mouse();
        let palette = &self.palette;
        self.tilemap.remove_offgrid_where(|tile| {
            image_size(palette, tile.kind, tile.variant)
                .is_some_and(|size| Rect::from_pos_size(tile.position(), size).contains_point(mouse))
        });
    }

    pub fn autotile(&mut self) -> usize {
        self.tilemap.autotile()
    }

    pub fn save(&self) -> Result<(), MapError> {
        self.tilemap.save(&self.map_path)
    }

    /// Draw the map, the placement preview and the selected tile
    pub fn render<S: Surface>(&self, surface: &mut S, assets: &AssetTable<S::Image>) {
        render_tilemap(surface, assets, &self.tilemap, self.camera.render_offset());

        let (kind, variant) = self.selected();
        let Some(image) = assets.tile(kind, variant) else {
            return;
        };
        let ghost = if self.ongrid {
            (self.hovered_cell() * self.tilemap.tile_size()).as_vec2() - self.camera.scroll
        } else {
            self.mouse
        };
        surface.blit_translucent(image, ghost, GHOST_ALPHA);
        surface.blit(image, SELECTION_PREVIEW, false);
    }
}

fn image_size(palette: &[PaletteEntry], kind: TileKind, variant: usize) -> Option<Vec2> {
    palette
        .iter()
        .find(|entry| entry.kind == kind)
        .and_then(|entry| entry.sizes.get(variant).copied())
}
