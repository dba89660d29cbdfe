//! Image asset table
//!
//! Images are grouped by category: one ordered list per tile kind (the index
//! is the variant) and one per animation key (the index is the frame).
//! Directories are read in file-name order. Decoding is left to the caller
//! through a loader closure so the table works with any image type.
//!
//! Expected layout under the image root:
//!
//! ```text
//! tiles/<kind>/*.png            one directory per tile kind
//! entities/<actor>/<action>/    animation frames, e.g. entities/player/run
//! particles/<kind>/             particle animation frames
//! clouds/                       cloud images
//! background.png
//! projectile.png
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Sprite;
use crate::sim::animation::{ANIMATIONS, AnimationLibrary};
use crate::sim::tile::TileKind;

/// Failure to assemble the asset table
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset path {path} not found")]
    NotFound { path: PathBuf },
    #[error("failed to read asset directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("asset directory {path} contains no images")]
    Empty { path: PathBuf },
    #[error("failed to decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("missing {what} asset")]
    Missing { what: String },
}

/// All images used by the game or the editor
#[derive(Debug, Clone)]
pub struct AssetTable<I> {
    tiles: HashMap<TileKind, Vec<I>>,
    animations: HashMap<String, Vec<I>>,
    pub clouds: Vec<I>,
    pub background: Option<I>,
    pub projectile: Option<I>,
}

impl<I> Default for AssetTable<I> {
    fn default() -> Self {
        Self {
            tiles: HashMap::new(),
            animations: HashMap::new(),
            clouds: Vec::new(),
            background: None,
            projectile: None,
        }
    }
}

impl<I: Sprite> AssetTable<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tiles(&mut self, kind: TileKind, images: Vec<I>) {
        self.tiles.insert(kind, images);
    }

    pub fn insert_animation(&mut self, key: &str, frames: Vec<I>) {
        self.animations.insert(key.to_string(), frames);
    }

    /// Image for a tile variant
    pub fn tile(&self, kind: TileKind, variant: usize) -> Option<&I> {
        self.tiles.get(&kind).and_then(|images| images.get(variant))
    }

    /// Number of variants available for a tile kind
    pub fn variant_count(&self, kind: TileKind) -> usize {
        self.tiles.get(&kind).map_or(0, Vec::len)
    }

    /// Frame `index` of the animation under `key`
    pub fn frame(&self, key: &str, index: usize) -> Option<&I> {
        self.animations.get(key).and_then(|frames| frames.get(index))
    }

    /// Tile kinds that have images, in palette order
    pub fn palette(&self) -> Vec<TileKind> {
        TileKind::ALL
            .into_iter()
            .filter(|kind| self.variant_count(*kind) > 0)
            .collect()
    }

    /// Animation timings sized by the loaded frame counts
    pub fn library(&self) -> AnimationLibrary {
        AnimationLibrary::standard(|key| self.animations.get(key).map_or(0, Vec::len).max(1))
    }

    /// Check that everything the game draws is present
    pub fn validate_game(&self) -> Result<(), AssetError> {
        for kind in TileKind::ALL {
            if kind != TileKind::Spawners && self.variant_count(kind) == 0 {
                return Err(missing(format!("tiles/{}", kind.as_str())));
            }
        }
        for (key, _, _) in ANIMATIONS {
            if self.animations.get(*key).is_none_or(Vec::is_empty) {
                return Err(missing(format!("animation {key}")));
            }
        }
        if self.clouds.is_empty() {
            return Err(missing("clouds".to_string()));
        }
        if self.background.is_none() {
            return Err(missing("background".to_string()));
        }
        if self.projectile.is_none() {
            return Err(missing("projectile".to_string()));
        }
        Ok(())
    }

    /// Check that every tile kind, spawners included, has images
    pub fn validate_editor(&self) -> Result<(), AssetError> {
        match TileKind::ALL.into_iter().find(|kind| self.variant_count(*kind) == 0) {
            Some(kind) => Err(missing(format!("tiles/{}", kind.as_str()))),
            None => Ok(()),
        }
    }

    /// Load everything the game needs from `root`
    pub fn load_game(
        root: &Path,
        mut loader: impl FnMut(&Path) -> Result<I, AssetError>,
    ) -> Result<Self, AssetError> {
        let mut table = Self::new();
        for kind in TileKind::ALL {
            if kind != TileKind::Spawners {
                table.insert_tiles(kind, load_dir(&root.join("tiles").join(kind.as_str()), &mut loader)?);
            }
        }
        for (key, _, _) in ANIMATIONS {
            table.insert_animation(key, load_dir(&animation_dir(root, key), &mut loader)?);
        }
        table.clouds = load_dir(&root.join("clouds"), &mut loader)?;
        table.background = Some(load_file(&root.join("background.png"), &mut loader)?);
        table.projectile = Some(load_file(&root.join("projectile.png"), &mut loader)?);

        table.validate_game()?;
        log::info!(
            "Loaded game assets from {}: {} tile kinds, {} animations, {} clouds",
            root.display(),
            table.tiles.len(),
            table.animations.len(),
            table.clouds.len()
        );
        Ok(table)
    }

    /// Load the tile images the editor needs from `root`
    pub fn load_editor(
        root: &Path,
        mut loader: impl FnMut(&Path) -> Result<I, AssetError>,
    ) -> Result<Self, AssetError> {
        let mut table = Self::new();
        for kind in TileKind::ALL {
            table.insert_tiles(kind, load_dir(&root.join("tiles").join(kind.as_str()), &mut loader)?);
        }
        table.validate_editor()?;
        log::info!("Loaded editor assets from {}", root.display());
        Ok(table)
    }
}

fn missing(what: String) -> AssetError {
    AssetError::Missing { what }
}

/// `player/run` lives under `entities/player/run`, `particle/leaf` under
/// `particles/leaf`
fn animation_dir(root: &Path, key: &str) -> PathBuf {
    match key.strip_prefix("particle/") {
        Some(name) => root.join("particles").join(name),
        None => root.join("entities").join(key),
    }
}

fn load_file<I>(path: &Path, loader: &mut impl FnMut(&Path) -> Result<I, AssetError>) -> Result<I, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    loader(path)
}

/// Load every file in `dir`, sorted by file name
pub fn load_dir<I>(
    dir: &Path,
    loader: &mut impl FnMut(&Path) -> Result<I, AssetError>,
) -> Result<Vec<I>, AssetError> {
    let entries = fs::read_dir(dir).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            AssetError::NotFound {
                path: dir.to_path_buf(),
            }
        } else {
            AssetError::Io {
                path: dir.to_path_buf(),
                source,
            }
        }
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AssetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(AssetError::Empty {
            path: dir.to_path_buf(),
        });
    }
    paths.sort();

    log::debug!("Loading {} images from {}", paths.len(), dir.display());
    paths.iter().map(|path| loader(path)).collect()
}
