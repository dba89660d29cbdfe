//! `"x;y"` string keys for the grid section of a map file
//!
//! Used as `#[serde(with = "grid_keys")]` on an `IVec2`-keyed map. Keys are
//! written in sorted string order so saving the same map twice produces the
//! same bytes. On load every key must parse and match its tile's `pos`.

use std::collections::{BTreeMap, HashMap};

use glam::IVec2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::sim::tile::Tile;

/// Format a cell as its file key
pub fn format_key(cell: IVec2) -> String {
    format!("{};{}", cell.x, cell.y)
}

/// Parse a file key; `None` for anything but two `;`-separated integers
pub fn parse_key(key: &str) -> Option<IVec2> {
    let (x, y) = key.split_once(';')?;
    Some(IVec2::new(x.parse().ok()?, y.parse().ok()?))
}

pub fn serialize<S>(tiles: &HashMap<IVec2, Tile>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let keyed: BTreeMap<String, &Tile> = tiles
        .iter()
        .map(|(cell, tile)| (format_key(*cell), tile))
        .collect();
    keyed.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<IVec2, Tile>, D::Error>
where
    D: Deserializer<'de>,
{
    let keyed = HashMap::<String, Tile>::deserialize(deserializer)?;
    keyed
        .into_iter()
        .map(|(key, tile)| {
            let cell = parse_key(&key)
                .ok_or_else(|| D::Error::custom(format!("invalid tile key {key:?}")))?;
            if cell != tile.pos {
                return Err(D::Error::custom(format!(
                    "tile key {key:?} does not match pos [{}, {}]",
                    tile.pos.x, tile.pos.y
                )));
            }
            Ok((cell, tile))
        })
        .collect()
}
