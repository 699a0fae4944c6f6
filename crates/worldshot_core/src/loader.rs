//! World description loading
//!
//! World snapshots are stored as `<root>/<NAME>_.json`:
//!
//! ```json
//! {
//!   "weather": 0,
//!   "blocks": [null, {"f": 2, "b": 14, "fl": 67108864}, ...],
//!   "drop": [{"u": 1, "i": 112, "c": 10, "x": 320, "y": 640}, ...]
//! }
//! ```
//!
//! This is the only place the persistence format is touched. The grid length
//! and id clamping guaranteed here are relied on by the renderer.

use crate::item::ItemCatalog;
use crate::world::{Block, DroppedObject, World, WorldError, WORLD_CELLS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One block entry of a world description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(rename = "f", default)]
    pub foreground: Option<f64>,
    #[serde(rename = "b", default)]
    pub background: Option<f64>,
    #[serde(rename = "fl", default)]
    pub flags: Option<i64>,
}

/// One drop entry of a world description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DropRecord {
    #[serde(rename = "u", default)]
    pub uid: i64,
    #[serde(rename = "i", default)]
    pub item_id: f64,
    #[serde(rename = "c", default)]
    pub count: f64,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// Raw world description as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldDescription {
    #[serde(default)]
    pub weather: i32,
    #[serde(default)]
    pub blocks: Option<Vec<Option<BlockRecord>>>,
    #[serde(rename = "drop", default)]
    pub drops: Option<Vec<Option<DropRecord>>>,
}

impl WorldDescription {
    /// Parse a description from a JSON string
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        serde_json::from_str(json).map_err(|e| WorldError::Malformed(e.to_string()))
    }
}

impl World {
    /// Build a world from a parsed description
    ///
    /// Item ids outside the catalog range become 0, fractional ids and counts
    /// are truncated and negative counts become 0. A description shorter than
    /// the grid is padded with empty blocks.
    pub fn from_description(
        name: impl Into<String>,
        description: WorldDescription,
        catalog: &ItemCatalog,
    ) -> Result<Self, WorldError> {
        let name = name.into();
        let records = description
            .blocks
            .ok_or_else(|| WorldError::Malformed(format!("'{name}' has no blocks")))?;
        let drops = description
            .drops
            .ok_or_else(|| WorldError::Malformed(format!("'{name}' has no drop list")))?;

        if records.len() > WORLD_CELLS {
            return Err(WorldError::Malformed(format!(
                "'{name}' has {} blocks, expected {WORLD_CELLS}",
                records.len()
            )));
        }

        let mut blocks: Vec<Block> = records
            .into_iter()
            .map(|record| match record {
                None => Block::EMPTY,
                Some(record) => Block {
                    foreground: record.foreground.map_or(0, |id| catalog.normalize_id(id as i64)),
                    background: record.background.map_or(0, |id| catalog.normalize_id(id as i64)),
                    // Flags are 32-bit masks that may arrive sign-extended
                    flags: record.flags.unwrap_or(0) as u32,
                },
            })
            .collect();
        blocks.resize(WORLD_CELLS, Block::EMPTY);

        let objects = drops
            .into_iter()
            .map(|drop| {
                let drop = drop?;
                // Ids that clamp to 0 leave the slot empty
                let item_id = catalog.normalize_id(drop.item_id as i64);
                (item_id != 0).then(|| DroppedObject {
                    uid: drop.uid,
                    item_id,
                    count: drop.count.max(0.0) as u32,
                    x: drop.x,
                    y: drop.y,
                })
            })
            .collect();

        Ok(World {
            name,
            weather: description.weather,
            blocks,
            objects,
        })
    }
}

/// Directory of world descriptions
#[derive(Debug, Clone)]
pub struct WorldStore {
    root: PathBuf,
}

impl WorldStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the description for a world name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}_.json"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Load and build a world by name
    pub fn load(&self, name: &str, catalog: &ItemCatalog) -> Result<World, WorldError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(WorldError::NotFound(name.to_string()));
        }

        let content = std::fs::read_to_string(&path)?;
        let description = WorldDescription::from_json(&content)?;
        let world = World::from_description(name, description, catalog)?;

        tracing::debug!(
            "Loaded world '{}' ({} objects) from {}",
            name,
            world.object_count(),
            path.display()
        );
        Ok(world)
    }
}
