//! Item catalog: static per-item texture metadata

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Item ids that render their "locked" sprite variant in the foreground
pub const DEFAULT_LOCKED_ITEMS: [u32; 23] = [
    202, 204, 206, 242, 1796, 2408, 2950, 4428, 4802, 4994, 5260, 5814, 5980, 7188, 8470, 9640,
    10410, 11550, 11586, 11902, 12654, 13200, 13636,
];

/// Errors that can occur when loading or querying the item catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Item not found: {0}")]
    NotFound(u32),
    #[error("Failed to read item table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse item table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Autotiling family of an item's sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadType {
    /// Single tile, no neighbor logic
    Single,
    /// 8-directional 47-tile blob
    Blob,
    /// Horizontal 3-state (fences)
    Horizontal,
    /// 4-directional attach select (signs)
    Directional,
    /// 4-bit plus-shape autotile
    Cross,
    /// Always the base tile
    Static,
    /// Vertical pairing (vines)
    Vertical,
    /// 4-directional priority select
    Priority,
    Unknown(u8),
}

impl From<u8> for SpreadType {
    fn from(value: u8) -> Self {
        match value {
            0 | 1 => SpreadType::Single,
            2 => SpreadType::Blob,
            3 => SpreadType::Horizontal,
            4 => SpreadType::Directional,
            5 => SpreadType::Cross,
            6 => SpreadType::Static,
            7 => SpreadType::Vertical,
            9 => SpreadType::Priority,
            other => SpreadType::Unknown(other),
        }
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "m_id")]
    pub id: u32,
    /// Sprite sheet name in the atlas
    #[serde(alias = "m_texture")]
    pub texture_sheet: String,
    /// Tile column within the sheet (32 px units)
    #[serde(alias = "m_texture_x")]
    pub texture_x: u32,
    /// Tile row within the sheet (32 px units)
    #[serde(alias = "m_texture_y")]
    pub texture_y: u32,
    #[serde(alias = "m_spread_type", default)]
    pub spread_type: u8,
    #[serde(alias = "m_seed_base", default)]
    pub seed_base: u32,
    #[serde(alias = "m_seed_color", default)]
    pub seed_color: u32,
    #[serde(alias = "m_seed_overlay", default)]
    pub seed_overlay: u32,
    #[serde(alias = "m_seed_overlay_color", default)]
    pub seed_overlay_color: u32,
}

impl Item {
    pub fn new(id: u32, texture_sheet: impl Into<String>, texture_x: u32, texture_y: u32) -> Self {
        Self {
            id,
            texture_sheet: texture_sheet.into(),
            texture_x,
            texture_y,
            spread_type: 0,
            seed_base: 0,
            seed_color: 0,
            seed_overlay: 0,
            seed_overlay_color: 0,
        }
    }

    pub fn with_spread_type(mut self, spread_type: u8) -> Self {
        self.spread_type = spread_type;
        self
    }

    pub fn with_seed(mut self, base: u32, color: u32, overlay: u32, overlay_color: u32) -> Self {
        self.seed_base = base;
        self.seed_color = color;
        self.seed_overlay = overlay;
        self.seed_overlay_color = overlay_color;
        self
    }

    pub fn spread(&self) -> SpreadType {
        SpreadType::from(self.spread_type)
    }

    /// Tile coordinate of the item's pickup (dropped) form
    ///
    /// Placed and pickup forms share one sheet region; the pickup tile sits at a
    /// fixed offset that depends on the tiling family.
    pub fn default_texture(&self) -> (u32, u32) {
        match self.spread_type {
            2 | 5 => (self.texture_x + 4, self.texture_y + 1),
            3 | 7 => (self.texture_x + 3, self.texture_y),
            _ => (self.texture_x, self.texture_y),
        }
    }
}

/// On-disk item table layout
#[derive(Debug, Deserialize)]
struct ItemTable {
    #[serde(alias = "m_item_count", default)]
    item_count: Option<u32>,
    #[serde(alias = "m_items")]
    items: Vec<Item>,
    #[serde(default)]
    locks: Option<Vec<u32>>,
}

/// Read-only item lookup shared by every render
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    item_count: u32,
    items: HashMap<u32, Item>,
    locked: HashSet<u32>,
}

impl ItemCatalog {
    /// Build a catalog from items; the item count becomes `max id + 1`
    pub fn new(items: Vec<Item>) -> Self {
        let item_count = items.iter().map(|i| i.id + 1).max().unwrap_or(0);
        Self {
            item_count,
            items: items.into_iter().map(|i| (i.id, i)).collect(),
            locked: DEFAULT_LOCKED_ITEMS.iter().copied().collect(),
        }
    }

    pub fn with_item_count(mut self, item_count: u32) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_locked(mut self, locked: impl IntoIterator<Item = u32>) -> Self {
        self.locked = locked.into_iter().collect();
        self
    }

    /// Parse an item table from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let table: ItemTable = serde_json::from_str(json)?;
        let mut catalog = Self::new(table.items);
        if let Some(count) = table.item_count {
            catalog.item_count = count;
        }
        if let Some(locks) = table.locks {
            catalog.locked = locks.into_iter().collect();
        }
        Ok(catalog)
    }

    /// Load an item table from a JSON file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} items from {}",
            catalog.items.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Exclusive upper bound of valid item ids
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Number of entries actually present
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map any raw id into `[0, item_count)`; out-of-range ids become 0
    pub fn normalize_id(&self, id: i64) -> u32 {
        if id < 0 || id >= i64::from(self.item_count) {
            0
        } else {
            id as u32
        }
    }

    /// Look up an item; out-of-range ids resolve to item 0
    pub fn get_item(&self, id: u32) -> Result<&Item, CatalogError> {
        let id = self.normalize_id(i64::from(id));
        self.items.get(&id).ok_or(CatalogError::NotFound(id))
    }

    /// Tile coordinate used to draw a dropped instance of an item
    pub fn default_texture(&self, id: u32) -> Result<(u32, u32), CatalogError> {
        self.get_item(id).map(Item::default_texture)
    }

    /// Whether the item renders its locked variant
    pub fn is_locked(&self, id: u32) -> bool {
        self.locked.contains(&id)
    }
}
