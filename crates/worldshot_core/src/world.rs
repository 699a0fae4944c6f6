//! World grid, blocks and dropped objects

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns in every world grid
pub const WORLD_WIDTH: usize = 100;
/// Number of rows in every world grid
pub const WORLD_HEIGHT: usize = 60;
/// Total number of cells (row-major, `index = row * WORLD_WIDTH + col`)
pub const WORLD_CELLS: usize = WORLD_WIDTH * WORLD_HEIGHT;

/// Bits of [`Block::flags`]
pub mod flags {
    /// Sprite is drawn horizontally mirrored
    pub const MIRRORED: u32 = 0x0020_0000;
    /// Liquid overlay present
    pub const WATER: u32 = 0x0400_0000;
    /// Fire overlay present
    pub const FIRE: u32 = 0x1000_0000;
    /// Red tint channel selector
    pub const TINT_RED: u32 = 0x2000_0000;
    /// Green tint channel selector
    pub const TINT_GREEN: u32 = 0x4000_0000;
    /// Blue tint channel selector
    pub const TINT_BLUE: u32 = 0x8000_0000;
}

/// Errors raised while building a world from an external description
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("World not found: {0}")]
    NotFound(String),
    #[error("Malformed world description: {0}")]
    Malformed(String),
    #[error("Failed to read world file: {0}")]
    Io(#[from] std::io::Error),
}

/// Which item id of a block a pass looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Foreground,
}

/// One grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Foreground item id (0 = empty)
    pub foreground: u32,
    /// Background item id (0 = empty)
    pub background: u32,
    /// Decoration and environment bits, see [`flags`]
    pub flags: u32,
}

impl Block {
    pub const EMPTY: Self = Self {
        foreground: 0,
        background: 0,
        flags: 0,
    };

    pub fn new(foreground: u32, background: u32) -> Self {
        Self {
            foreground,
            background,
            flags: 0,
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Item id on the given layer
    pub fn item(&self, layer: Layer) -> u32 {
        match layer {
            Layer::Background => self.background,
            Layer::Foreground => self.foreground,
        }
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    pub fn is_mirrored(&self) -> bool {
        self.has_flag(flags::MIRRORED)
    }
}

/// An item lying in the world at an explicit pixel position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedObject {
    pub uid: i64,
    pub item_id: u32,
    /// Stack size
    pub count: u32,
    /// Pixel position on the output surface
    pub x: f32,
    pub y: f32,
}

impl DroppedObject {
    /// Odd ids are plantable seeds
    pub fn is_seed(&self) -> bool {
        self.item_id % 2 == 1
    }
}

/// An immutable world snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    /// Selects the ambient backdrop sprite
    pub weather: i32,
    /// Exactly [`WORLD_CELLS`] blocks
    pub blocks: Vec<Block>,
    /// Aligned with `blocks`; may be shorter, missing entries mean no object
    pub objects: Vec<Option<DroppedObject>>,
}

impl World {
    /// Create an empty world
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weather: 0,
            blocks: vec![Block::EMPTY; WORLD_CELLS],
            objects: Vec::new(),
        }
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Item id at `index` on `layer`, `None` outside the grid
    pub fn item_at(&self, index: usize, layer: Layer) -> Option<u32> {
        self.block(index).map(|b| b.item(layer))
    }

    /// Dropped object recorded for a cell index
    pub fn object(&self, index: usize) -> Option<&DroppedObject> {
        self.objects.get(index).and_then(|o| o.as_ref())
    }

    /// Record a dropped object at a cell index, growing the object list as needed
    pub fn set_object(&mut self, index: usize, object: DroppedObject) {
        if self.objects.len() <= index {
            self.objects.resize(index + 1, None);
        }
        self.objects[index] = Some(object);
    }

    /// Number of materialized dropped objects
    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    /// Grid column of a cell index
    pub fn column(index: usize) -> usize {
        index % WORLD_WIDTH
    }

    /// Grid row of a cell index
    pub fn row(index: usize) -> usize {
        index / WORLD_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_empty_grid() {
        let world = World::new("START");

        assert_eq!(world.name, "START");
        assert_eq!(world.blocks.len(), 6000);
        assert!(world.blocks.iter().all(|b| *b == Block::EMPTY));
        assert_eq!(world.object_count(), 0);
    }

    #[test]
    fn test_block_layer_selection() {
        let block = Block::new(5, 14).with_flags(flags::MIRRORED);

        assert_eq!(block.item(Layer::Foreground), 5);
        assert_eq!(block.item(Layer::Background), 14);
        assert!(block.is_mirrored());
        assert!(!block.has_flag(flags::WATER));
    }

    #[test]
    fn test_sparse_objects() {
        let mut world = World::new("DROPS");
        world.set_object(
            42,
            DroppedObject {
                uid: 1,
                item_id: 112,
                count: 10,
                x: 10.0,
                y: 20.0,
            },
        );

        assert_eq!(world.objects.len(), 43);
        assert!(world.object(41).is_none());
        assert_eq!(world.object(42).map(|o| o.count), Some(10));
        // Past the end of the list is not an error
        assert!(world.object(5999).is_none());
        assert_eq!(world.object_count(), 1);
    }

    #[test]
    fn test_row_and_column() {
        assert_eq!(World::column(199), 99);
        assert_eq!(World::row(199), 1);
        assert_eq!(World::column(200), 0);
    }
}
