//! Core data structures for worldshot
//!
//! This crate provides the fundamental types for describing a world snapshot:
//! - `World` - A fixed 100x60 grid of blocks plus dropped objects
//! - `Block` - Foreground/background item ids and decoration flags for one cell
//! - `DroppedObject` - An item lying at an explicit pixel position
//! - `ItemCatalog` - Static per-item texture metadata
//! - `WorldStore` - Loader for world descriptions on disk

mod generate;
mod item;
mod loader;
mod world;

pub use item::{CatalogError, Item, ItemCatalog, SpreadType, DEFAULT_LOCKED_ITEMS};
pub use loader::{BlockRecord, DropRecord, WorldDescription, WorldStore};
pub use world::{
    flags, Block, DroppedObject, Layer, World, WorldError, WORLD_CELLS, WORLD_HEIGHT, WORLD_WIDTH,
};
