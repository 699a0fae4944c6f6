//! Neighbor-bitmask autotiling for worldshot
//!
//! This crate picks which variant tile of a multi-tile sprite to draw for a
//! world cell, based on which neighbors hold the same item (item tiling) or
//! carry the same flag bit (overlay tiling).
//!
//! # Features
//! - 8-neighbor blob tiling with corner suppression and a 256-entry table
//! - 4-neighbor plus-shape tiling with a 16-entry table
//! - Fence, sign, vine and priority attach rules
//! - Implicit world-edge walls on the left and right grid borders
//!
//! # Example
//!
//! ```rust,ignore
//! use worldshot_autotile::{get_offset, get_flag_offset};
//! use worldshot_core::{flags, ItemCatalog, Layer, World};
//!
//! let offset = get_offset(&world, &catalog, item.id, index, item.spread(), Layer::Foreground);
//! let water = get_flag_offset(&world, index, flags::WATER);
//! ```

pub mod bitmask;
pub mod flag;
pub mod lut;
pub mod offset;

// Re-export main functions at crate root
pub use bitmask::{calculate_bitmask, calculate_cross_bitmask, neighbors, optimize_bitmask, Neighbor};
pub use flag::get_flag_offset;
pub use lut::{tile_offset, BLOB_LUT, CROSS_LUT};
pub use offset::get_offset;

// Re-export worldshot_core
pub use worldshot_core;
