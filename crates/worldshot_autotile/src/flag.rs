//! Overlay autotiling keyed on block flags
//!
//! Liquid and fire overlays use the blob table too, but a neighbor matches
//! when it carries the same flag bit regardless of which item it holds.

use crate::bitmask::calculate_bitmask;
use crate::lut::{tile_offset, BLOB_LUT};
use worldshot_core::World;

/// Resolve the overlay sprite offset for `flag` at `index`
pub fn get_flag_offset(world: &World, index: usize, flag: u32) -> (u32, u32) {
    let has_flag = |n: usize| world.block(n).is_some_and(|b| b.has_flag(flag));
    let bitmask = calculate_bitmask(index, world.blocks.len(), has_flag);
    tile_offset(BLOB_LUT[bitmask as usize])
}
