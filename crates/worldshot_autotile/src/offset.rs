//! Per-cell sprite offset resolution
//!
//! Given a cell and the item drawn on it, pick which variant tile of the
//! item's sprite block to sample. Offsets are in tile units relative to the
//! item's base texture coordinate.

use crate::bitmask::{calculate_bitmask, calculate_cross_bitmask, Neighbor};
use crate::lut::{tile_offset, BLOB_LUT, CROSS_LUT};
use worldshot_core::{ItemCatalog, Layer, SpreadType, World};

/// Column of the locked variant in lockable sprite blocks
const LOCKED_COLUMN: u32 = 2;

/// West, North, East, South
const DIRECTIONAL_ORDER: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
/// East, West, North, South
const PRIORITY_ORDER: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

/// Resolve the sprite offset for `item_id` drawn at `index` on `layer`
pub fn get_offset(
    world: &World,
    catalog: &ItemCatalog,
    item_id: u32,
    index: usize,
    spread: SpreadType,
    layer: Layer,
) -> (u32, u32) {
    let cells = world.blocks.len();
    let same_item = |n: usize| world.item_at(n, layer) == Some(item_id);
    let test = |dx: i32, dy: i32| Neighbor::of(index, dx, dy, cells).matches(same_item);

    let (mut offset_x, offset_y) = match spread {
        SpreadType::Blob => tile_offset(BLOB_LUT[calculate_bitmask(index, cells, same_item) as usize]),
        SpreadType::Horizontal => (horizontal_offset(index, cells, same_item), 0),
        SpreadType::Directional => (last_match(DIRECTIONAL_ORDER, 4, test), 0),
        SpreadType::Cross => tile_offset(
            CROSS_LUT[calculate_cross_bitmask(index, cells, same_item) as usize],
        ),
        SpreadType::Vertical => {
            let mut offset_x = 3;
            if test(0, 1) {
                offset_x = 2;
            }
            if test(0, -1) {
                offset_x = 0;
            }
            (offset_x, 0)
        }
        SpreadType::Priority => (last_match(PRIORITY_ORDER, 3, test), 0),
        SpreadType::Static | SpreadType::Single | SpreadType::Unknown(_) => (0, 0),
    };

    if layer == Layer::Foreground {
        if let Some(block) = world.block(index) {
            if catalog.is_locked(block.foreground) {
                offset_x = LOCKED_COLUMN;
            }
        }
    }

    (offset_x, offset_y)
}

/// Fences: on a grid edge 1 when joined inward, else 0; elsewhere 2 joined, 3 alone
fn horizontal_offset<F>(index: usize, cells: usize, same_item: F) -> u32
where
    F: Fn(usize) -> bool,
{
    let west = Neighbor::of(index, -1, 0, cells);
    let east = Neighbor::of(index, 1, 0, cells);

    if west.is_edge() || east.is_edge() {
        let inward = if west.is_edge() { east } else { west };
        u32::from(inward.matches(&same_item))
    } else if west.matches(&same_item) || east.matches(&same_item) {
        2
    } else {
        3
    }
}

/// Position of the last matching direction in `order`, or `default`
fn last_match<F>(order: [(i32, i32); 4], default: u32, test: F) -> u32
where
    F: Fn(i32, i32) -> bool,
{
    order
        .iter()
        .enumerate()
        .filter(|(_, (dx, dy))| test(*dx, *dy))
        .map(|(i, _)| i as u32)
        .last()
        .unwrap_or(default)
}
