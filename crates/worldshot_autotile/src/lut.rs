//! Bitmask to tile index lookup tables
//!
//! The tables are art-alignment data: each entry names the sheet tile whose
//! drawing matches that neighbor configuration. Tile index `t` lives at
//! column `t % 8`, row `t / 8` of an item's sprite block.

/// 8-neighbor blob table, indexed by a corner-suppressed mask
/// (bits: NW, N, NE, W, E, SW, S, SE from least significant).
#[rustfmt::skip]
pub const BLOB_LUT: [u8; 256] = [
    12,  0, 11,  0,  0,  0,  0,  0, 30,  0, 44,  8,  0,  0,  0,  0,
    29,  0, 43,  0,  0,  0,  7,  0, 28,  0, 42, 41,  0,  0, 40,  2,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    10,  0,  9,  0,  0,  0,  0,  0, 46,  0, 36, 35,  0,  0,  0,  0,
    45,  0, 33,  0,  0,  0, 32,  0, 39,  0, 27, 23,  0,  0, 24, 18,
     0,  0,  0,  0,  0,  0,  0,  0,  6,  0, 34,  4,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0, 38,  0, 25, 20,  0,  0, 21, 16,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     5,  0, 31,  0,  0,  0,  3,  0, 37,  0, 26, 22,  0,  0, 19, 15,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  1,  0, 17, 14,  0,  0, 13,  0,
];

/// 4-neighbor plus-shape table (bits: N, W, E, S from least significant)
pub const CROSS_LUT: [u8; 16] = [12, 11, 15, 8, 14, 7, 13, 2, 10, 9, 6, 4, 5, 3, 1, 0];

/// Sheet offset of a tile index within an 8-column block
pub fn tile_offset(tile: u8) -> (u32, u32) {
    (u32::from(tile % 8), u32::from(tile / 8))
}
