//! Neighbor bitmask calculation
//!
//! Neighbors are addressed on the fixed-width world grid. Stepping west from
//! column 0 or east from the last column never wraps to the adjacent row: the
//! world edge counts as a matching wall. Stepping above the first row or below
//! the last row finds nothing.

use worldshot_core::WORLD_WIDTH;

/// Neighbor direction flags for the 8-bit blob mask
pub mod neighbors {
    pub const NW: u8 = 0b0000_0001; // Northwest (corner)
    pub const N: u8 = 0b0000_0010; // North
    pub const NE: u8 = 0b0000_0100; // Northeast (corner)
    pub const W: u8 = 0b0000_1000; // West
    pub const E: u8 = 0b0001_0000; // East
    pub const SW: u8 = 0b0010_0000; // Southwest (corner)
    pub const S: u8 = 0b0100_0000; // South
    pub const SE: u8 = 0b1000_0000; // Southeast (corner)
}

/// Flags for the 4-bit plus-shape mask
pub mod cross {
    pub const N: u8 = 0b0001;
    pub const W: u8 = 0b0010;
    pub const E: u8 = 0b0100;
    pub const S: u8 = 0b1000;
}

/// (dx, dy) of each blob mask bit, least significant first
pub const BLOB_DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// (dx, dy) of each plus-shape mask bit, least significant first
pub const CROSS_DIRECTIONS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// What lies in a direction from a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    /// An in-grid cell index
    Cell(usize),
    /// West of column 0 or east of the last column
    Edge,
    /// Above the first row or below the last row
    Outside,
}

impl Neighbor {
    /// Resolve a neighbor of `index` in a grid of `cells` cells
    pub fn of(index: usize, dx: i32, dy: i32, cells: usize) -> Self {
        let column = index % WORLD_WIDTH;
        if (dx < 0 && column == 0) || (dx > 0 && column == WORLD_WIDTH - 1) {
            return Neighbor::Edge;
        }

        let target = index as i64 + i64::from(dy) * WORLD_WIDTH as i64 + i64::from(dx);
        if target < 0 || target >= cells as i64 {
            Neighbor::Outside
        } else {
            Neighbor::Cell(target as usize)
        }
    }

    /// Edges always match, outside never does
    pub fn matches<F>(self, is_match: F) -> bool
    where
        F: Fn(usize) -> bool,
    {
        match self {
            Neighbor::Cell(index) => is_match(index),
            Neighbor::Edge => true,
            Neighbor::Outside => false,
        }
    }

    pub fn is_edge(self) -> bool {
        self == Neighbor::Edge
    }
}

/// Clear every diagonal bit whose two adjacent orthogonal bits are not both set
pub fn optimize_bitmask(bitmask: u8) -> u8 {
    use neighbors::*;

    let mut result = bitmask;

    // NW corner requires N and W
    if (bitmask & (N | W)) != (N | W) {
        result &= !NW;
    }
    // NE corner requires N and E
    if (bitmask & (N | E)) != (N | E) {
        result &= !NE;
    }
    // SW corner requires S and W
    if (bitmask & (S | W)) != (S | W) {
        result &= !SW;
    }
    // SE corner requires S and E
    if (bitmask & (S | E)) != (S | E) {
        result &= !SE;
    }

    result
}

/// Corner-suppressed 8-neighbor mask of a cell
pub fn calculate_bitmask<F>(index: usize, cells: usize, is_match: F) -> u8
where
    F: Fn(usize) -> bool,
{
    let mut bitmask = 0u8;

    for (bit, (dx, dy)) in BLOB_DIRECTIONS.iter().enumerate() {
        if Neighbor::of(index, *dx, *dy, cells).matches(&is_match) {
            bitmask |= 1 << bit;
        }
    }

    optimize_bitmask(bitmask)
}

/// 4-neighbor plus-shape mask of a cell
pub fn calculate_cross_bitmask<F>(index: usize, cells: usize, is_match: F) -> u8
where
    F: Fn(usize) -> bool,
{
    let mut bitmask = 0u8;

    for (bit, (dx, dy)) in CROSS_DIRECTIONS.iter().enumerate() {
        if Neighbor::of(index, *dx, *dy, cells).matches(&is_match) {
            bitmask |= 1 << bit;
        }
    }

    bitmask
}

#[cfg(test)]
mod tests {
    use super::neighbors::*;
    use super::*;
    use worldshot_core::WORLD_CELLS;

    #[test]
    fn test_corner_suppression_all_masks() {
        let corners = [(NW, N, W), (NE, N, E), (SW, S, W), (SE, S, E)];

        for mask in 0..=255u8 {
            let optimized = optimize_bitmask(mask);
            // Orthogonal bits are never touched
            assert_eq!(optimized & (N | W | E | S), mask & (N | W | E | S));

            for (corner, a, b) in corners {
                let supported = mask & a != 0 && mask & b != 0;
                assert_eq!(
                    optimized & corner != 0,
                    supported && mask & corner != 0,
                    "mask {mask:#010b}"
                );
            }
            // Suppression is stable
            assert_eq!(optimize_bitmask(optimized), optimized);
        }
    }

    #[test]
    fn test_neighbor_does_not_wrap_rows() {
        // Column 0 of row 1
        assert_eq!(Neighbor::of(100, -1, 0, WORLD_CELLS), Neighbor::Edge);
        assert_eq!(Neighbor::of(100, -1, -1, WORLD_CELLS), Neighbor::Edge);
        assert_eq!(Neighbor::of(100, -1, 1, WORLD_CELLS), Neighbor::Edge);
        assert_eq!(Neighbor::of(100, 1, 0, WORLD_CELLS), Neighbor::Cell(101));
        // Column 99 of row 1
        assert_eq!(Neighbor::of(199, 1, 0, WORLD_CELLS), Neighbor::Edge);
        assert_eq!(Neighbor::of(199, 1, 1, WORLD_CELLS), Neighbor::Edge);
        assert_eq!(Neighbor::of(199, 0, 1, WORLD_CELLS), Neighbor::Cell(299));
    }

    #[test]
    fn test_neighbor_outside_rows() {
        assert_eq!(Neighbor::of(5, 0, -1, WORLD_CELLS), Neighbor::Outside);
        assert_eq!(Neighbor::of(5950, 0, 1, WORLD_CELLS), Neighbor::Outside);
        assert_eq!(Neighbor::of(5950, 1, 1, WORLD_CELLS), Neighbor::Outside);
    }

    #[test]
    fn test_edge_bits_forced_on() {
        let never = |_: usize| false;

        // Middle row, column 0: W forced, NW/SW suppressed without N/S
        assert_eq!(calculate_bitmask(3000, WORLD_CELLS, never), W);
        // With N and S present the west corners survive
        let vertical = |i: usize| i == 2900 || i == 3100;
        assert_eq!(
            calculate_bitmask(3000, WORLD_CELLS, vertical),
            NW | N | W | SW | S
        );
        // Column 99 mirrors it on the east side
        let vertical = |i: usize| i == 2999 || i == 3199;
        assert_eq!(
            calculate_bitmask(3099, WORLD_CELLS, vertical),
            N | NE | E | S | SE
        );
    }

    #[test]
    fn test_cross_bitmask() {
        let all = |_: usize| true;
        assert_eq!(calculate_cross_bitmask(3050, WORLD_CELLS, all), 0b1111);

        let never = |_: usize| false;
        assert_eq!(calculate_cross_bitmask(3000, WORLD_CELLS, never), cross::W);
        assert_eq!(calculate_cross_bitmask(3099, WORLD_CELLS, never), cross::E);
        // Top row has no northern neighbor even when everything matches
        assert_eq!(
            calculate_cross_bitmask(50, WORLD_CELLS, all),
            cross::W | cross::E | cross::S
        );
    }
}
