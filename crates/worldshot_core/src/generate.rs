//! Demo world generator
//!
//! Produces the stock starter layout: open sky, a dirt band with scattered
//! rock, lava near the bottom, bedrock floor and a single entrance door.

use crate::world::{Block, World, WORLD_WIDTH};
use rand::Rng;

const DIRT: u32 = 2;
const LAVA: u32 = 4;
const DOOR: u32 = 6;
const BEDROCK: u32 = 8;
const ROCK: u32 = 10;
const CAVE_BACKGROUND: u32 = 14;

/// First cell of the dirt band (row 37)
const DIRT_START: usize = 37 * WORLD_WIDTH;
/// First cell where rock may appear (row 38)
const ROCK_START: usize = 38 * WORLD_WIDTH;
/// Cells past this index mix lava into the dirt
const LAVA_START: usize = 5000;
/// First bedrock cell (row 54)
const BEDROCK_START: usize = 54 * WORLD_WIDTH;
/// Row directly above the dirt band, where the door stands
const DOOR_ROW_START: usize = 36 * WORLD_WIDTH;

impl World {
    /// Generate the starter layout with a random door column
    pub fn generate<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        let mut world = World::new(name);
        let door_column = rng.gen_range(2..WORLD_WIDTH - 2);

        for (index, block) in world.blocks.iter_mut().enumerate() {
            let mut generated = Block::EMPTY;

            if (ROCK_START..BEDROCK_START).contains(&index) && rng.gen_range(0..50) == 0 {
                generated.foreground = ROCK;
            } else if (DIRT_START..BEDROCK_START).contains(&index) {
                generated.foreground = if index > LAVA_START && rng.gen_range(0..8) < 3 {
                    LAVA
                } else {
                    DIRT
                };
            } else if index >= BEDROCK_START {
                generated.foreground = BEDROCK;
            }

            if index == DOOR_ROW_START + door_column {
                generated.foreground = DOOR;
            }
            if index == DIRT_START + door_column {
                generated.foreground = BEDROCK;
            }
            if index >= DIRT_START {
                generated.background = CAVE_BACKGROUND;
            }

            *block = generated;
        }

        world
    }
}
