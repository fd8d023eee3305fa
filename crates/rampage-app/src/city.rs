//! Demo street layout for the headless host: a grid of box buildings with
//! an open plaza at the origin where the player starts.

use glam::Vec2;

use rampage_sim::collaborators::Building;

/// Blocks per side of the grid.
pub const BLOCKS_PER_SIDE: i32 = 6;
pub const BLOCK_SIZE: f32 = 14.0;
pub const STREET_WIDTH: f32 = 8.0;

/// Buildings on a square grid centred on the origin. The centre block is
/// left empty.
pub fn block_grid(blocks_per_side: i32, block_size: f32, street_width: f32) -> Vec<Building> {
    let pitch = block_size + street_width;
    let half = (blocks_per_side - 1) as f32 * 0.5;

    let mut buildings = Vec::new();
    for row in 0..blocks_per_side {
        for col in 0..blocks_per_side {
            let center = Vec2::new(col as f32 - half, row as f32 - half) * pitch;
            if center.length() < pitch * 0.75 {
                continue;
            }
            let extent = Vec2::splat(block_size * 0.5);
            // Taller towers toward the middle of town.
            let height = 6.0 + 18.0 / (1.0 + center.length() / pitch);
            buildings.push(Building {
                min: center - extent,
                max: center + extent,
                height,
            });
        }
    }
    buildings
}

/// The default town used by `rampage-headless`.
pub fn demo_city() -> Vec<Building> {
    block_grid(BLOCKS_PER_SIDE, BLOCK_SIZE, STREET_WIDTH)
}
