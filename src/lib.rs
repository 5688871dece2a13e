//! Blast Grid - simulation core for a grid-based bomber game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collision routing, bomb lifecycle)
//!
//! Rendering, physics detection and audio playback are not part of this
//! crate. The embedder feeds contact notifications into [`sim::Arena`] and
//! drains explosion events, sound requests and destroy notices back out.

pub mod sim;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Side length of one grid tile in world units
    pub const TILE_SIZE: f32 = 1.0;

    /// Default bomb fuse in seconds
    pub const BOMB_FUSE: f32 = 3.0;

    /// Default mover speed in tiles per second
    pub const MOVE_SPEED: f32 = 4.0;

    /// Overlap radius for the built-in proximity probe deciding whether a
    /// bomb may turn solid again after its owner walks off it
    pub const REARM_PROBE_RADIUS: f32 = 0.5;
}

/// Center of a tile in world coordinates
#[inline]
pub fn tile_to_world(tile: (i32, i32)) -> Vec2 {
    Vec2::new(
        tile.0 as f32 * consts::TILE_SIZE,
        tile.1 as f32 * consts::TILE_SIZE,
    )
}

/// Tile containing a world position
#[inline]
pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / consts::TILE_SIZE).round() as i32,
        (pos.y / consts::TILE_SIZE).round() as i32,
    )
}
