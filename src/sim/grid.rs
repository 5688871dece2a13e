//! Tile grid and blast sweep
//!
//! The arena's map: a row-major grid of tile kinds with world/tile
//! mapping, plus the four-direction blast sweep that turns a detonation
//! into per-direction ranges, broken bricks and chained bombs.

use serde::{Deserialize, Serialize};

use super::events::{BlastRanges, Direction};
use super::state::{Arena, EntityKind};
use crate::world_to_tile;

/// What occupies a map cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,
    SoftBlock,
    Bomb,
}

/// Row-major tile map. Cells outside the grid read as walls, so blast
/// arms and movement checks need no separate bounds handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Grid of empty cells
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileKind::Empty; (width * height).max(0) as usize],
        }
    }

    /// Grid with a solid wall perimeter
    pub fn bordered(width: i32, height: i32) -> Self {
        let mut grid = Self::new(width, height);
        for x in 0..width {
            grid.set((x, 0), TileKind::Wall);
            grid.set((x, height - 1), TileKind::Wall);
        }
        for y in 0..height {
            grid.set((0, y), TileKind::Wall);
            grid.set((width - 1, y), TileKind::Wall);
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, tile: (i32, i32)) -> bool {
        tile.0 >= 0 && tile.0 < self.width && tile.1 >= 0 && tile.1 < self.height
    }

    pub fn get(&self, tile: (i32, i32)) -> TileKind {
        if !self.contains(tile) {
            return TileKind::Wall;
        }
        self.tiles[(tile.1 * self.width + tile.0) as usize]
    }

    pub fn set(&mut self, tile: (i32, i32), kind: TileKind) {
        if self.contains(tile) {
            self.tiles[(tile.1 * self.width + tile.0) as usize] = kind;
        }
    }
}

/// Outcome of sweeping a detonation across the map
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    pub ranges: BlastRanges,
    /// Soft blocks the blast broke, in arm order
    pub broken: Vec<(i32, i32)>,
    /// Tiles holding bombs caught in the blast
    pub chained: Vec<(i32, i32)>,
}

/// Walk the four blast arms out from `origin`. Empty cells extend the
/// arm, soft blocks break and end it (unless the blast goes through
/// bricks), walls end it short, and bombs in the path are recorded for
/// chaining without stopping the arm.
pub fn sweep(grid: &TileGrid, origin: (i32, i32), length: i32, through_brick: bool) -> SweepResult {
    let mut result = SweepResult::default();
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        let mut reach = 0;
        for dist in 1..=length {
            let tile = (origin.0 + dx * dist, origin.1 + dy * dist);
            match grid.get(tile) {
                TileKind::Wall => break,
                TileKind::Empty => reach = dist,
                TileKind::SoftBlock => {
                    result.broken.push(tile);
                    reach = dist;
                    if !through_brick {
                        break;
                    }
                }
                TileKind::Bomb => {
                    result.chained.push(tile);
                    reach = dist;
                }
            }
        }
        result.ranges.set(dir, reach);
    }
    result
}

impl Arena {
    /// Detonate a bomb and cascade through every bomb its blast reaches.
    /// Each bomb gets its own sweep and a force-explode carrying the
    /// resulting shape; broken bricks leave the map (and their entities
    /// die) before later sweeps run, so arms extend through fresh gaps.
    /// Only the initiating detonation shakes the camera.
    pub fn detonate_with_sweep(&mut self, id: u32) {
        let mut queue = vec![(id, true)];
        let mut processed: Vec<u32> = Vec::new();

        while let Some((bomb_id, shaking)) = queue.pop() {
            if processed.contains(&bomb_id) {
                continue;
            }
            processed.push(bomb_id);

            let Some(entity) = self.entity(bomb_id) else {
                continue;
            };
            if !entity.is_alive() {
                continue;
            }
            let Some(bomb) = entity.bomb.as_ref() else {
                continue;
            };
            let origin = world_to_tile(entity.pos);
            let length = bomb.explosion_length;
            let through_brick = bomb.through_brick;

            let result = sweep(&self.grid, origin, length, through_brick);

            for tile in &result.broken {
                self.grid.set(*tile, TileKind::Empty);
                let victims: Vec<u32> = self
                    .entities
                    .iter()
                    .filter(|e| {
                        e.is_alive()
                            && e.kind == EntityKind::SoftBlock
                            && world_to_tile(e.pos) == *tile
                    })
                    .map(|e| e.id)
                    .collect();
                for victim in victims {
                    self.kill(victim, true);
                }
            }

            for tile in &result.chained {
                if let Some(other) = self.bomb_at(*tile) {
                    queue.push((other, false));
                }
            }

            self.force_explode(bomb_id, result.ranges, result.broken, shaking);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BombSpec, GameMode};
    use crate::tile_to_world;
    use glam::Vec2;

    #[test]
    fn test_bordered_grid_shape() {
        let grid = TileGrid::bordered(5, 4);
        assert_eq!(grid.get((0, 0)), TileKind::Wall);
        assert_eq!(grid.get((4, 3)), TileKind::Wall);
        assert_eq!(grid.get((2, 0)), TileKind::Wall);
        assert_eq!(grid.get((1, 1)), TileKind::Empty);
        assert_eq!(grid.get((3, 2)), TileKind::Empty);
    }

    #[test]
    fn test_outside_reads_as_wall() {
        let grid = TileGrid::new(3, 3);
        assert_eq!(grid.get((-1, 0)), TileKind::Wall);
        assert_eq!(grid.get((0, 3)), TileKind::Wall);
        assert!(!grid.contains((3, 0)));
    }

    #[test]
    fn test_sweep_open_field() {
        let grid = TileGrid::new(9, 9);
        let result = sweep(&grid, (4, 4), 3, false);
        assert_eq!(result.ranges, BlastRanges::new(3, 3, 3, 3));
        assert!(result.broken.is_empty());
        assert!(result.chained.is_empty());
    }

    #[test]
    fn test_sweep_wall_stops_arm_short() {
        let mut grid = TileGrid::new(9, 9);
        grid.set((6, 4), TileKind::Wall);
        let result = sweep(&grid, (4, 4), 3, false);
        // right arm reaches one cell, the wall tile itself is untouched
        assert_eq!(result.ranges.right, 1);
        assert_eq!(result.ranges.left, 3);
    }

    #[test]
    fn test_sweep_soft_block_breaks_and_stops() {
        let mut grid = TileGrid::new(9, 9);
        grid.set((5, 4), TileKind::SoftBlock);
        let result = sweep(&grid, (4, 4), 3, false);
        // the brick tile is in range and broken, nothing behind it is
        assert_eq!(result.ranges.right, 1);
        assert_eq!(result.broken, vec![(5, 4)]);
    }

    #[test]
    fn test_sweep_through_brick_continues() {
        let mut grid = TileGrid::new(9, 9);
        grid.set((5, 4), TileKind::SoftBlock);
        grid.set((6, 4), TileKind::SoftBlock);
        let result = sweep(&grid, (4, 4), 3, true);
        assert_eq!(result.ranges.right, 3);
        assert_eq!(result.broken, vec![(5, 4), (6, 4)]);
    }

    #[test]
    fn test_sweep_records_chained_bombs() {
        let mut grid = TileGrid::new(9, 9);
        grid.set((4, 6), TileKind::Bomb);
        let result = sweep(&grid, (4, 4), 3, false);
        assert_eq!(result.chained, vec![(4, 6)]);
        // the arm keeps going past the bomb
        assert_eq!(result.ranges.up, 3);
    }

    #[test]
    fn test_chain_detonation_explodes_each_bomb_once() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(9, 9));
        let first = arena
            .place_bomb(tile_to_world((4, 4)), BombSpec::default())
            .unwrap();
        let second = arena
            .place_bomb(
                tile_to_world((5, 4)),
                BombSpec {
                    explosion_length: 2,
                    ..Default::default()
                },
            )
            .unwrap();

        arena.detonate_with_sweep(first);

        assert_eq!(arena.explosions.len(), 2);
        assert!(!arena.entity(first).unwrap().is_alive());
        assert!(!arena.entity(second).unwrap().is_alive());
        assert_eq!(arena.grid.get((4, 4)), TileKind::Empty);
        assert_eq!(arena.grid.get((5, 4)), TileKind::Empty);

        // only the initiating blast shakes the camera
        let initiating = arena
            .explosions
            .iter()
            .find(|e| e.bomb.entity == first)
            .unwrap();
        let chained = arena
            .explosions
            .iter()
            .find(|e| e.bomb.entity == second)
            .unwrap();
        assert!(initiating.shaking);
        assert!(!chained.shaking);
    }

    #[test]
    fn test_sweep_cascade_kills_broken_soft_blocks() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(9, 9));
        arena.grid.set((5, 4), TileKind::SoftBlock);
        let block = arena.spawn(EntityKind::SoftBlock, Vec2::new(5.0, 4.0));
        let bomb = arena
            .place_bomb(tile_to_world((4, 4)), BombSpec::default())
            .unwrap();

        arena.detonate_with_sweep(bomb);

        assert!(!arena.entity(block).unwrap().is_alive());
        assert_eq!(arena.grid.get((5, 4)), TileKind::Empty);
        assert_eq!(arena.explosions[0].broken, vec![(5, 4)]);
    }
}
