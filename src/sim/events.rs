//! Events emitted during simulation
//!
//! The rendering and gameplay-effect layers consume these; the core only
//! ever appends. Each queue lives on [`super::state::Arena`] and is drained
//! by the embedder once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::BombState;

/// Blast arm directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Tile-space step for this direction
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Per-direction blast reach in tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastRanges {
    pub up: i32,
    pub down: i32,
    pub left: i32,
    pub right: i32,
}

impl BlastRanges {
    pub fn new(up: i32, down: i32, left: i32, right: i32) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    pub fn get(&self, dir: Direction) -> i32 {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, dir: Direction, range: i32) {
        match dir {
            Direction::Up => self.up = range,
            Direction::Down => self.down = range,
            Direction::Left => self.left = range,
            Direction::Right => self.right = range,
        }
    }
}

/// Snapshot of the source bomb carried by an explosion event. The bomb
/// entity is dead by the time consumers see the event, so the fields they
/// need are copied out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombInfo {
    /// Entity id the bomb had while alive
    pub entity: u32,
    /// Bomb number, zero-indexed per arena
    pub number: u32,
    pub owner: Option<u32>,
    pub skin: i32,
    pub explosion_skin: i32,
    pub damage: f32,
    pub explosion_length: i32,
    pub through_brick: bool,
    pub is_enemy: bool,
}

impl BombInfo {
    pub(crate) fn capture(entity: u32, bomb: &BombState) -> Self {
        Self {
            entity,
            number: bomb.number,
            owner: bomb.owner,
            skin: bomb.skin,
            explosion_skin: bomb.explosion_skin,
            damage: bomb.damage,
            explosion_length: bomb.explosion_length,
            through_brick: bomb.through_brick,
            is_enemy: bomb.is_enemy,
        }
    }
}

/// One detonation. Pushed exactly once per bomb.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionEvent {
    /// Origin of the blast in world coordinates
    pub pos: Vec2,
    pub bomb: BombInfo,
    /// Precomputed per-direction reach; `None` when the consumer sweeps
    /// the map itself
    pub ranges: Option<BlastRanges>,
    /// Tiles already broken by the sweep that produced `ranges`
    pub broken: Vec<(i32, i32)>,
    /// Camera shake hint
    pub shaking: bool,
}

/// Fire-and-forget sound requests for the audio service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    BombExplode,
}

/// Mark-for-destruction notice for the entity recycler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyNotice {
    pub id: u32,
    /// Whether death effects should play for this entity
    pub trigger: bool,
}
