//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies
//!
//! Contact notifications flow in through [`Arena`] methods; explosion
//! events, sound requests and destroy notices flow out through append-only
//! queues drained by the embedder.

pub mod bomb;
pub mod collision;
pub mod events;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{ObstacleAction, OverlapProbe, ProximityProbe};
pub use events::{BlastRanges, BombInfo, DestroyNotice, Direction, ExplosionEvent, Sound};
pub use grid::{SweepResult, TileGrid, TileKind, sweep};
pub use state::{
    Arena, BombSpec, BombState, Countdown, DamageDealer, Entity, EntityKind, GameMode, WalkThrough,
};
