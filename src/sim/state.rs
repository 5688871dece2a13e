//! Arena state and core simulation types
//!
//! Everything that must be persisted for snapshots/determinism lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{DestroyNotice, ExplosionEvent, Sound};
use super::grid::{TileGrid, TileKind};
use crate::consts::{BOMB_FUSE, MOVE_SPEED};
use crate::{tile_to_world, world_to_tile};

/// Game-mode context gating which collision rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Story,
    Pvp,
    Training,
}

/// Discriminator for every interactive object in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Bomb,
    Wall,
    SoftBlock,
    Spike,
    /// Active explosion effect occupying tiles while the blast plays out
    Blast,
    /// Falling-wall environment hazard
    FallingWall,
}

/// Damage-dealing capability, populated at construction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageDealer {
    pub damage: f32,
}

/// Per-entity permeability rules, mutated by power-up application and
/// consulted on every obstacle contact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkThrough {
    pub through_brick: bool,
    pub through_bomb: bool,
    pub through_wall: bool,
    /// Touching a passable bomb detonates it instead of passing through
    pub destroy_mode: bool,
}

/// Time-to-detonation for a bomb. Disabling freezes the remaining time
/// without resetting it; once expired it stays expired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
    enabled: bool,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            enabled: true,
        }
    }

    /// Decrement remaining time, only while enabled
    pub fn update(&mut self, dt: f32) {
        if self.enabled {
            self.remaining -= dt;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Placement parameters for a new bomb
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BombSpec {
    /// Entity id of the owner whose bomb slot this occupies
    pub owner: Option<u32>,
    pub skin: i32,
    pub explosion_skin: i32,
    pub damage: f32,
    /// Blast radius in grid cells
    pub explosion_length: i32,
    /// Seconds until self-detonation; negative means no countdown
    /// (remote-detonation-only bomb)
    pub fuse: f32,
    /// Blast arms continue through soft blocks instead of stopping
    pub through_brick: bool,
    /// Placed by an enemy; never re-arms against enemies
    pub is_enemy: bool,
    pub is_through_hero: bool,
}

impl Default for BombSpec {
    fn default() -> Self {
        Self {
            owner: None,
            skin: 0,
            explosion_skin: 0,
            damage: 1.0,
            explosion_length: 1,
            fuse: BOMB_FUSE,
            through_brick: false,
            is_enemy: false,
            is_through_hero: false,
        }
    }
}

/// Bomb payload on an entity of kind [`EntityKind::Bomb`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombState {
    /// Bomb number, zero-indexed per arena
    pub number: u32,
    pub owner: Option<u32>,
    pub skin: i32,
    pub explosion_skin: i32,
    pub damage: f32,
    pub explosion_length: i32,
    pub through_brick: bool,
    pub is_enemy: bool,
    pub is_through_hero: bool,
    pub countdown: Option<Countdown>,
    /// Consumed-once token: set the first time the owner is notified of
    /// the detonation, checked before every later dispatch
    pub(crate) owner_notified: bool,
    /// A freshly placed bomb is passable until its placer walks clear;
    /// the re-arm check flips this back to solid
    pub solid: bool,
}

impl BombState {
    fn from_spec(number: u32, spec: &BombSpec) -> Self {
        Self {
            number,
            owner: spec.owner,
            skin: spec.skin,
            explosion_skin: spec.explosion_skin,
            damage: spec.damage,
            explosion_length: spec.explosion_length,
            through_brick: spec.through_brick,
            is_enemy: spec.is_enemy,
            is_through_hero: spec.is_through_hero,
            countdown: (spec.fuse >= 0.0).then(|| Countdown::new(spec.fuse)),
            owner_notified: false,
            solid: false,
        }
    }
}

/// Any interactive object in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    alive: bool,
    pub immortal: bool,
    pub dealer: Option<DamageDealer>,
    pub receives_damage: bool,
    pub walk: Option<WalkThrough>,
    pub bomb: Option<BombState>,
    /// Set while standing on a bomb the entity just placed
    pub stuck_with_bomb: bool,
    /// Set once the entity has fully separated from that bomb
    pub had_out_of_bomb: bool,
    /// Bombs this entity currently has in play
    pub active_bombs: u8,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            speed: 0.0,
            alive: true,
            immortal: false,
            dealer: None,
            receives_damage: false,
            walk: None,
            bomb: None,
            stuck_with_bomb: false,
            had_out_of_bomb: false,
            active_bombs: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Alive to dead, at most once. Returns false on an already-dead
    /// entity and changes nothing.
    pub(crate) fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }

    /// Park the entity in a waiting queue without a destroy notice
    pub fn deactivate(&mut self) {
        self.alive = false;
    }

    /// Dead to alive, at most once. Returns false if already alive.
    pub fn resurrect(&mut self) -> bool {
        if self.alive {
            return false;
        }
        self.alive = true;
        true
    }

    /// Stop the movement component dead
    pub fn force_stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Through-bomb permission, absent policy meaning no permission
    pub fn through_bomb(&self) -> bool {
        self.walk.is_some_and(|w| w.through_bomb)
    }
}

/// The authoritative entity store plus the outbound queues.
///
/// Entities are kept sorted by id (ids are allocated in increasing order
/// and never reordered), so iteration order is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub mode: GameMode,
    pub grid: TileGrid,
    pub entities: Vec<Entity>,
    /// Append-only detonation queue, consumed by rendering/gameplay effects
    pub explosions: Vec<ExplosionEvent>,
    /// Fire-and-forget sound requests
    pub sounds: Vec<Sound>,
    /// Entities marked for destruction, awaiting the recycler
    pub destroyed: Vec<DestroyNotice>,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
    next_bomb_number: u32,
}

impl Arena {
    pub fn new(mode: GameMode, grid: TileGrid) -> Self {
        Self {
            mode,
            grid,
            entities: Vec::new(),
            explosions: Vec::new(),
            sounds: Vec::new(),
            destroyed: Vec::new(),
            time_ticks: 0,
            next_id: 1,
            next_bomb_number: 0,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn index_of(&self, id: u32) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    /// Spawn a non-bomb entity with the capabilities its kind carries.
    /// Bombs are placed with [`Arena::place_bomb`]; spawning
    /// [`EntityKind::Bomb`] here yields a bare record with no payload.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let mut entity = Entity::new(id, kind, pos);
        match kind {
            EntityKind::Player => {
                entity.receives_damage = true;
                entity.walk = Some(WalkThrough::default());
                entity.speed = MOVE_SPEED;
            }
            EntityKind::Enemy => {
                entity.receives_damage = true;
                entity.dealer = Some(DamageDealer { damage: 1.0 });
                entity.walk = Some(WalkThrough::default());
                entity.speed = MOVE_SPEED;
            }
            EntityKind::Spike | EntityKind::FallingWall => {
                entity.dealer = Some(DamageDealer { damage: 1.0 });
            }
            EntityKind::Blast => {
                entity.dealer = Some(DamageDealer { damage: 1.0 });
            }
            EntityKind::Wall | EntityKind::SoftBlock | EntityKind::Bomb => {}
        }
        self.entities.push(entity);
        id
    }

    /// Place a bomb on the tile under `pos`. Claims the grid cell, counts
    /// the bomb against its owner's slots and starts it passable with its
    /// fuse ticking. Returns `None` if the cell is missing or occupied.
    pub fn place_bomb(&mut self, pos: Vec2, spec: BombSpec) -> Option<u32> {
        let tile = world_to_tile(pos);
        if !self.grid.contains(tile) || self.grid.get(tile) != TileKind::Empty {
            return None;
        }
        self.grid.set(tile, TileKind::Bomb);

        let number = self.next_bomb_number;
        self.next_bomb_number += 1;

        if let Some(owner) = spec.owner {
            if let Some(entity) = self.entity_mut(owner) {
                entity.active_bombs += 1;
                entity.stuck_with_bomb = true;
                entity.had_out_of_bomb = false;
            }
        }

        let id = self.next_entity_id();
        let mut entity = Entity::new(id, EntityKind::Bomb, tile_to_world(tile));
        entity.receives_damage = true;
        entity.walk = Some(WalkThrough::default());
        entity.speed = MOVE_SPEED;
        entity.bomb = Some(BombState::from_spec(number, &spec));
        self.entities.push(entity);
        Some(id)
    }

    /// Mark an entity dead and queue the destroy notice. No-op on unknown
    /// or already-dead ids.
    pub fn kill(&mut self, id: u32, trigger: bool) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        if !entity.kill() {
            return false;
        }
        self.destroyed.push(DestroyNotice { id, trigger });
        true
    }

    /// Shove a mover (kicked bomb, knocked-back enemy) in a direction at
    /// its own speed
    pub fn force_move(&mut self, id: u32, dir: Vec2) {
        if let Some(entity) = self.entity_mut(id) {
            let speed = entity.speed;
            entity.vel = dir * speed;
        }
    }

    /// Alive bomb entity occupying a tile, if any
    pub fn bomb_at(&self, tile: (i32, i32)) -> Option<u32> {
        self.entities
            .iter()
            .find(|e| {
                e.is_alive() && e.kind == EntityKind::Bomb && world_to_tile(e.pos) == tile
            })
            .map(|e| e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_countdown_expires() {
        let mut cd = Countdown::new(3.0);
        cd.update(1.0);
        cd.update(1.0);
        assert!(!cd.is_finished());
        cd.update(1.0);
        assert!(cd.is_finished());
        // stays expired
        cd.update(1.0);
        assert!(cd.is_finished());
    }

    #[test]
    fn test_countdown_disable_freezes() {
        let mut cd = Countdown::new(2.0);
        cd.update(1.0);
        cd.set_enabled(false);
        cd.update(10.0);
        assert!(!cd.is_finished());
        assert!((cd.remaining() - 1.0).abs() < 1e-6);
        // resume where it left off
        cd.set_enabled(true);
        cd.update(1.0);
        assert!(cd.is_finished());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(5, 5));
        let id = arena.spawn(EntityKind::Enemy, Vec2::new(1.0, 1.0));

        assert!(arena.kill(id, true));
        assert!(!arena.kill(id, true));
        assert_eq!(arena.destroyed.len(), 1);
        assert!(!arena.entity(id).unwrap().is_alive());
    }

    #[test]
    fn test_resurrect_only_from_dead() {
        let mut entity = Entity::new(1, EntityKind::Player, Vec2::ZERO);
        assert!(!entity.resurrect());
        entity.deactivate();
        assert!(entity.resurrect());
        assert!(entity.is_alive());
    }

    #[test]
    fn test_deactivate_sends_no_notice() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(5, 5));
        let id = arena.spawn(EntityKind::Player, Vec2::ZERO);
        arena.entity_mut(id).unwrap().deactivate();
        assert!(arena.destroyed.is_empty());
    }

    #[test]
    fn test_place_bomb_claims_cell() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(5, 5));
        let owner = arena.spawn(EntityKind::Player, Vec2::new(2.0, 2.0));

        let spec = BombSpec {
            owner: Some(owner),
            ..Default::default()
        };
        let bomb = arena.place_bomb(Vec2::new(2.0, 2.0), spec);
        assert!(bomb.is_some());
        assert_eq!(arena.grid.get((2, 2)), TileKind::Bomb);
        assert_eq!(arena.entity(owner).unwrap().active_bombs, 1);
        assert!(arena.entity(owner).unwrap().stuck_with_bomb);

        // cell now occupied
        assert!(arena.place_bomb(Vec2::new(2.0, 2.0), spec).is_none());
    }

    #[test]
    fn test_negative_fuse_means_no_countdown() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(5, 5));
        let spec = BombSpec {
            fuse: -1.0,
            ..Default::default()
        };
        let id = arena.place_bomb(Vec2::new(1.0, 1.0), spec).unwrap();
        let entity = arena.entity(id).unwrap();
        assert!(entity.bomb.as_ref().unwrap().countdown.is_none());
    }

    #[test]
    fn test_new_bomb_starts_passable() {
        let mut arena = Arena::new(GameMode::Story, TileGrid::new(5, 5));
        let id = arena
            .place_bomb(Vec2::new(1.0, 1.0), BombSpec::default())
            .unwrap();
        assert!(!arena.entity(id).unwrap().bomb.as_ref().unwrap().solid);
    }

    proptest! {
        #[test]
        fn countdown_matches_cumulative_updates(
            duration in 0.5f32..10.0,
            deltas in prop::collection::vec(0.01f32..0.5, 1..64),
        ) {
            let mut cd = Countdown::new(duration);
            let mut total = 0.0f32;
            for d in &deltas {
                cd.update(*d);
                total += d;
            }
            if total >= duration + 1e-3 {
                prop_assert!(cd.is_finished());
            }
            if total <= duration - 1e-3 {
                prop_assert!(!cd.is_finished());
            }
        }

        #[test]
        fn countdown_never_finishes_while_disabled(
            duration in 0.5f32..10.0,
            deltas in prop::collection::vec(0.01f32..0.5, 1..64),
        ) {
            let mut cd = Countdown::new(duration);
            cd.set_enabled(false);
            for d in &deltas {
                cd.update(*d);
            }
            prop_assert!(!cd.is_finished());
        }
    }
}
