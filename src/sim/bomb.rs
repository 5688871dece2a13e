//! Bomb lifecycle operations
//!
//! A bomb moves through Armed (ticking or static) -> Exploding -> Dead.
//! Exploding is entered from countdown expiry, from taking blast or
//! falling-wall damage, from a direct detonation request, or from a
//! force-explode carrying a precomputed blast shape. Every path funnels
//! through the same exit: one sound request, one explosion event, one
//! owner notification, then the kill. The alive flag absorbs re-entrant
//! explode calls; the owner-notify token is consumed exactly once.

use super::collision::OverlapProbe;
use super::events::{BlastRanges, BombInfo, ExplosionEvent, Sound};
use super::state::{Arena, EntityKind};
use crate::sim::grid::TileKind;
use crate::world_to_tile;
use glam::Vec2;

impl Arena {
    /// Detonate a bomb at its own position, leaving the blast shape to
    /// the event consumer. No-op on dead or non-bomb entities.
    pub fn start_explode(&mut self, id: u32) {
        self.explode(id, None, Vec::new(), None);
    }

    /// Detonate with a blast shape already computed by an external sweep
    /// (chain explosions). The event carries the ranges, the broken-tile
    /// list and the shake flag unchanged.
    pub fn force_explode(
        &mut self,
        id: u32,
        ranges: BlastRanges,
        broken: Vec<(i32, i32)>,
        shaking: bool,
    ) {
        self.explode(id, Some(ranges), broken, Some(shaking));
    }

    fn explode(
        &mut self,
        id: u32,
        ranges: Option<BlastRanges>,
        broken: Vec<(i32, i32)>,
        shaking: Option<bool>,
    ) {
        let Some(i) = self.index_of(id) else {
            return;
        };
        let entity = &self.entities[i];
        if !entity.is_alive() {
            return;
        }
        let Some(bomb) = entity.bomb.as_ref() else {
            return;
        };
        let pos = entity.pos;
        let info = BombInfo::capture(entity.id, bomb);
        // hero bombs shake the camera; the force path decides for itself
        let shaking = shaking.unwrap_or(!bomb.is_enemy);

        self.sounds.push(Sound::BombExplode);
        self.explosions.push(ExplosionEvent {
            pos,
            bomb: info,
            ranges,
            broken,
            shaking,
        });
        self.clear_bomb_cell(pos);
        self.finish_explode(i);
        self.kill(id, true);
    }

    /// Remove a bomb without detonating it: clear its map cell, free the
    /// owner's slot, no event and no sound.
    pub fn defuse(&mut self, id: u32) {
        let Some(i) = self.index_of(id) else {
            return;
        };
        if !self.entities[i].is_alive() || self.entities[i].bomb.is_none() {
            return;
        }
        let pos = self.entities[i].pos;
        self.clear_bomb_cell(pos);
        self.finish_explode(i);
        self.kill(id, false);
    }

    /// Route incoming damage. Bombs answer blast and falling-wall damage
    /// by exploding; everything else dies unless immortal. Dead targets
    /// and targets without the receiver capability shrug it off.
    pub fn take_damage(&mut self, target: u32, dealer: u32) {
        let Some(dealer_kind) = self.entity(dealer).map(|e| e.kind) else {
            return;
        };
        let Some(entity) = self.entity(target) else {
            return;
        };
        if !entity.is_alive() || !entity.receives_damage {
            return;
        }
        let kind = entity.kind;
        let immortal = entity.immortal;

        match kind {
            EntityKind::Bomb => {
                if matches!(dealer_kind, EntityKind::Blast | EntityKind::FallingWall) {
                    self.start_explode(target);
                }
            }
            _ => {
                if !immortal {
                    self.kill(target, true);
                }
            }
        }
    }

    /// Turn the bomb solid again, but only while nothing else overlaps
    /// its cell
    pub fn rearm_check(&mut self, bomb_id: u32, probe: &dyn OverlapProbe) {
        let Some(entity) = self.entity(bomb_id) else {
            return;
        };
        if !entity.is_alive() || entity.bomb.is_none() {
            return;
        }
        let pos = entity.pos;
        if probe.overlaps_other(pos, bomb_id) {
            return;
        }
        if let Some(entity) = self.entity_mut(bomb_id) {
            if let Some(bomb) = entity.bomb.as_mut() {
                bomb.solid = true;
            }
        }
    }

    /// Freeze or resume a bomb's fuse without resetting it
    pub fn set_countdown_enabled(&mut self, id: u32, enabled: bool) {
        if let Some(entity) = self.entity_mut(id) {
            if let Some(bomb) = entity.bomb.as_mut() {
                if let Some(countdown) = bomb.countdown.as_mut() {
                    countdown.set_enabled(enabled);
                }
            }
        }
    }

    /// Notify the owner and drop the countdown, exactly once per bomb
    fn finish_explode(&mut self, i: usize) {
        let owner = {
            let Some(bomb) = self.entities[i].bomb.as_mut() else {
                return;
            };
            if bomb.owner_notified {
                return;
            }
            bomb.owner_notified = true;
            bomb.countdown = None;
            bomb.owner
        };
        if let Some(owner_id) = owner {
            if let Some(entity) = self.entity_mut(owner_id) {
                entity.active_bombs = entity.active_bombs.saturating_sub(1);
            }
        }
    }

    fn clear_bomb_cell(&mut self, pos: Vec2) {
        let tile = world_to_tile(pos);
        if self.grid.get(tile) == TileKind::Bomb {
            self.grid.set(tile, TileKind::Empty);
        }
    }
}
