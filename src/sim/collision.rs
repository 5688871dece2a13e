//! Contact routing and obstacle resolution
//!
//! The external physics source reports contact begin/end pairs and raw
//! "mover ran into obstacle" hits; this module decides what they mean.
//! Damage only resolves in story mode, bomb separation re-arms bomb
//! solidity in story and pvp, and obstacle resolution is a total function
//! over (permissions, mover kind, obstacle kind) with Stop as the default.

use glam::Vec2;

use super::state::{Arena, EntityKind, GameMode, WalkThrough};
use crate::consts::REARM_PROBE_RADIUS;

/// What an obstacle contact does to the mover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleAction {
    /// Keep moving, the obstacle is permeable for this entity
    Pass,
    /// Halt the mover's movement component
    Stop,
    /// Pass, and start the obstacle bomb's explosion sequence
    Detonate,
}

impl WalkThrough {
    /// Resolve a mover-vs-obstacle contact. Total over every
    /// (permission set, mover kind, obstacle kind) combination; anything
    /// not explicitly allowed through falls back to [`ObstacleAction::Stop`].
    pub fn resolve(&self, mover: EntityKind, obstacle: EntityKind) -> ObstacleAction {
        // Player-vs-bomb is owned by the separation listener; resolving it
        // here as well would handle the same contact twice.
        if mover == EntityKind::Player && obstacle == EntityKind::Bomb {
            return ObstacleAction::Pass;
        }

        match obstacle {
            EntityKind::SoftBlock if self.through_brick => ObstacleAction::Pass,
            EntityKind::Bomb if self.through_bomb => {
                if self.destroy_mode {
                    ObstacleAction::Detonate
                } else {
                    ObstacleAction::Pass
                }
            }
            // blast visuals are not physical obstacles for bomb-walkers
            EntityKind::Blast if self.through_bomb => ObstacleAction::Pass,
            EntityKind::Wall if self.through_wall => ObstacleAction::Pass,
            _ => ObstacleAction::Stop,
        }
    }
}

/// Overlap query seam to the external physics source, used to decide
/// whether a bomb can turn solid again
pub trait OverlapProbe {
    /// True if anything other than `exclude` overlaps `pos`
    fn overlaps_other(&self, pos: Vec2, exclude: u32) -> bool;
}

/// Distance-based probe built from a snapshot of arena positions. Stands
/// in for a physics raycast in the driver and in tests.
#[derive(Debug, Clone)]
pub struct ProximityProbe {
    positions: Vec<(u32, Vec2)>,
    radius: f32,
}

impl ProximityProbe {
    pub fn of_arena(arena: &Arena) -> Self {
        Self {
            positions: arena
                .entities
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| (e.id, e.pos))
                .collect(),
            radius: REARM_PROBE_RADIUS,
        }
    }
}

impl OverlapProbe for ProximityProbe {
    fn overlaps_other(&self, pos: Vec2, exclude: u32) -> bool {
        self.positions
            .iter()
            .any(|(id, p)| *id != exclude && p.distance_squared(pos) < self.radius * self.radius)
    }
}

impl Arena {
    /// A mover ran into an obstacle; let it pass, halt it, or detonate
    /// the obstacle bomb under it
    pub fn hit_obstacle(&mut self, mover_id: u32, obstacle_id: u32) {
        let Some(mover) = self.entity(mover_id) else {
            return;
        };
        let Some(obstacle) = self.entity(obstacle_id) else {
            return;
        };
        let walk = mover.walk.unwrap_or_default();
        let mover_kind = mover.kind;
        let obstacle_kind = obstacle.kind;

        match walk.resolve(mover_kind, obstacle_kind) {
            ObstacleAction::Pass => {}
            ObstacleAction::Detonate => self.start_explode(obstacle_id),
            ObstacleAction::Stop => {
                if let Some(mover) = self.entity_mut(mover_id) {
                    mover.force_stop();
                }
            }
        }
    }

    /// Two entities came into contact. Damage resolves only in story
    /// mode, needs a dealer on `a` and a receiver on `b`, and skips the
    /// enemy-vs-enemy and spike-vs-enemy pairings.
    pub fn contact_begin(&mut self, a: u32, b: u32, _contact: Vec2) {
        if self.mode != GameMode::Story {
            return;
        }
        let (Some(acting), Some(target)) = (self.entity(a), self.entity(b)) else {
            return;
        };
        if acting.dealer.is_none() || !target.receives_damage {
            return;
        }

        // no friendly fire among enemies
        if acting.kind == EntityKind::Enemy && target.kind == EntityKind::Enemy {
            return;
        }
        // environmental spikes never kill enemies
        if acting.kind == EntityKind::Spike && target.kind == EntityKind::Enemy {
            return;
        }

        self.take_damage(b, a);
    }

    /// Two entities separated. In story and pvp modes, a player or enemy
    /// walking clear of a bomb records the separation and asks the bomb to
    /// re-arm its solidity, guarded by the overlap probe so the bomb never
    /// turns solid under someone still standing on it. Enemy-owned bombs
    /// never re-arm against enemies.
    pub fn contact_end(&mut self, a: u32, b: u32, probe: &dyn OverlapProbe) {
        if self.mode != GameMode::Story && self.mode != GameMode::Pvp {
            return;
        }
        let Some(other) = self.entity(b) else {
            return;
        };
        if other.kind != EntityKind::Bomb {
            return;
        }
        let bomb_is_enemy = other.bomb.as_ref().is_some_and(|bomb| bomb.is_enemy);

        let Some(leaving) = self.entity_mut(a) else {
            return;
        };
        let mut wants_rearm = false;
        match leaving.kind {
            EntityKind::Player => {
                leaving.stuck_with_bomb = false;
                if !leaving.through_bomb() {
                    leaving.had_out_of_bomb = true;
                    wants_rearm = true;
                }
            }
            EntityKind::Enemy => {
                if !bomb_is_enemy && !leaving.through_bomb() {
                    leaving.had_out_of_bomb = true;
                    wants_rearm = true;
                }
            }
            _ => {}
        }
        if wants_rearm {
            self.rearm_check(b, probe);
        }
    }
}
