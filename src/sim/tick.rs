//! Fixed timestep simulation tick
//!
//! Advances the arena deterministically: bomb fuses first, then mover
//! integration. Fuse expiry is checked before any externally triggered
//! explosion request lands in the same tick; a second request on the same
//! bomb is absorbed by the dead-entity guard, not by sequencing.

use super::events::{DestroyNotice, ExplosionEvent, Sound};
use super::state::Arena;

impl Arena {
    /// Advance the arena by one fixed timestep
    pub fn tick(&mut self, dt: f32) {
        self.time_ticks += 1;

        // fuses, in entity-id order
        let mut expiring = Vec::new();
        for entity in &mut self.entities {
            if !entity.is_alive() {
                continue;
            }
            let Some(bomb) = entity.bomb.as_mut() else {
                continue;
            };
            if let Some(countdown) = bomb.countdown.as_mut() {
                countdown.update(dt);
                if countdown.is_finished() {
                    expiring.push(entity.id);
                }
            }
        }
        for id in expiring {
            self.start_explode(id);
        }

        // mover integration
        for entity in &mut self.entities {
            if entity.is_alive() {
                entity.pos += entity.vel * dt;
            }
        }
    }

    /// Take the pending explosion events, leaving the queue empty
    pub fn drain_explosions(&mut self) -> Vec<ExplosionEvent> {
        std::mem::take(&mut self.explosions)
    }

    /// Take the pending sound requests
    pub fn drain_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    /// Take the pending destroy notices
    pub fn drain_destroyed(&mut self) -> Vec<DestroyNotice> {
        std::mem::take(&mut self.destroyed)
    }
}
