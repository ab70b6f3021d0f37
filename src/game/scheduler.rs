//! # Animation/Movement Scheduler
//!
//! Advances every entity's animation state machine exactly once per tick.
//!
//! Standing entities cycle their idle frames, one advance every two
//! ticks, forever. Stepping entities displace their pixel offset by one
//! half-step per tick; after the fixed half-step count the step commits:
//! the logical cell moves one step in the facing direction, the offset
//! zeroes out, and the entity reverts to standing. The commit is the only
//! point at which an entity's cell changes.

use crate::config::{HALF_STEPS_PER_CELL, STANDING_FRAME_TICKS, STEP_DX, STEP_DY};
use crate::game::{Animation, Entity, EntityRegistry};

/// Advances one entity's animation by a single tick.
///
/// Returns true when this tick completed a step and committed the
/// entity's new cell.
pub fn advance(entity: &mut Entity) -> bool {
    match entity.animation {
        Animation::Standing { frame, ticks } => {
            let ticks = ticks + 1;
            if ticks >= STANDING_FRAME_TICKS {
                let frames = entity.frames.frame_count().max(1);
                entity.animation = Animation::Standing {
                    frame: (frame + 1) % frames,
                    ticks: 0,
                };
            } else {
                entity.animation = Animation::Standing { frame, ticks };
            }
            false
        }
        Animation::Stepping { half_steps } => {
            let delta = entity.facing.to_delta();
            entity.offset.0 += delta.x * STEP_DX;
            entity.offset.1 += delta.y * STEP_DY;
            let half_steps = half_steps + 1;
            if half_steps >= HALF_STEPS_PER_CELL {
                entity.pos = entity.pos.step(entity.facing);
                entity.offset = (0, 0);
                entity.animation = Animation::standing();
                true
            } else {
                entity.animation = Animation::Stepping { half_steps };
                false
            }
        }
    }
}

/// Advances every registered entity by one tick.
pub fn advance_all(registry: &mut EntityRegistry) {
    for entity in registry.iter_mut() {
        advance(entity);
    }
}
