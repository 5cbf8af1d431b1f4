//! Agent motion, cooldown decay and shield expiry.

use hecs::World;

use cyberops_core::components::{Abilities, Agent, Health, Mover, Shield};
use cyberops_core::constants::{ARRIVAL_EPSILON, TICK_RATE};
use cyberops_core::types::Position;
use cyberops_map::TileMap;

/// Advance every living agent by one tick.
pub fn run(world: &mut World, map: &TileMap) {
    for (_entity, (_agent, pos, mover, health, abilities, shield)) in world.query_mut::<(
        &Agent,
        &mut Position,
        &mut Mover,
        &Health,
        &mut Abilities,
        &mut Shield,
    )>() {
        if !health.alive {
            continue;
        }

        for cooldown in abilities.cooldowns.iter_mut() {
            *cooldown = cooldown.saturating_sub(1);
        }

        if shield.remaining_ticks > 0 {
            shield.remaining_ticks -= 1;
            if shield.remaining_ticks == 0 {
                shield.amount = 0;
            }
        }

        let step = mover.speed / TICK_RATE as f64;
        step_mover(pos, mover, step, ARRIVAL_EPSILON, map);
    }
}

/// Move `pos` up to `step` toward the mover's target.
///
/// A step that would end inside a wall or off the map is refused and the
/// target is dropped (reset to the current position). Returns whether the
/// position changed.
pub fn step_mover(
    pos: &mut Position,
    mover: &mut Mover,
    step: f64,
    arrival: f64,
    map: &TileMap,
) -> bool {
    if !pos.is_finite() {
        log::warn!("skipping motion for entity at non-finite position {pos:?}");
        return false;
    }
    if !mover.target.is_finite() || !step.is_finite() {
        mover.target = *pos;
        return false;
    }
    if pos.distance_to(&mover.target) <= arrival {
        return false;
    }

    let next = pos.step_toward(&mover.target, step);
    if map.is_walkable(&next) {
        *pos = next;
        true
    } else {
        mover.target = *pos;
        false
    }
}
