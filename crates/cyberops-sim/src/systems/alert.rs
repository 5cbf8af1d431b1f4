//! Alert propagation: noisy actions draw nearby enemies.

use hecs::World;

use cyberops_core::components::{Awareness, Enemy, Health, Mover};
use cyberops_core::types::Position;

use cyberops_enemy_ai::fsm::raise_alert;

use crate::mission::Noise;

/// Raise the alert of every living enemy within `radius` of `center` and
/// send it there. Returns how many enemies heard it.
pub fn alert(world: &mut World, center: Position, radius: f64) -> usize {
    if !center.is_finite() {
        return 0;
    }
    let mut heard = 0;
    for (_entity, (_enemy, pos, health, awareness, mover)) in
        world.query_mut::<(&Enemy, &Position, &Health, &mut Awareness, &mut Mover)>()
    {
        if !health.alive || !pos.is_finite() || pos.distance_to(&center) > radius {
            continue;
        }
        awareness.alert_level = raise_alert(awareness.alert_level);
        mover.target = center;
        heard += 1;
    }
    heard
}

/// Apply every noise queued since the last pass.
pub fn run(world: &mut World, noises: &mut Vec<Noise>) {
    for noise in noises.drain(..) {
        alert(world, noise.center, noise.radius);
    }
}
