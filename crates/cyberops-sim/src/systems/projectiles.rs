//! Projectile system: moves shots and resolves them on arrival.
//!
//! Both sides resolve the same way: once a projectile is within the
//! arrival radius of its aim point, every living opponent within the hit
//! radius of that point gets an attack roll, then the projectile is
//! removed. A projectile never survives the tick it resolves in.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use cyberops_core::components::*;
use cyberops_core::constants::{PROJECTILE_ARRIVAL_RADIUS, PROJECTILE_HIT_RADIUS};
use cyberops_core::enums::{Faction, ShieldPolicy};
use cyberops_core::events::SimEvent;
use cyberops_core::types::Position;

use crate::combat::{apply_damage, CombatFormulas, DefenseProfile};

pub fn run(
    world: &mut World,
    formulas: &dyn CombatFormulas,
    rng: &mut ChaCha8Rng,
    policy: ShieldPolicy,
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();
    let mut arrived: Vec<Projectile> = Vec::new();

    for (entity, (pos, projectile)) in world.query_mut::<(&mut Position, &Projectile)>() {
        if !pos.is_finite() || !projectile.target.is_finite() || !projectile.speed.is_finite() {
            log::warn!("dropping projectile with non-finite state at {pos:?}");
            despawn_buffer.push(entity);
            continue;
        }
        if pos.distance_to(&projectile.target) < PROJECTILE_ARRIVAL_RADIUS {
            arrived.push(*projectile);
            despawn_buffer.push(entity);
        } else {
            *pos = pos.step_toward(&projectile.target, projectile.speed);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    for projectile in arrived {
        resolve_impact(world, &projectile, formulas, rng, policy, events);
    }
}

fn resolve_impact(
    world: &mut World,
    projectile: &Projectile,
    formulas: &dyn CombatFormulas,
    rng: &mut ChaCha8Rng,
    policy: ShieldPolicy,
    events: &mut Vec<SimEvent>,
) {
    let faction = if projectile.hostile {
        Faction::Squad
    } else {
        Faction::Hostile
    };
    for (id, entity, dodge) in units_near(world, faction, &projectile.target, PROJECTILE_HIT_RADIUS) {
        let outcome = formulas.resolve(&projectile.attack, &DefenseProfile { dodge }, rng);
        if outcome.hit {
            damage_unit(world, entity, id, faction, outcome.damage, policy, events);
        }
    }
}

/// Living units of one faction within `radius` of `center`, as
/// `(unit id, entity, dodge)` sorted by id.
pub fn units_near(
    world: &World,
    faction: Faction,
    center: &Position,
    radius: f64,
) -> Vec<(u32, Entity, f64)> {
    let mut found: Vec<(u32, Entity, f64)> = world
        .query::<(&UnitId, &Position, &Health, &CombatStats, Option<&Agent>)>()
        .iter()
        .filter(|(_, (_, pos, health, _, agent))| {
            let matches_side = agent.is_some() == (faction == Faction::Squad);
            matches_side && health.alive && pos.is_finite() && pos.distance_to(center) <= radius
        })
        .map(|(entity, (id, _, _, stats, _))| (id.0, entity, stats.dodge))
        .collect();
    found.sort_by_key(|(id, _, _)| *id);
    found
}

/// Apply damage to one unit and report its death exactly once.
pub fn damage_unit(
    world: &mut World,
    entity: Entity,
    unit_id: u32,
    faction: Faction,
    damage: u32,
    policy: ShieldPolicy,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Ok((health, shield)) = world.query_one_mut::<(&mut Health, Option<&mut Shield>)>(entity)
    else {
        return false;
    };
    let killed = apply_damage(health, shield, damage, policy);
    if killed {
        log::debug!("unit {unit_id} ({faction:?}) eliminated");
        events.push(SimEvent::EntityDied { unit_id, faction });
    }
    killed
}
