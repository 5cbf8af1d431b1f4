//! Visual effects and explosion resolution.

use hecs::{Entity, World};

use cyberops_core::components::Effect;
use cyberops_core::constants::*;
use cyberops_core::enums::{EffectKind, Faction, ShieldPolicy};
use cyberops_core::events::SimEvent;
use cyberops_core::types::Position;

use crate::systems::projectiles::{damage_unit, units_near};
use crate::world_setup::spawn_effect;

/// Default lifetime of an effect marker.
pub fn duration_for(kind: EffectKind) -> u32 {
    match kind {
        EffectKind::Explosion => EXPLOSION_EFFECT_TICKS,
        EffectKind::Hack => HACK_EFFECT_TICKS,
        EffectKind::Shield => SHIELD_EFFECT_TICKS,
    }
}

pub fn spawn(world: &mut World, kind: EffectKind, pos: Position) -> Entity {
    spawn_effect(world, kind, pos, duration_for(kind))
}

/// Advance effect frames and remove finished ones.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    for (entity, effect) in world.query_mut::<&mut Effect>() {
        effect.frame += 1;
        if effect.frame >= effect.duration {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Detonate an explosion: spawn the marker and deal flat damage, once,
/// to every living enemy in the blast. Accuracy and dodge do not apply.
pub fn detonate(
    world: &mut World,
    center: Position,
    radius: f64,
    damage: u32,
    policy: ShieldPolicy,
    events: &mut Vec<SimEvent>,
) -> usize {
    if !center.is_finite() {
        log::warn!("explosion at non-finite point ignored");
        return 0;
    }
    spawn(world, EffectKind::Explosion, center);
    events.push(SimEvent::Explosion {
        x: center.x,
        y: center.y,
    });

    let victims = units_near(world, Faction::Hostile, &center, radius);
    for &(id, entity, _) in &victims {
        damage_unit(world, entity, id, Faction::Hostile, damage, policy, events);
    }
    victims.len()
}
