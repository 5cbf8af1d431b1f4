//! Agent abilities.
//!
//! `use_ability` is the single entry point for the `UseAbility` command.
//! It checks every precondition (living, selected, off cooldown, valid
//! target) and returns false without touching anything when one fails.

use hecs::{Entity, World};

use cyberops_core::components::*;
use cyberops_core::constants::*;
use cyberops_core::enums::{AbilityKind, EffectKind};
use cyberops_core::events::SimEvent;
use cyberops_core::types::Position;

use crate::mission::{ActiveMission, Noise};
use crate::scheduler::DelayedAction;
use crate::systems::effects;
use crate::world_setup::{find_unit, spawn_projectile};

/// Cooldown an ability is set to after a successful use.
pub fn cooldown_for(kind: AbilityKind) -> u32 {
    match kind {
        AbilityKind::Shoot => SHOOT_COOLDOWN_TICKS,
        AbilityKind::Grenade => GRENADE_COOLDOWN_TICKS,
        AbilityKind::Hack => HACK_COOLDOWN_TICKS,
        AbilityKind::Shield => SHIELD_COOLDOWN_TICKS,
    }
}

/// The acting agent, read once up front.
struct Caster {
    entity: Entity,
    id: u32,
    position: Position,
    stats: CombatStats,
}

fn ready_caster(world: &World, agent_id: u32, kind: AbilityKind) -> Option<Caster> {
    let entity = find_unit(world, agent_id)?;
    let mut query = world
        .query_one::<(&Agent, &Position, &Health, &Abilities, &CombatStats)>(entity)
        .ok()?;
    let (agent, pos, health, abilities, stats) = query.get()?;
    let ready = agent.selected
        && health.alive
        && pos.is_finite()
        && abilities.cooldowns[kind.index()] == 0;
    if !ready {
        return None;
    }
    let caster = Caster {
        entity,
        id: agent_id,
        position: *pos,
        stats: *stats,
    };
    Some(caster)
}

pub fn use_ability(
    world: &mut World,
    mission: &mut ActiveMission,
    events: &mut Vec<SimEvent>,
    tick: u64,
    agent_id: u32,
    ability_index: usize,
    target: Option<Position>,
) -> bool {
    let Some(kind) = AbilityKind::from_index(ability_index) else {
        log::debug!("agent {agent_id}: no ability in slot {ability_index}");
        return false;
    };
    let Some(caster) = ready_caster(world, agent_id, kind) else {
        log::debug!("agent {agent_id}: {kind:?} not available");
        return false;
    };
    let target = target.filter(Position::is_finite);

    let used = match kind {
        AbilityKind::Shoot => shoot(world, mission, events, &caster, target),
        AbilityKind::Grenade => throw_grenade(world, mission, tick, &caster, target),
        AbilityKind::Hack => hack(world, mission, events, &caster),
        AbilityKind::Shield => raise_shield(world, &caster),
    };
    if !used {
        log::debug!("agent {agent_id}: {kind:?} has no valid target");
        return false;
    }

    if let Ok(mut abilities) = world.get::<&mut Abilities>(caster.entity) {
        abilities.cooldowns[kind.index()] = cooldown_for(kind);
    }
    events.push(SimEvent::AbilityUsed {
        agent_id,
        ability: kind,
    });
    log::debug!("agent {agent_id} used {kind:?}");
    true
}

/// Living enemies within `range` of `from`, as `(id, position)`.
fn enemies_in_range(world: &World, from: &Position, range: f64) -> Vec<(u32, Position)> {
    let mut found: Vec<(u32, Position)> = world
        .query::<(&Enemy, &UnitId, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, pos, health))| {
            health.alive && pos.is_finite() && pos.distance_to(from) <= range
        })
        .map(|(_, (_, id, pos, _))| (id.0, *pos))
        .collect();
    found.sort_by_key(|(id, _)| *id);
    found
}

/// Candidate closest to `aim`; ties go to the lower id.
fn closest_to(candidates: &[(u32, Position)], aim: &Position) -> Option<(u32, Position)> {
    candidates.iter().copied().min_by(|a, b| {
        a.1.distance_sq_to(aim)
            .total_cmp(&b.1.distance_sq_to(aim))
            .then(a.0.cmp(&b.0))
    })
}

fn shoot(
    world: &mut World,
    mission: &mut ActiveMission,
    events: &mut Vec<SimEvent>,
    caster: &Caster,
    target: Option<Position>,
) -> bool {
    let visible: Vec<(u32, Position)> = enemies_in_range(world, &caster.position, SHOOT_RANGE)
        .into_iter()
        .filter(|(_, pos)| mission.los.query(&mission.map, &caster.position, pos))
        .collect();
    let aim = target.unwrap_or(caster.position);
    let Some((_, enemy_pos)) = closest_to(&visible, &aim) else {
        return false;
    };

    let attack = AttackProfile {
        owner: caster.id,
        damage: caster.stats.damage,
        accuracy: caster.stats.accuracy,
        crit_chance: caster.stats.crit_chance,
    };
    spawn_projectile(world, caster.position, enemy_pos, PROJECTILE_SPEED, attack, false);
    events.push(SimEvent::ShotFired {
        owner: caster.id,
        hostile: false,
    });
    mission.noises.push(Noise {
        center: caster.position,
        radius: SHOOT_NOISE_RADIUS,
    });
    true
}

fn throw_grenade(
    world: &World,
    mission: &mut ActiveMission,
    tick: u64,
    caster: &Caster,
    target: Option<Position>,
) -> bool {
    let center = match target {
        Some(point) if point.distance_to(&caster.position) <= GRENADE_RANGE => point,
        Some(_) => return false,
        None => {
            let nearby = enemies_in_range(world, &caster.position, GRENADE_RANGE);
            match closest_to(&nearby, &caster.position) {
                Some((_, pos)) => pos,
                None => return false,
            }
        }
    };

    mission.scheduler.schedule(
        tick + GRENADE_FUSE_TICKS,
        DelayedAction::Detonate {
            owner: caster.id,
            center,
            radius: GRENADE_BLAST_RADIUS,
            damage: GRENADE_DAMAGE,
        },
    );
    true
}

fn hack(
    world: &mut World,
    mission: &mut ActiveMission,
    events: &mut Vec<SimEvent>,
    caster: &Caster,
) -> bool {
    let Some(index) = mission
        .terminals
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.hacked && t.position().distance_to(&caster.position) <= HACK_RANGE)
        .min_by(|(_, a), (_, b)| {
            a.position()
                .distance_sq_to(&caster.position)
                .total_cmp(&b.position().distance_sq_to(&caster.position))
        })
        .map(|(i, _)| i)
    else {
        return false;
    };

    let terminal = &mut mission.terminals[index];
    terminal.hacked = true;
    let at = terminal.position();
    let doors = terminal.unlocks.clone();
    events.push(SimEvent::TerminalHacked { terminal: index });
    effects::spawn(world, EffectKind::Hack, at);

    let mut opened = false;
    for door in doors {
        if mission.map.unlock(door) {
            opened = true;
            log::debug!("terminal {index} unlocked door at ({}, {})", door.x, door.y);
            events.push(SimEvent::DoorUnlocked {
                x: door.x,
                y: door.y,
            });
        }
    }
    if opened {
        mission.los.invalidate();
    }
    true
}

fn raise_shield(world: &mut World, caster: &Caster) -> bool {
    let Ok(mut shield) = world.get::<&mut Shield>(caster.entity) else {
        return false;
    };
    *shield = Shield {
        amount: SHIELD_AMOUNT,
        remaining_ticks: SHIELD_DURATION_TICKS,
    };
    drop(shield);
    effects::spawn(world, EffectKind::Shield, caster.position);
    true
}
