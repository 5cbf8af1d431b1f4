//! Entity spawn factories for setting up the mission world.
//!
//! Agents and enemies share the base bundle (`UnitId`, `Position`,
//! `Health`, `Mover`, `CombatStats`) and differ by their marker component
//! plus role-specific parts.

use hecs::{Entity, World};

use cyberops_core::components::*;
use cyberops_core::constants::SQUAD_SPAWN_SPACING;
use cyberops_core::enums::EffectKind;
use cyberops_core::mission::{AgentLoadout, EnemyTemplate, EnemyTemplates, MissionDefinition};
use cyberops_core::types::Position;
use cyberops_core::MissionDataError;
use cyberops_map::TileMap;

/// Populate the world for a validated mission. Agents get ids `1..=n` in
/// squad order, enemies continue from there in definition order.
pub fn setup_mission(
    world: &mut World,
    def: &MissionDefinition,
    templates: &EnemyTemplates,
    squad: &[AgentLoadout],
    map: &TileMap,
) -> Result<(), MissionDataError> {
    let spawn = def.map.spawn.to_position();
    let mut next_id = 1;

    for (slot, loadout) in squad.iter().enumerate() {
        let pos = squad_slot(spawn, slot, map);
        spawn_agent(world, UnitId(next_id), loadout, pos);
        next_id += 1;
    }

    for enemy in &def.enemies {
        let template = templates.get(&enemy.template).ok_or_else(|| {
            MissionDataError::UnknownEnemyTemplate {
                name: enemy.template.clone(),
            }
        })?;
        spawn_enemy(world, UnitId(next_id), template, Position::new(enemy.x, enemy.y));
        next_id += 1;
    }

    Ok(())
}

/// Squad members fan out from the spawn point in rows of three. A slot
/// inside a wall falls back to the spawn point itself.
fn squad_slot(spawn: Position, slot: usize, map: &TileMap) -> Position {
    let offset = Position::new(
        (slot % 3) as f64 * SQUAD_SPAWN_SPACING,
        (slot / 3) as f64 * SQUAD_SPAWN_SPACING,
    );
    let pos = Position::new(spawn.x + offset.x, spawn.y + offset.y);
    if map.is_walkable(&pos) {
        pos
    } else {
        spawn
    }
}

pub fn spawn_agent(world: &mut World, id: UnitId, loadout: &AgentLoadout, pos: Position) -> Entity {
    world.spawn((
        id,
        Agent {
            name: loadout.name.clone(),
            class: loadout.class,
            selected: false,
        },
        pos,
        Health {
            current: loadout.health,
            max: loadout.health,
            alive: true,
        },
        Mover {
            target: pos,
            speed: loadout.speed,
        },
        CombatStats {
            damage: loadout.damage,
            accuracy: loadout.accuracy,
            crit_chance: loadout.crit_chance,
            dodge: loadout.dodge,
        },
        Abilities::default(),
        Shield::default(),
    ))
}

pub fn spawn_enemy(world: &mut World, id: UnitId, template: &EnemyTemplate, pos: Position) -> Entity {
    world.spawn((
        id,
        Enemy {
            kind: template.kind.clone(),
        },
        pos,
        Health {
            current: template.health,
            max: template.health,
            alive: true,
        },
        Mover {
            target: pos,
            speed: template.speed,
        },
        CombatStats {
            damage: template.damage,
            accuracy: template.accuracy,
            crit_chance: 0.0,
            dodge: 0.0,
        },
        Awareness {
            alert_level: 0.0,
            vision_range: template.vision_range,
        },
    ))
}

pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    target: Position,
    speed: f64,
    attack: AttackProfile,
    hostile: bool,
) -> Entity {
    world.spawn((
        origin,
        Projectile {
            origin,
            target,
            speed,
            attack,
            hostile,
        },
    ))
}

pub fn spawn_effect(world: &mut World, kind: EffectKind, pos: Position, duration: u32) -> Entity {
    world.spawn((
        pos,
        Effect {
            kind,
            frame: 0,
            duration,
        },
    ))
}

/// Find the entity carrying a unit id.
pub fn find_unit(world: &World, id: u32) -> Option<Entity> {
    world
        .query::<&UnitId>()
        .iter()
        .find(|(_, unit)| unit.0 == id)
        .map(|(entity, _)| entity)
}
