//! Snapshot system: queries the ECS world and builds a complete
//! `TacticalSnapshot`.
//!
//! This system is read-only: it never modifies the world.

use hecs::World;

use cyberops_core::components::*;
use cyberops_core::enums::GamePhase;
use cyberops_core::events::SimEvent;
use cyberops_core::state::*;
use cyberops_core::types::{Position, SimTime};

use cyberops_enemy_ai::fsm::posture_for;

use crate::mission::ActiveMission;

/// Build a complete snapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    mission: Option<&ActiveMission>,
    events: Vec<SimEvent>,
) -> TacticalSnapshot {
    let Some(mission) = mission else {
        return TacticalSnapshot {
            time: *time,
            phase,
            events,
            ..Default::default()
        };
    };

    let mut combatants = build_agents(world);
    combatants.extend(build_enemies(world, mission));

    TacticalSnapshot {
        time: *time,
        phase,
        mission_id: Some(mission.id.clone()),
        selected_agent: selected_agent(world),
        fog_enabled: mission.fog.is_enabled(),
        combatants,
        projectiles: build_projectiles(world),
        effects: build_effects(world),
        terminals: mission
            .terminals
            .iter()
            .map(|t| TerminalView {
                position: t.cell,
                hacked: t.hacked,
            })
            .collect(),
        extraction: Some(mission.extraction.cell()),
        fog: FogView {
            width: mission.fog.width(),
            height: mission.fog.height(),
            cells: mission.fog.to_bytes(),
        },
        objectives: mission.tracker.progress().to_vec(),
        events,
    }
}

/// Id of the currently selected living agent.
pub fn selected_agent(world: &World) -> Option<u32> {
    world
        .query::<(&Agent, &UnitId, &Health)>()
        .iter()
        .find(|(_, (agent, _, health))| agent.selected && health.alive)
        .map(|(_, (_, id, _))| id.0)
}

fn build_agents(world: &World) -> Vec<CombatantView> {
    let mut views: Vec<CombatantView> = world
        .query::<(&Agent, &UnitId, &Position, &Health, &Abilities, &Shield)>()
        .iter()
        .map(|(_, (agent, id, pos, health, abilities, shield))| CombatantView {
            id: id.0,
            position: *pos,
            health: health.current,
            max_health: health.max,
            alive: health.alive,
            role: CombatantRole::Agent {
                name: agent.name.clone(),
                class: agent.class,
                selected: agent.selected,
                cooldowns: abilities.cooldowns,
                shield: shield.amount,
                shield_ticks: shield.remaining_ticks,
            },
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

fn build_enemies(world: &World, mission: &ActiveMission) -> Vec<CombatantView> {
    let mut views: Vec<CombatantView> = world
        .query::<(&Enemy, &UnitId, &Position, &Health, &Awareness)>()
        .iter()
        .map(|(_, (enemy, id, pos, health, awareness))| CombatantView {
            id: id.0,
            position: *pos,
            health: health.current,
            max_health: health.max,
            alive: health.alive,
            role: CombatantRole::Enemy {
                template: enemy.kind.clone(),
                alert_level: awareness.alert_level,
                posture: posture_for(awareness.alert_level),
                visible: mission.fog.is_visible(pos),
            },
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(_, (pos, projectile))| ProjectileView {
            position: *pos,
            target: projectile.target,
            hostile: projectile.hostile,
        })
        .collect()
}

fn build_effects(world: &World) -> Vec<EffectView> {
    world
        .query::<(&Position, &Effect)>()
        .iter()
        .map(|(_, (pos, effect))| EffectView {
            kind: effect.kind,
            position: *pos,
            frame: effect.frame,
            duration: effect.duration,
        })
        .collect()
}
