//! A scripted squad leader for headless runs.
//!
//! Looks at the latest snapshot and decides the next commands: fight
//! visible enemies, hack open terminals, hunt what is left, then extract.
//! The whole squad moves to the same point; only the selected agent uses
//! abilities.

use cyberops_core::commands::TacticalCommand;
use cyberops_core::constants::{GRENADE_BLAST_RADIUS, GRENADE_RANGE, HACK_RANGE, SHOOT_RANGE};
use cyberops_core::enums::AbilityKind;
use cyberops_core::state::{CombatantRole, CombatantView, TacticalSnapshot};
use cyberops_core::types::Position;

/// Shields go up below this fraction of max health.
const SHIELD_HEALTH_FRACTION: f64 = 0.5;

/// Enemies caught in one blast before a grenade is worth it.
const GRENADE_CLUSTER: usize = 2;

pub fn plan(snap: &TacticalSnapshot) -> Vec<TacticalCommand> {
    let Some(leader) = snap
        .selected_agent
        .and_then(|id| snap.combatants.iter().find(|c| c.id == id))
    else {
        return Vec::new();
    };

    let enemies: Vec<&CombatantView> = snap
        .combatants
        .iter()
        .filter(|c| c.alive && matches!(c.role, CombatantRole::Enemy { .. }))
        .collect();
    let seen: Vec<&CombatantView> = enemies
        .iter()
        .copied()
        .filter(|c| matches!(c.role, CombatantRole::Enemy { visible: true, .. }))
        .collect();
    let open_terminal = snap
        .terminals
        .iter()
        .filter(|t| !t.hacked)
        .map(|t| t.position.to_position())
        .min_by(|a, b| {
            a.distance_sq_to(&leader.position)
                .total_cmp(&b.distance_sq_to(&leader.position))
        });

    let mut commands = Vec::new();
    let destination = if let Some(target) = nearest(&seen, &leader.position) {
        combat(leader, target, &seen, &mut commands);
        Some(target.position)
    } else if let Some(terminal) = open_terminal {
        if terminal.distance_to(&leader.position) <= HACK_RANGE {
            commands.push(use_ability(leader.id, AbilityKind::Hack, None));
        }
        Some(terminal)
    } else if let Some(target) = nearest(&enemies, &leader.position) {
        Some(target.position)
    } else {
        snap.extraction.map(|cell| cell.to_position())
    };

    if let Some(point) = destination {
        commands.extend(
            snap.combatants
                .iter()
                .filter(|c| c.alive && matches!(c.role, CombatantRole::Agent { .. }))
                .map(|agent| TacticalCommand::MoveAgentTo {
                    agent_id: agent.id,
                    x: point.x,
                    y: point.y,
                }),
        );
    }
    commands
}

fn combat(
    leader: &CombatantView,
    target: &CombatantView,
    seen: &[&CombatantView],
    commands: &mut Vec<TacticalCommand>,
) {
    let CombatantRole::Agent { cooldowns, .. } = &leader.role else {
        return;
    };
    let ready = |kind: AbilityKind| cooldowns[kind.index()] == 0;

    let hurt = (leader.health as f64) < leader.max_health as f64 * SHIELD_HEALTH_FRACTION;
    if hurt && ready(AbilityKind::Shield) {
        commands.push(use_ability(leader.id, AbilityKind::Shield, None));
    }

    let dist = target.position.distance_to(&leader.position);
    let clustered = seen
        .iter()
        .filter(|c| c.position.distance_to(&target.position) <= GRENADE_BLAST_RADIUS)
        .count();
    if clustered >= GRENADE_CLUSTER && dist <= GRENADE_RANGE && ready(AbilityKind::Grenade) {
        commands.push(use_ability(
            leader.id,
            AbilityKind::Grenade,
            Some(target.position),
        ));
    }
    if dist <= SHOOT_RANGE && ready(AbilityKind::Shoot) {
        commands.push(use_ability(
            leader.id,
            AbilityKind::Shoot,
            Some(target.position),
        ));
    }
}

fn nearest<'a>(candidates: &[&'a CombatantView], from: &Position) -> Option<&'a CombatantView> {
    candidates.iter().copied().min_by(|a, b| {
        a.position
            .distance_sq_to(from)
            .total_cmp(&b.position.distance_sq_to(from))
            .then(a.id.cmp(&b.id))
    })
}

fn use_ability(agent_id: u32, kind: AbilityKind, target: Option<Position>) -> TacticalCommand {
    TacticalCommand::UseAbility {
        agent_id,
        ability_index: kind.index(),
        target,
    }
}
