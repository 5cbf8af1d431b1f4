//! Enemy AI system: runs the behaviour FSM for each living enemy and
//! applies the result (movement, alert, hostile fire).

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use cyberops_core::components::*;
use cyberops_core::constants::PROJECTILE_SPEED;
use cyberops_core::events::SimEvent;
use cyberops_core::types::Position;
use cyberops_map::TileMap;

use cyberops_enemy_ai::fsm::{evaluate, EnemyContext};

use crate::world_setup::spawn_projectile;

/// Living agents as `(unit id, position)`, sorted by id.
pub fn living_agents(world: &World) -> Vec<(u32, Position)> {
    let mut agents: Vec<(u32, Position)> = world
        .query::<(&Agent, &UnitId, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, _, health))| health.alive)
        .map(|(_, (_, id, pos, _))| (id.0, *pos))
        .collect();
    agents.sort_by_key(|(id, _)| *id);
    agents
}

pub fn run(world: &mut World, map: &TileMap, rng: &mut ChaCha8Rng, events: &mut Vec<SimEvent>) {
    let agents = living_agents(world);

    // Fixed processing order keeps RNG draws reproducible.
    let mut enemies: Vec<(u32, Entity)> = world
        .query::<(&Enemy, &UnitId, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.alive)
        .map(|(entity, (_, id, _))| (id.0, entity))
        .collect();
    enemies.sort_by_key(|(id, _)| *id);

    let mut shots: Vec<(Position, Position, AttackProfile)> = Vec::new();

    for (id, entity) in enemies {
        let Ok((pos, mover, awareness, stats)) = world
            .query_one_mut::<(&mut Position, &mut Mover, &mut Awareness, &CombatStats)>(entity)
        else {
            continue;
        };

        if !pos.is_finite() {
            log::warn!("enemy {id} at non-finite position, skipping");
            continue;
        }

        let ctx = EnemyContext {
            position: *pos,
            target: mover.target,
            alert_level: awareness.alert_level,
            speed: mover.speed,
            vision_range: awareness.vision_range,
            agents: &agents,
        };
        let update = evaluate(&ctx, rng);

        awareness.alert_level = update.alert_level;
        mover.target = update.target;
        if update.position != *pos {
            if map.is_walkable(&update.position) {
                *pos = update.position;
            } else {
                mover.target = *pos;
            }
        }

        for (_agent_id, aim) in update.shots {
            shots.push((
                *pos,
                aim,
                AttackProfile {
                    owner: id,
                    damage: stats.damage,
                    accuracy: stats.accuracy,
                    crit_chance: stats.crit_chance,
                },
            ));
        }
    }

    for (origin, aim, attack) in shots {
        spawn_projectile(world, origin, aim, PROJECTILE_SPEED, attack, true);
        events.push(SimEvent::ShotFired {
            owner: attack.owner,
            hostile: true,
        });
    }
}
