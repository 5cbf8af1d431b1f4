//! Fog-of-war system: rebuilds visibility from living agents.

use hecs::World;

use cyberops_core::components::{Agent, Health};
use cyberops_core::constants::{AGENT_VISION_RADIUS, GHOST_VISION_MULTIPLIER};
use cyberops_core::enums::AgentClass;
use cyberops_core::types::Position;
use cyberops_map::{FogGrid, LosCache, Observer, TileMap};

/// Vision radius in whole cells for an agent class.
pub fn vision_radius(class: AgentClass) -> i32 {
    let radius = match class {
        AgentClass::Ghost => AGENT_VISION_RADIUS * GHOST_VISION_MULTIPLIER,
        _ => AGENT_VISION_RADIUS,
    };
    radius as i32
}

pub fn run(world: &World, fog: &mut FogGrid, map: &TileMap, los: &mut LosCache) {
    if !fog.is_enabled() {
        return;
    }
    let observers: Vec<Observer> = world
        .query::<(&Agent, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.alive)
        .map(|(_, (agent, pos, _))| Observer {
            position: *pos,
            radius: vision_radius(agent.class),
        })
        .collect();
    fog.update(&observers, map, los);
}
