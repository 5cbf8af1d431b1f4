//! Objective system: summarises the world and feeds the mission tracker.

use hecs::World;

use cyberops_core::components::{Agent, Enemy, Health};
use cyberops_core::enums::MissionStatus;
use cyberops_core::events::SimEvent;
use cyberops_core::types::Position;

use crate::mission::ActiveMission;
use crate::objectives::WorldSummary;

pub fn summarize(world: &World, mission: &ActiveMission) -> WorldSummary {
    let living_agents = world
        .query::<(&Agent, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| health.alive)
        .map(|(_, (_, pos, _))| *pos)
        .collect();

    let mut enemies_total = 0;
    let mut enemies_dead = 0;
    for (_, (_, health)) in world.query::<(&Enemy, &Health)>().iter() {
        enemies_total += 1;
        if !health.alive {
            enemies_dead += 1;
        }
    }

    WorldSummary {
        living_agents,
        enemies_total,
        enemies_dead,
        terminals_total: mission.terminals.len() as u32,
        terminals_hacked: mission.terminals_hacked(),
    }
}

pub fn run(world: &World, mission: &mut ActiveMission, events: &mut Vec<SimEvent>) -> MissionStatus {
    let summary = summarize(world, mission);
    mission.tracker.evaluate(&summary, events)
}
