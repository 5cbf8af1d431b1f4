//! Events emitted by the simulation for UI, audio and stat tracking.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Something worth reacting to happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    MissionStarted { mission_id: String },
    /// Emitted exactly once per attempt.
    MissionEnded { victory: bool },
    MissionAborted,
    /// Emitted exactly once per combatant, on the alive -> dead transition.
    EntityDied { unit_id: u32, faction: Faction },
    ObjectiveProgressChanged {
        objective_id: String,
        current: u32,
        total: u32,
    },
    AbilityUsed { agent_id: u32, ability: AbilityKind },
    ShotFired { owner: u32, hostile: bool },
    Explosion { x: f64, y: f64 },
    TerminalHacked { terminal: usize },
    DoorUnlocked { x: i32, y: i32 },
    AgentSelected { agent_id: u32 },
}
