//! Commands sent from the UI layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Invalid
//! commands are ignored by the engine rather than rejected.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TacticalCommand {
    /// Set a new movement destination for an agent.
    MoveAgentTo { agent_id: u32, x: f64, y: f64 },
    /// Trigger an ability slot of the selected agent.
    UseAbility {
        agent_id: u32,
        ability_index: usize,
        /// Optional aim point (grenades, shots at a specific enemy).
        #[serde(default)]
        target: Option<Position>,
    },
    /// Make an agent the command target of the UI.
    SelectAgent { agent_id: u32 },
    /// Pause or resume the tactical loop.
    SetPaused { paused: bool },
    /// Enable or disable fog of war.
    ToggleFogOfWar { enabled: bool },
    /// Surrender: discard the current attempt.
    AbortMission,
}
