//! Tactical snapshot: the read-only view handed to rendering each tick.

use serde::{Deserialize, Serialize};

use crate::constants::ABILITY_COUNT;
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{GridPoint, Position, SimTime};

/// Complete visible state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TacticalSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mission_id: Option<String>,
    pub selected_agent: Option<u32>,
    pub fog_enabled: bool,
    /// Agents first, then enemies, each sorted by id.
    pub combatants: Vec<CombatantView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub terminals: Vec<TerminalView>,
    pub extraction: Option<GridPoint>,
    pub fog: FogView,
    pub objectives: Vec<ObjectiveView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// Fields every combatant shares, plus the role-specific part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantView {
    pub id: u32,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub role: CombatantRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CombatantRole {
    Agent {
        name: String,
        class: AgentClass,
        selected: bool,
        cooldowns: [u32; ABILITY_COUNT],
        shield: i32,
        shield_ticks: u32,
    },
    Enemy {
        template: String,
        alert_level: f64,
        posture: EnemyPosture,
        /// Whether the enemy stands on a cell the squad can currently see.
        visible: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub target: Position,
    pub hostile: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub position: Position,
    pub frame: u32,
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalView {
    pub position: GridPoint,
    pub hacked: bool,
}

/// Row-major fog grid: 0 = unexplored, 1 = explored, 2 = visible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FogView {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub id: String,
    pub current: u32,
    pub total: u32,
    pub satisfied: bool,
    pub required: bool,
}
