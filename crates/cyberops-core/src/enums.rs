//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state of the tactical loop).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No mission loaded.
    #[default]
    Idle,
    Active,
    Paused,
    Victory,
    Defeat,
}

/// Mission attempt status tracked by the objective state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    #[default]
    Active,
    Victory,
    Defeat,
}

impl MissionStatus {
    /// Victory and Defeat are absorbing.
    pub fn is_terminal(self) -> bool {
        !matches!(self, MissionStatus::Active)
    }
}

/// Which side a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Squad,
    Hostile,
}

/// Agent specialisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentClass {
    #[default]
    Soldier,
    Hacker,
    /// Stealth specialist with extended vision.
    Ghost,
    Heavy,
}

/// Agent ability slots, indexed 0..ABILITY_COUNT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    Shoot,
    Grenade,
    Hack,
    Shield,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 4] = [
        AbilityKind::Shoot,
        AbilityKind::Grenade,
        AbilityKind::Hack,
        AbilityKind::Shield,
    ];

    /// Map a UI slot index to an ability. Unknown slots yield `None`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            AbilityKind::Shoot => 0,
            AbilityKind::Grenade => 1,
            AbilityKind::Hack => 2,
            AbilityKind::Shield => 3,
        }
    }
}

/// Visual effect marker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion,
    Hack,
    Shield,
}

/// Enemy behaviour posture, derived from alert level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPosture {
    /// alert == 0: wandering around the post.
    #[default]
    Patrolling,
    /// alert > 0: moving toward the last known disturbance.
    Pursuing,
}

/// Per-cell fog-of-war state. Ordered: a higher value means more visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Visibility {
    #[default]
    Unexplored = 0,
    Explored = 1,
    Visible = 2,
}

/// How the fog grid is reset at the start of each update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FogMode {
    /// Every cell falls back to Unexplored; only what is seen now is shown.
    #[default]
    Tactical,
    /// Visible cells fall back to Explored; the explored map is remembered.
    Permanent,
}

/// How a shield handles a hit larger than its remaining strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldPolicy {
    /// Shield absorbs what it can, the remainder reaches health.
    #[default]
    Spillover,
    /// While the shield is up it absorbs the whole hit.
    AbsorbAll,
}
