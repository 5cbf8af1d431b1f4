//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components. `Position` (from
//! `types`) is used as a component too.

use serde::{Deserialize, Serialize};

use crate::constants::ABILITY_COUNT;
use crate::enums::*;
use crate::types::Position;

/// Stable identifier exposed to the UI and used by commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Marks a player-controlled combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub class: AgentClass,
    /// At most one agent carries `selected = true`.
    pub selected: bool,
}

/// Marks an AI-controlled hostile combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Template name the enemy was spawned from.
    pub kind: String,
}

/// Hit points. `current` stays in `[0, max]`; `alive` flips to false once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    pub alive: bool,
}

/// Movement intent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mover {
    /// Current destination.
    pub target: Position,
    /// Grid units per second.
    pub speed: f64,
}

/// Offensive and defensive numbers fed to the combat formulas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage: u32,
    /// Base hit probability (0.0 - 1.0).
    pub accuracy: f64,
    /// Probability that a hit is critical (0.0 - 1.0).
    pub crit_chance: f64,
    /// Subtracted from the attacker's accuracy (0.0 - 1.0).
    pub dodge: f64,
}

/// Per-ability remaining cooldown ticks. An ability fires only at 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Abilities {
    pub cooldowns: [u32; ABILITY_COUNT],
}

/// Temporary damage absorber.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Shield {
    pub amount: i32,
    /// Ticks until the shield collapses.
    pub remaining_ticks: u32,
}

/// Enemy alertness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Awareness {
    /// 0 = patrolling, up to ALERT_MAX = engaging.
    pub alert_level: f64,
    /// Radius in which agents are spotted.
    pub vision_range: f64,
}

/// Attacker numbers frozen at fire time and carried by a projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttackProfile {
    /// `UnitId` of the shooter.
    pub owner: u32,
    pub damage: u32,
    pub accuracy: f64,
    pub crit_chance: f64,
}

/// A shot in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub origin: Position,
    pub target: Position,
    /// Grid units per tick.
    pub speed: f64,
    pub attack: AttackProfile,
    /// Enemy-fired (hits agents) vs agent-fired (hits enemies).
    pub hostile: bool,
}

/// Short-lived visual marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub frame: u32,
    pub duration: u32,
}
