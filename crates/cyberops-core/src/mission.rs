//! Mission content consumed at mission start.
//!
//! Mission definitions, enemy templates and squad loadouts are read-only
//! inputs supplied by campaign content. They are validated once, before
//! any entity is spawned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::AgentClass;
use crate::error::MissionDataError;
use crate::types::GridPoint;

/// Enemy templates keyed by type name.
pub type EnemyTemplates = HashMap<String, EnemyTemplate>;

/// A complete mission as authored in the campaign files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub objectives: Vec<ObjectiveDef>,
    #[serde(default, alias = "enemyComposition")]
    pub enemies: Vec<EnemySpawn>,
    pub map: MapDefinition,
    #[serde(default)]
    pub rewards: MissionRewards,
}

/// Tile grid plus points of interest. Tiles: 0 = floor, 1 = wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDefinition {
    pub width: u32,
    pub height: u32,
    /// Row-major, `tiles[y][x]`.
    pub tiles: Vec<Vec<u8>>,
    pub spawn: GridPoint,
    pub extraction: GridPoint,
    #[serde(default)]
    pub terminals: Vec<TerminalDef>,
}

/// A hackable terminal. Hacking it opens the listed door cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalDef {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub unlocks: Vec<GridPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveDef {
    pub id: String,
    #[serde(flatten)]
    pub kind: ObjectiveKind,
    /// Optional objectives are tracked but do not gate victory.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// Typed mission goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Every enemy in the mission is dead.
    EliminateAll,
    /// At least `count` enemies are dead.
    Eliminate { count: u32 },
    /// `count` terminals hacked, or all of them when absent.
    HackTerminals {
        #[serde(default)]
        count: Option<u32>,
    },
    /// A living agent stands at the extraction point.
    ReachExtraction,
}

/// Enemy placement in the mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySpawn {
    pub template: String,
    pub x: f64,
    pub y: f64,
}

/// Enemy stats supplied by campaign content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub health: i32,
    pub speed: f64,
    pub damage: u32,
    pub vision_range: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_enemy_accuracy")]
    pub accuracy: f64,
}

fn default_enemy_accuracy() -> f64 {
    crate::constants::ENEMY_DEFAULT_ACCURACY
}

/// One squad member as equipped in the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentLoadout {
    pub name: String,
    #[serde(default)]
    pub class: AgentClass,
    pub health: i32,
    pub speed: f64,
    pub damage: u32,
    pub accuracy: f64,
    #[serde(default)]
    pub crit_chance: f64,
    #[serde(default)]
    pub dodge: f64,
}

impl AgentLoadout {
    /// Stock loadout for a class, before hub upgrades.
    pub fn standard(name: impl Into<String>, class: AgentClass) -> Self {
        let (health, speed, damage, accuracy, crit_chance, dodge) = match class {
            AgentClass::Soldier => (100, 5.0, 25, 0.8, 0.10, 0.10),
            AgentClass::Hacker => (80, 5.0, 18, 0.7, 0.05, 0.15),
            AgentClass::Ghost => (70, 6.0, 22, 0.85, 0.25, 0.30),
            AgentClass::Heavy => (150, 4.0, 35, 0.7, 0.05, 0.0),
        };
        Self {
            name: name.into(),
            class,
            health,
            speed,
            damage,
            accuracy,
            crit_chance,
            dodge,
        }
    }
}

/// Rewards granted on victory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionRewards {
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub research_points: u32,
    /// World-control percentage points.
    #[serde(default)]
    pub world_control: f64,
}

/// Outcome of a finished attempt, produced once by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub mission_id: String,
    pub victory: bool,
    pub elapsed_secs: f64,
    pub enemies_defeated: u32,
    pub terminals_hacked: u32,
    pub rewards: MissionRewards,
}

impl MissionDefinition {
    /// Parse a mission from JSON.
    pub fn from_json(json: &str) -> Result<Self, MissionDataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the mission against the templates and squad it will be played with.
    pub fn validate(
        &self,
        templates: &EnemyTemplates,
        squad: &[AgentLoadout],
    ) -> Result<(), MissionDataError> {
        self.map.validate()?;

        for terminal in &self.map.terminals {
            let at = GridPoint::new(terminal.x, terminal.y);
            self.map.require_floor("terminal", at)?;
            for door in &terminal.unlocks {
                if !self.map.in_bounds(*door) {
                    return Err(MissionDataError::OutOfBounds { what: "door", at: *door });
                }
            }
        }

        for spawn in &self.enemies {
            let template = templates.get(&spawn.template).ok_or_else(|| {
                MissionDataError::UnknownEnemyTemplate {
                    name: spawn.template.clone(),
                }
            })?;
            validate_template(template)?;
            if !spawn.x.is_finite() || !spawn.y.is_finite() {
                return Err(MissionDataError::InvalidTemplate {
                    name: spawn.template.clone(),
                    reason: "spawn coordinates are not finite",
                });
            }
            let at = GridPoint::new(spawn.x.floor() as i32, spawn.y.floor() as i32);
            self.map.require_floor("enemy", at)?;
        }

        if squad.is_empty() {
            return Err(MissionDataError::EmptySquad);
        }
        for agent in squad {
            validate_loadout(agent)?;
        }

        if self.objectives.is_empty() {
            return Err(MissionDataError::NoObjectives);
        }
        for objective in &self.objectives {
            let (needed, available) = match objective.kind {
                ObjectiveKind::Eliminate { count } => (count, self.enemies.len() as u32),
                ObjectiveKind::HackTerminals { count: Some(count) } => {
                    (count, self.map.terminals.len() as u32)
                }
                _ => continue,
            };
            if needed > available {
                return Err(MissionDataError::UnreachableObjective {
                    id: objective.id.clone(),
                    needed,
                    available,
                });
            }
        }

        Ok(())
    }
}

impl MapDefinition {
    pub fn in_bounds(&self, at: GridPoint) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as u32) < self.width && (at.y as u32) < self.height
    }

    /// Raw tile value, `None` outside the grid or for ragged rows.
    pub fn tile_at(&self, at: GridPoint) -> Option<u8> {
        if !self.in_bounds(at) {
            return None;
        }
        self.tiles
            .get(at.y as usize)
            .and_then(|row| row.get(at.x as usize))
            .copied()
    }

    /// Grid shape and tile values.
    pub fn validate(&self) -> Result<(), MissionDataError> {
        if self.width == 0 || self.height == 0 {
            return Err(MissionDataError::EmptyMap {
                width: self.width,
                height: self.height,
            });
        }
        if self.tiles.len() != self.height as usize {
            return Err(MissionDataError::RowCountMismatch {
                expected: self.height,
                found: self.tiles.len(),
            });
        }
        for (y, row) in self.tiles.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(MissionDataError::RowLengthMismatch {
                    row: y,
                    expected: self.width,
                    found: row.len(),
                });
            }
            if let Some(x) = row.iter().position(|&v| v > 1) {
                return Err(MissionDataError::InvalidTile { x, y, value: row[x] });
            }
        }
        self.require_floor("spawn", self.spawn)?;
        self.require_floor("extraction", self.extraction)?;
        Ok(())
    }

    fn require_floor(&self, what: &'static str, at: GridPoint) -> Result<(), MissionDataError> {
        match self.tile_at(at) {
            None => Err(MissionDataError::OutOfBounds { what, at }),
            Some(0) => Ok(()),
            Some(_) => Err(MissionDataError::Blocked { what, at }),
        }
    }
}

/// Parse a JSON array of enemy templates into a lookup keyed by type.
pub fn templates_from_json(json: &str) -> Result<EnemyTemplates, MissionDataError> {
    let list: Vec<EnemyTemplate> = serde_json::from_str(json)?;
    Ok(list.into_iter().map(|t| (t.kind.clone(), t)).collect())
}

fn validate_template(template: &EnemyTemplate) -> Result<(), MissionDataError> {
    let reason = if template.health <= 0 {
        "health must be positive"
    } else if !template.speed.is_finite() || template.speed < 0.0 {
        "speed must be finite and non-negative"
    } else if !template.vision_range.is_finite() || template.vision_range < 0.0 {
        "vision range must be finite and non-negative"
    } else if !(0.0..=1.0).contains(&template.accuracy) {
        "accuracy must be within 0..=1"
    } else {
        return Ok(());
    };
    Err(MissionDataError::InvalidTemplate {
        name: template.kind.clone(),
        reason,
    })
}

fn validate_loadout(agent: &AgentLoadout) -> Result<(), MissionDataError> {
    let reason = if agent.health <= 0 {
        "health must be positive"
    } else if !agent.speed.is_finite() || agent.speed < 0.0 {
        "speed must be finite and non-negative"
    } else if !(0.0..=1.0).contains(&agent.accuracy)
        || !(0.0..=1.0).contains(&agent.crit_chance)
        || !(0.0..=1.0).contains(&agent.dodge)
    {
        "accuracy, crit chance and dodge must be within 0..=1"
    } else {
        return Ok(());
    };
    Err(MissionDataError::InvalidAgent {
        name: agent.name.clone(),
        reason,
    })
}
