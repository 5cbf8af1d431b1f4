//! Mission data validation errors.
//!
//! Raised once, when a mission is started. A running mission never
//! produces these.

use thiserror::Error;

use crate::types::GridPoint;

#[derive(Debug, Error)]
pub enum MissionDataError {
    #[error("map has zero width or height ({width}x{height})")]
    EmptyMap { width: u32, height: u32 },

    #[error("map declares {expected} rows but has {found}")]
    RowCountMismatch { expected: u32, found: usize },

    #[error("map row {row} has {found} tiles, expected {expected}")]
    RowLengthMismatch { row: usize, expected: u32, found: usize },

    #[error("invalid tile value {value} at ({x}, {y})")]
    InvalidTile { x: usize, y: usize, value: u8 },

    #[error("{what} at ({}, {}) is outside the map", at.x, at.y)]
    OutOfBounds { what: &'static str, at: GridPoint },

    #[error("{what} at ({}, {}) is inside a wall", at.x, at.y)]
    Blocked { what: &'static str, at: GridPoint },

    #[error("unknown enemy template: {name}")]
    UnknownEnemyTemplate { name: String },

    #[error("mission has no agents to deploy")]
    EmptySquad,

    #[error("agent {name}: {reason}")]
    InvalidAgent { name: String, reason: &'static str },

    #[error("enemy template {name}: {reason}")]
    InvalidTemplate { name: String, reason: &'static str },

    #[error("mission declares no objectives")]
    NoObjectives,

    #[error("objective {id} needs {needed} but the mission only has {available}")]
    UnreachableObjective {
        id: String,
        needed: u32,
        available: u32,
    },

    #[error("mission data could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
