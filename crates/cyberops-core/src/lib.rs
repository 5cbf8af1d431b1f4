//! Core types and definitions for the CyberOps tactical simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, mission definitions
//! and constants. It has no dependency on any runtime or rendering layer.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod mission;
pub mod state;
pub mod types;

pub use error::MissionDataError;
