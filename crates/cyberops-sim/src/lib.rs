//! Tactical simulation engine for CyberOps.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate and
//! produces `TacticalSnapshot`s for the renderer.

pub mod combat;
pub mod engine;
pub mod mission;
pub mod objectives;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use cyberops_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
