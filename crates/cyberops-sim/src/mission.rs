//! Per-attempt mission state owned by the engine next to the ECS world.

use cyberops_core::enums::FogMode;
use cyberops_core::mission::{MissionDefinition, MissionRewards};
use cyberops_core::types::{GridPoint, Position};
use cyberops_core::MissionDataError;
use cyberops_map::{FogGrid, LosCache, TileMap};

use crate::objectives::MissionTracker;
use crate::scheduler::EffectScheduler;

/// A hackable terminal and the door cells it controls.
#[derive(Debug, Clone)]
pub struct Terminal {
    pub cell: GridPoint,
    pub hacked: bool,
    pub unlocks: Vec<GridPoint>,
}

impl Terminal {
    pub fn position(&self) -> Position {
        self.cell.to_position()
    }
}

/// A noisy action waiting for the alert pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Noise {
    pub center: Position,
    pub radius: f64,
}

/// Everything about the running attempt that is not an entity.
pub struct ActiveMission {
    pub id: String,
    pub rewards: MissionRewards,
    pub map: TileMap,
    pub los: LosCache,
    pub fog: FogGrid,
    pub terminals: Vec<Terminal>,
    pub extraction: Position,
    pub tracker: MissionTracker,
    pub scheduler: EffectScheduler,
    pub noises: Vec<Noise>,
}

impl ActiveMission {
    /// Build the static part of a mission. Validation of the definition
    /// against templates and squad is the caller's job.
    pub fn new(
        def: &MissionDefinition,
        fog_mode: FogMode,
        los_window_ticks: u64,
    ) -> Result<Self, MissionDataError> {
        let map = TileMap::from_definition(&def.map)?;
        let extraction = def.map.extraction.to_position();
        Ok(Self {
            id: def.id.clone(),
            rewards: def.rewards,
            fog: FogGrid::new(map.width(), map.height(), fog_mode),
            map,
            los: LosCache::new(los_window_ticks),
            terminals: def
                .map
                .terminals
                .iter()
                .map(|t| Terminal {
                    cell: GridPoint::new(t.x, t.y),
                    hacked: false,
                    unlocks: t.unlocks.clone(),
                })
                .collect(),
            extraction,
            tracker: MissionTracker::new(def.objectives.clone(), extraction),
            scheduler: EffectScheduler::new(),
            noises: Vec::new(),
        })
    }

    pub fn terminals_hacked(&self) -> u32 {
        self.terminals.iter().filter(|t| t.hacked).count() as u32
    }
}
