//! Simulation engine: the tactical loop.
//!
//! `SimulationEngine` owns the hecs ECS world and the running mission,
//! processes queued commands, runs all systems and produces
//! `TacticalSnapshot`s. Completely headless, so whole missions can be
//! replayed deterministically in tests.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use cyberops_core::commands::TacticalCommand;
use cyberops_core::components::{Agent, Health, Mover, UnitId};
use cyberops_core::constants::{GRENADE_NOISE_RADIUS, LOS_CACHE_WINDOW_TICKS};
use cyberops_core::enums::{FogMode, GamePhase, MissionStatus, ShieldPolicy};
use cyberops_core::events::SimEvent;
use cyberops_core::mission::{
    AgentLoadout, EnemyTemplates, MissionDefinition, MissionReport, MissionRewards,
};
use cyberops_core::state::TacticalSnapshot;
use cyberops_core::types::{Position, SimTime};
use cyberops_core::MissionDataError;
use cyberops_map::{FogGrid, TileMap};

use crate::combat::{CombatFormulas, StandardFormulas};
use crate::mission::{ActiveMission, Noise};
use crate::objectives::MissionTracker;
use crate::scheduler::DelayedAction;
use crate::systems;
use crate::world_setup;

/// Configuration for a simulation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed + same commands = same run.
    pub seed: u64,
    pub fog_mode: FogMode,
    pub shield_policy: ShieldPolicy,
    /// Lifetime of cached line-of-sight results.
    pub los_cache_window_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fog_mode: FogMode::default(),
            shield_policy: ShieldPolicy::default(),
            los_cache_window_ticks: LOS_CACHE_WINDOW_TICKS,
        }
    }
}

/// The simulation engine. Owns the ECS world and all mission state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    formulas: Box<dyn CombatFormulas>,
    command_queue: VecDeque<TacticalCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    mission: Option<ActiveMission>,
    report: Option<MissionReport>,
    fog_enabled: bool,
}

impl SimulationEngine {
    /// Create an engine using the standard combat formulas.
    pub fn new(config: SimConfig) -> Self {
        Self::with_formulas(config, Box::new(StandardFormulas))
    }

    /// Create an engine with injected combat formulas.
    pub fn with_formulas(config: SimConfig, formulas: Box<dyn CombatFormulas>) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            formulas,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            mission: None,
            report: None,
            fog_enabled: true,
        }
    }

    /// Validate a mission and deploy it. On error nothing changes: the
    /// previous state (usually `Idle`) is kept.
    pub fn start_mission(
        &mut self,
        def: &MissionDefinition,
        templates: &EnemyTemplates,
        squad: &[AgentLoadout],
    ) -> Result<(), MissionDataError> {
        def.validate(templates, squad)?;
        let mut mission =
            ActiveMission::new(def, self.config.fog_mode, self.config.los_cache_window_ticks)?;
        mission.fog.set_enabled(self.fog_enabled);

        let mut world = World::new();
        world_setup::setup_mission(&mut world, def, templates, squad, &mission.map)?;

        self.world = world;
        self.mission = Some(mission);
        self.time = SimTime::default();
        self.phase = GamePhase::Active;
        self.command_queue.clear();
        self.events.push(SimEvent::MissionStarted {
            mission_id: def.id.clone(),
        });
        ensure_selection(&mut self.world, &mut self.events);

        log::info!(
            "mission {} started: {} agents, {} enemies",
            def.id,
            squad.len(),
            def.enemies.len()
        );
        Ok(())
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: TacticalCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = TacticalCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> TacticalSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let status = self.run_systems();
            self.time.advance();
            if status.is_terminal() {
                self.finish_mission(status);
            }
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.mission.as_ref(),
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn mission_id(&self) -> Option<&str> {
        self.mission.as_ref().map(|m| m.id.as_str())
    }

    pub fn map(&self) -> Option<&TileMap> {
        self.mission.as_ref().map(|m| &m.map)
    }

    pub fn fog(&self) -> Option<&FogGrid> {
        self.mission.as_ref().map(|m| &m.fog)
    }

    pub fn tracker(&self) -> Option<&MissionTracker> {
        self.mission.as_ref().map(|m| &m.tracker)
    }

    /// The outcome of the last finished attempt. Returned once.
    pub fn take_report(&mut self) -> Option<MissionReport> {
        self.report.take()
    }

    /// Mutable world access for tests that stage situations directly.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if !self.handle_command(&command) {
                log::debug!("ignored command in {:?}: {command:?}", self.phase);
            }
        }
    }

    /// Apply one command. Returns false when it was ignored.
    fn handle_command(&mut self, command: &TacticalCommand) -> bool {
        let in_mission = matches!(self.phase, GamePhase::Active | GamePhase::Paused);
        match *command {
            TacticalCommand::MoveAgentTo { agent_id, x, y } => {
                let target = Position::new(x, y);
                match &self.mission {
                    Some(mission) if in_mission && mission.map.is_walkable(&target) => {
                        set_agent_target(&mut self.world, agent_id, target)
                    }
                    _ => false,
                }
            }
            TacticalCommand::UseAbility {
                agent_id,
                ability_index,
                target,
            } => match self.mission.as_mut() {
                Some(mission) if self.phase == GamePhase::Active => {
                    systems::abilities::use_ability(
                        &mut self.world,
                        mission,
                        &mut self.events,
                        self.time.tick,
                        agent_id,
                        ability_index,
                        target,
                    )
                }
                _ => false,
            },
            TacticalCommand::SelectAgent { agent_id } => {
                in_mission && select_agent(&mut self.world, agent_id, &mut self.events)
            }
            TacticalCommand::SetPaused { paused } => match (self.phase, paused) {
                (GamePhase::Active, true) => {
                    self.phase = GamePhase::Paused;
                    true
                }
                (GamePhase::Paused, false) => {
                    self.phase = GamePhase::Active;
                    true
                }
                _ => false,
            },
            TacticalCommand::ToggleFogOfWar { enabled } => {
                self.fog_enabled = enabled;
                if let Some(mission) = self.mission.as_mut() {
                    mission.fog.set_enabled(enabled);
                    // Re-enabled fog starts unexplored; reveal the current view.
                    if enabled {
                        systems::fog::run(
                            &self.world,
                            &mut mission.fog,
                            &mission.map,
                            &mut mission.los,
                        );
                    }
                }
                true
            }
            TacticalCommand::AbortMission => {
                if !in_mission {
                    return false;
                }
                if let Some(mission) = self.mission.take() {
                    log::info!("mission {} aborted", mission.id);
                }
                self.world.clear();
                self.time = SimTime::default();
                self.phase = GamePhase::Idle;
                self.events.push(SimEvent::MissionAborted);
                true
            }
        }
    }

    /// Run all systems in order. Returns the mission status after the
    /// objective pass.
    fn run_systems(&mut self) -> MissionStatus {
        let Some(mission) = self.mission.as_mut() else {
            return MissionStatus::Active;
        };
        let tick = self.time.tick;
        let policy = self.config.shield_policy;
        mission.los.begin_tick(tick);

        // 1. Delayed effects due this tick
        for action in mission.scheduler.drain_due(tick) {
            match action {
                DelayedAction::Detonate {
                    owner,
                    center,
                    radius,
                    damage,
                } => {
                    let hit = systems::effects::detonate(
                        &mut self.world,
                        center,
                        radius,
                        damage,
                        policy,
                        &mut self.events,
                    );
                    log::debug!("grenade from agent {owner} detonated, {hit} caught in blast");
                    mission.noises.push(Noise {
                        center,
                        radius: GRENADE_NOISE_RADIUS,
                    });
                }
            }
        }
        // 2. Agent motion, cooldowns, shields
        systems::motion::run(&mut self.world, &mission.map);
        // 3. Enemy behaviour (pursuit, wander, spotting, hostile fire)
        systems::enemy_ai::run(&mut self.world, &mission.map, &mut self.rng, &mut self.events);
        // 4. Alert propagation from this tick's noise
        systems::alert::run(&mut self.world, &mut mission.noises);
        // 5. Projectiles (advance, resolve on arrival)
        systems::projectiles::run(
            &mut self.world,
            self.formulas.as_ref(),
            &mut self.rng,
            policy,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 6. Effect frames
        systems::effects::run(&mut self.world, &mut self.despawn_buffer);
        // 7. Keep a living agent selected
        ensure_selection(&mut self.world, &mut self.events);
        // 8. Fog of war
        systems::fog::run(&self.world, &mut mission.fog, &mission.map, &mut mission.los);
        // 9. Objectives and end conditions
        systems::objectives::run(&self.world, mission, &mut self.events)
    }

    fn finish_mission(&mut self, status: MissionStatus) {
        let victory = status == MissionStatus::Victory;
        self.phase = if victory {
            GamePhase::Victory
        } else {
            GamePhase::Defeat
        };

        if let Some(mission) = &self.mission {
            let summary = systems::objectives::summarize(&self.world, mission);
            self.report = Some(MissionReport {
                mission_id: mission.id.clone(),
                victory,
                elapsed_secs: self.time.elapsed_secs,
                enemies_defeated: summary.enemies_dead,
                terminals_hacked: summary.terminals_hacked,
                rewards: if victory {
                    mission.rewards
                } else {
                    MissionRewards::default()
                },
            });
            log::info!(
                "mission {} ended in {} after {:.1}s",
                mission.id,
                if victory { "victory" } else { "defeat" },
                self.time.elapsed_secs
            );
        }
        self.events.push(SimEvent::MissionEnded { victory });
    }
}

fn set_agent_target(world: &mut World, agent_id: u32, target: Position) -> bool {
    let Some(entity) = world_setup::find_unit(world, agent_id) else {
        return false;
    };
    match world.query_one_mut::<(&Agent, &Health, &mut Mover)>(entity) {
        Ok((_, health, mover)) if health.alive => {
            mover.target = target;
            true
        }
        _ => false,
    }
}

/// Make `agent_id` the only selected agent. Only living agents qualify.
fn select_agent(world: &mut World, agent_id: u32, events: &mut Vec<SimEvent>) -> bool {
    let valid = world
        .query::<(&Agent, &UnitId, &Health)>()
        .iter()
        .any(|(_, (_, id, health))| id.0 == agent_id && health.alive);
    if !valid {
        return false;
    }
    for (_, (agent, id)) in world.query_mut::<(&mut Agent, &UnitId)>() {
        agent.selected = id.0 == agent_id;
    }
    events.push(SimEvent::AgentSelected { agent_id });
    true
}

/// If no living agent is selected, select the first living one by id.
fn ensure_selection(world: &mut World, events: &mut Vec<SimEvent>) {
    if systems::snapshot::selected_agent(world).is_some() {
        return;
    }
    match systems::enemy_ai::living_agents(world).first() {
        Some(&(agent_id, _)) => {
            select_agent(world, agent_id, events);
        }
        None => {
            for (_, agent) in world.query_mut::<&mut Agent>() {
                agent.selected = false;
            }
        }
    }
}
