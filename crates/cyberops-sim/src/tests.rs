//! Tests for the simulation engine, abilities, combat flow and mission end.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cyberops_core::commands::TacticalCommand;
use cyberops_core::components::{AttackProfile, Awareness, Health, Mover, UnitId};
use cyberops_core::constants::*;
use cyberops_core::enums::*;
use cyberops_core::events::SimEvent;
use cyberops_core::mission::*;
use cyberops_core::state::{CombatantRole, CombatantView, TacticalSnapshot};
use cyberops_core::types::{GridPoint, Position};
use cyberops_core::MissionDataError;
use cyberops_map::Tile;

use crate::combat::{AttackOutcome, CombatFormulas, DefenseProfile};
use crate::engine::{SimConfig, SimulationEngine};
use crate::systems::alert::alert;
use crate::world_setup::{find_unit, spawn_projectile};

// ---- Fixtures ----

/// Every roll hits for the attacker's base damage.
struct AlwaysHit;

impl CombatFormulas for AlwaysHit {
    fn resolve(
        &self,
        attack: &AttackProfile,
        _defense: &DefenseProfile,
        _rng: &mut dyn RngCore,
    ) -> AttackOutcome {
        AttackOutcome {
            hit: true,
            damage: attack.damage,
            critical: false,
        }
    }
}

/// 20x20 room with a one-cell wall border.
fn bordered_map() -> MapDefinition {
    let size = 20;
    let mut tiles = vec![vec![0u8; size]; size];
    for i in 0..size {
        tiles[0][i] = 1;
        tiles[size - 1][i] = 1;
        tiles[i][0] = 1;
        tiles[i][size - 1] = 1;
    }
    MapDefinition {
        width: size as u32,
        height: size as u32,
        tiles,
        spawn: GridPoint::new(2, 2),
        extraction: GridPoint::new(17, 17),
        terminals: Vec::new(),
    }
}

fn make_templates() -> EnemyTemplates {
    let mut templates = EnemyTemplates::new();
    templates.insert(
        "guard".into(),
        EnemyTemplate {
            kind: "guard".into(),
            health: 50,
            speed: 2.0,
            damage: 10,
            vision_range: 5.0,
            color: "#f00".into(),
            accuracy: 0.7,
        },
    );
    // Stands still and never spots anyone.
    templates.insert(
        "dummy".into(),
        EnemyTemplate {
            kind: "dummy".into(),
            health: 50,
            speed: 0.0,
            damage: 0,
            vision_range: 0.0,
            color: String::new(),
            accuracy: 0.0,
        },
    );
    templates
}

fn enemy(template: &str, x: f64, y: f64) -> EnemySpawn {
    EnemySpawn {
        template: template.into(),
        x,
        y,
    }
}

fn make_mission(enemies: Vec<EnemySpawn>, objectives: Vec<ObjectiveKind>) -> MissionDefinition {
    MissionDefinition {
        id: "op-test".into(),
        name: "Test Op".into(),
        objectives: objectives
            .into_iter()
            .enumerate()
            .map(|(i, kind)| ObjectiveDef {
                id: format!("obj-{i}"),
                kind,
                required: true,
            })
            .collect(),
        enemies,
        map: bordered_map(),
        rewards: MissionRewards {
            credits: 500,
            research_points: 10,
            world_control: 5.0,
        },
    }
}

fn squad(count: usize) -> Vec<AgentLoadout> {
    (0..count)
        .map(|i| AgentLoadout::standard(format!("agent-{i}"), AgentClass::Soldier))
        .collect()
}

fn make_engine(seed: u64) -> SimulationEngine {
    SimulationEngine::with_formulas(
        SimConfig {
            seed,
            ..Default::default()
        },
        Box::new(AlwaysHit),
    )
}

fn start(engine: &mut SimulationEngine, mission: &MissionDefinition, agents: usize) {
    engine
        .start_mission(mission, &make_templates(), &squad(agents))
        .unwrap();
}

fn combatant(snap: &TacticalSnapshot, id: u32) -> &CombatantView {
    snap.combatants.iter().find(|c| c.id == id).unwrap()
}

fn cooldowns(view: &CombatantView) -> [u32; ABILITY_COUNT] {
    match &view.role {
        CombatantRole::Agent { cooldowns, .. } => *cooldowns,
        CombatantRole::Enemy { .. } => panic!("not an agent"),
    }
}

fn alert_level(view: &CombatantView) -> f64 {
    match &view.role {
        CombatantRole::Enemy { alert_level, .. } => *alert_level,
        CombatantRole::Agent { .. } => panic!("not an enemy"),
    }
}

fn health_of(engine: &SimulationEngine, id: u32) -> Health {
    let entity = find_unit(engine.world(), id).unwrap();
    *engine.world().get::<&Health>(entity).unwrap()
}

fn count_projectiles(engine: &SimulationEngine) -> usize {
    engine
        .world()
        .query::<&cyberops_core::components::Projectile>()
        .iter()
        .count()
}

fn fire_at(engine: &mut SimulationEngine, at: Position, damage: u32, hostile: bool) {
    let attack = AttackProfile {
        owner: 99,
        damage,
        accuracy: 1.0,
        crit_chance: 0.0,
    };
    spawn_projectile(engine.world_mut(), at, at, PROJECTILE_SPEED, attack, hostile);
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mission = make_mission(
        vec![enemy("guard", 10.0, 10.0), enemy("guard", 14.0, 5.0)],
        vec![ObjectiveKind::EliminateAll],
    );
    let templates = make_templates();
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    engine_a.start_mission(&mission, &templates, &squad(2)).unwrap();
    engine_b.start_mission(&mission, &templates, &squad(2)).unwrap();

    for tick in 0..600 {
        if tick % 20 == 0 {
            let commands = [
                TacticalCommand::MoveAgentTo {
                    agent_id: 1,
                    x: 9.0,
                    y: 9.0,
                },
                TacticalCommand::UseAbility {
                    agent_id: 1,
                    ability_index: 0,
                    target: None,
                },
            ];
            engine_a.queue_commands(commands.clone());
            engine_b.queue_commands(commands);
        }
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mission = make_mission(
        vec![enemy("guard", 10.0, 10.0), enemy("guard", 14.0, 5.0)],
        vec![ObjectiveKind::EliminateAll],
    );
    let mut engine_a = make_engine(111);
    let mut engine_b = make_engine(222);
    start(&mut engine_a, &mission, 1);
    start(&mut engine_b, &mission, 1);

    // Idle guards wander on random rolls, so positions drift apart.
    let mut diverged = false;
    for _ in 0..1500 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Mission start ----

#[test]
fn test_invalid_mission_keeps_engine_idle() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dragon", 5.0, 5.0)], vec![ObjectiveKind::EliminateAll]);
    let err = engine
        .start_mission(&mission, &make_templates(), &squad(1))
        .unwrap_err();
    assert!(matches!(err, MissionDataError::UnknownEnemyTemplate { .. }));
    assert_eq!(engine.phase(), GamePhase::Idle);
    assert_eq!(engine.world().len(), 0);

    let snap = engine.tick();
    assert_eq!(snap.time.tick, 0, "Idle engine does not advance");
    assert!(snap.mission_id.is_none());
}

#[test]
fn test_start_spawns_squad_and_selects_first() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 10.0, 10.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 2);

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.selected_agent, Some(1));
    assert_eq!(snap.combatants.len(), 3);
    assert_eq!(combatant(&snap, 1).position, Position::new(2.0, 2.0));
    assert_eq!(combatant(&snap, 2).position, Position::new(3.0, 2.0));
    assert!(matches!(combatant(&snap, 3).role, CombatantRole::Enemy { .. }));
    assert!(snap.events.contains(&SimEvent::MissionStarted {
        mission_id: "op-test".into()
    }));
    assert!(snap.events.contains(&SimEvent::AgentSelected { agent_id: 1 }));
    assert_eq!(snap.extraction, Some(GridPoint::new(17, 17)));
    assert_eq!(snap.fog.cells.len(), 400);
}

// ---- Commands ----

#[test]
fn test_pause_freezes_time() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    engine.tick();
    assert_eq!(engine.time().tick, 1);

    engine.queue_command(TacticalCommand::SetPaused { paused: true });
    for _ in 0..10 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Paused);
    }
    assert_eq!(engine.time().tick, 1);

    engine.queue_command(TacticalCommand::SetPaused { paused: false });
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, 2);
}

#[test]
fn test_move_agent_to_target() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    engine.queue_command(TacticalCommand::MoveAgentTo {
        agent_id: 1,
        x: 5.0,
        y: 2.0,
    });

    let snap = engine.tick();
    let moved = combatant(&snap, 1).position;
    assert!((moved.x - (2.0 + 5.0 / TICK_RATE as f64)).abs() < 1e-9);

    let mut snap = snap;
    for _ in 0..60 {
        snap = engine.tick();
    }
    let arrived = combatant(&snap, 1).position;
    assert!(arrived.distance_to(&Position::new(5.0, 2.0)) <= ARRIVAL_EPSILON);
    assert!(arrived.x <= 5.0, "Never overshoots");
}

#[test]
fn test_move_into_wall_is_ignored() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    for (x, y) in [(0.5, 0.5), (f64::NAN, 3.0), (40.0, 3.0)] {
        engine.queue_command(TacticalCommand::MoveAgentTo { agent_id: 1, x, y });
    }
    for _ in 0..30 {
        engine.tick();
    }
    let entity = find_unit(engine.world(), 1).unwrap();
    let mover = *engine.world().get::<&Mover>(entity).unwrap();
    assert_eq!(mover.target, Position::new(2.0, 2.0));
}

#[test]
fn test_motion_stops_at_walls() {
    let mut mission = make_mission(vec![], vec![ObjectiveKind::ReachExtraction]);
    for row in mission.map.tiles.iter_mut().take(19).skip(1) {
        row[5] = 1;
    }
    mission.map.tiles[17][5] = 0;
    let mut engine = make_engine(1);
    start(&mut engine, &mission, 1);

    engine.queue_command(TacticalCommand::MoveAgentTo {
        agent_id: 1,
        x: 8.0,
        y: 2.0,
    });
    for _ in 0..120 {
        engine.tick();
    }
    let entity = find_unit(engine.world(), 1).unwrap();
    let pos = *engine.world().get::<&Position>(entity).unwrap();
    let mover = *engine.world().get::<&Mover>(entity).unwrap();
    assert!(pos.x < 5.0, "Agent crossed the wall: {pos:?}");
    assert_eq!(mover.target, pos, "Blocked step drops the target");
}

#[test]
fn test_select_agent() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 3);
    engine.tick();

    engine.queue_command(TacticalCommand::SelectAgent { agent_id: 3 });
    let snap = engine.tick();
    assert_eq!(snap.selected_agent, Some(3));
    let selected = snap
        .combatants
        .iter()
        .filter(|c| matches!(c.role, CombatantRole::Agent { selected: true, .. }))
        .count();
    assert_eq!(selected, 1);

    engine.queue_command(TacticalCommand::SelectAgent { agent_id: 42 });
    let snap = engine.tick();
    assert_eq!(snap.selected_agent, Some(3), "Unknown agent ignored");
}

// ---- Abilities ----

#[test]
fn test_cooldown_decays_to_zero() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 3,
        target: None,
    });

    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::AbilityUsed {
        agent_id: 1,
        ability: AbilityKind::Shield,
    }));
    let mut last = cooldowns(combatant(&snap, 1))[3];
    assert_eq!(last, SHIELD_COOLDOWN_TICKS - 1);

    for _ in 1..SHIELD_COOLDOWN_TICKS {
        let snap = engine.tick();
        let now = cooldowns(combatant(&snap, 1))[3];
        assert_eq!(now, last - 1);
        last = now;
    }
    assert_eq!(last, 0);

    let snap = engine.tick();
    assert_eq!(cooldowns(combatant(&snap, 1))[3], 0);
}

#[test]
fn test_shield_expires() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 3,
        target: None,
    });
    let snap = engine.tick();
    match &combatant(&snap, 1).role {
        CombatantRole::Agent { shield, .. } => assert_eq!(*shield, SHIELD_AMOUNT),
        _ => unreachable!(),
    }
    assert_eq!(snap.effects.len(), 1);

    let mut snap = snap;
    for _ in 0..SHIELD_DURATION_TICKS {
        snap = engine.tick();
    }
    match &combatant(&snap, 1).role {
        CombatantRole::Agent {
            shield,
            shield_ticks,
            ..
        } => {
            assert_eq!(*shield, 0);
            assert_eq!(*shield_ticks, 0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_ability_requires_selection_and_cooldown() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 2);

    let shield = |agent_id| TacticalCommand::UseAbility {
        agent_id,
        ability_index: 3,
        target: None,
    };
    engine.queue_commands([shield(2), shield(1), shield(1)]);
    let snap = engine.tick();

    let used = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::AbilityUsed { .. }))
        .count();
    assert_eq!(used, 1, "Unselected agent and cooldown both block");
    assert_eq!(cooldowns(combatant(&snap, 2))[3], 0);

    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 7,
        target: None,
    });
    let snap = engine.tick();
    assert!(snap.events.is_empty());
}

#[test]
fn test_shoot_without_target_is_ignored() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 15.0, 15.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 0,
        target: None,
    });
    let snap = engine.tick();
    assert_eq!(cooldowns(combatant(&snap, 1))[0], 0);
    assert_eq!(count_projectiles(&engine), 0);
}

#[test]
fn test_shots_kill_enemy_once() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 8.0, 2.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);

    let mut deaths = 0;
    let mut shots = 0;
    for _ in 0..300 {
        engine.queue_command(TacticalCommand::UseAbility {
            agent_id: 1,
            ability_index: 0,
            target: None,
        });
        let snap = engine.tick();
        for event in &snap.events {
            match event {
                SimEvent::EntityDied { unit_id, faction } => {
                    assert_eq!(*unit_id, 2);
                    assert_eq!(*faction, Faction::Hostile);
                    deaths += 1;
                }
                SimEvent::ShotFired { hostile: false, .. } => shots += 1,
                _ => {}
            }
        }
    }
    // 25 damage per hit against 50 health.
    assert_eq!(shots, 2);
    assert_eq!(deaths, 1);
    let health = health_of(&engine, 2);
    assert_eq!(health.current, 0);
    assert!(!health.alive);
}

#[test]
fn test_gunshot_alerts_nearby_enemies() {
    let mut engine = make_engine(1);
    let mission = make_mission(
        vec![enemy("dummy", 8.0, 2.0), enemy("dummy", 2.0, 16.0)],
        vec![ObjectiveKind::EliminateAll],
    );
    start(&mut engine, &mission, 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 0,
        target: None,
    });
    let snap = engine.tick();
    assert_eq!(alert_level(combatant(&snap, 2)), ALERT_RAISE);
    assert_eq!(alert_level(combatant(&snap, 3)), 0.0, "Out of earshot");
}

#[test]
fn test_repeated_alerts_saturate() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 10.0, 10.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    let center = Position::new(9.0, 10.0);
    for _ in 0..5 {
        assert_eq!(alert(engine.world_mut(), center, 3.0), 1);
    }
    assert_eq!(alert(engine.world_mut(), Position::new(f64::NAN, 0.0), 3.0), 0);
    assert_eq!(alert(engine.world_mut(), Position::new(2.0, 2.0), 3.0), 0);

    let entity = find_unit(engine.world(), 2).unwrap();
    let awareness = *engine.world().get::<&Awareness>(entity).unwrap();
    let mover = *engine.world().get::<&Mover>(entity).unwrap();
    assert_eq!(awareness.alert_level, ALERT_MAX);
    assert_eq!(mover.target, center);
}

#[test]
fn test_projectile_resolves_once() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 12.0, 12.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    fire_at(&mut engine, Position::new(12.0, 12.0), 10, false);
    assert_eq!(count_projectiles(&engine), 1);

    engine.tick();
    assert_eq!(health_of(&engine, 2).current, 40);
    assert_eq!(count_projectiles(&engine), 0);

    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(health_of(&engine, 2).current, 40, "No lingering damage");
}

#[test]
fn test_grenade_detonates_after_fuse() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 6.0, 2.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 1,
        target: Some(Position::new(6.0, 2.5)),
    });

    for _ in 0..GRENADE_FUSE_TICKS {
        let snap = engine.tick();
        assert!(!snap.events.iter().any(|e| matches!(e, SimEvent::Explosion { .. })));
    }
    assert_eq!(health_of(&engine, 2).current, 50);

    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::Explosion { x: 6.0, y: 2.5 }));
    assert!(snap.events.contains(&SimEvent::EntityDied {
        unit_id: 2,
        faction: Faction::Hostile,
    }));
    assert!(snap.effects.iter().any(|e| e.kind == EffectKind::Explosion));
    assert!(health_of(&engine, 1).alive, "Blast only hurts enemies");
}

#[test]
fn test_grenade_out_of_range_ignored() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 15.0, 15.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 1,
        target: Some(Position::new(15.0, 15.0)),
    });
    let snap = engine.tick();
    assert_eq!(cooldowns(combatant(&snap, 1))[1], 0);
}

#[test]
fn test_hack_unlocks_door() {
    let mut mission = make_mission(vec![], vec![ObjectiveKind::HackTerminals { count: None }]);
    mission.map.tiles[5][5] = 1;
    mission.map.terminals.push(TerminalDef {
        x: 4,
        y: 2,
        unlocks: vec![GridPoint::new(5, 5)],
    });
    let mut engine = make_engine(1);
    start(&mut engine, &mission, 1);
    assert_eq!(engine.map().unwrap().tile(GridPoint::new(5, 5)), Some(Tile::Wall));

    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 2,
        target: None,
    });
    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::TerminalHacked { terminal: 0 }));
    assert!(snap.events.contains(&SimEvent::DoorUnlocked { x: 5, y: 5 }));
    assert!(snap.terminals[0].hacked);
    assert_eq!(engine.map().unwrap().tile(GridPoint::new(5, 5)), Some(Tile::Floor));
    assert!(snap.objectives[0].satisfied);
}

// ---- Damage, death, selection ----

#[test]
fn test_shield_absorbs_hostile_fire() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    engine.queue_command(TacticalCommand::UseAbility {
        agent_id: 1,
        ability_index: 3,
        target: None,
    });
    engine.tick();

    fire_at(&mut engine, Position::new(2.0, 2.0), 70, true);
    let snap = engine.tick();
    let agent = combatant(&snap, 1);
    assert_eq!(agent.health, 80, "Spillover past a 50 point shield");
    match &agent.role {
        CombatantRole::Agent { shield, .. } => assert_eq!(*shield, 0),
        _ => unreachable!(),
    }
}

#[test]
fn test_selected_agent_death_moves_selection() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 2);
    engine.tick();

    fire_at(&mut engine, Position::new(1.5, 2.0), 1000, true);
    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::EntityDied {
        unit_id: 1,
        faction: Faction::Squad,
    }));
    assert!(snap.events.contains(&SimEvent::AgentSelected { agent_id: 2 }));
    assert_eq!(snap.selected_agent, Some(2));
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(!combatant(&snap, 1).alive, "Dead agents stay in the roster");
}

#[test]
fn test_defeat_when_squad_dies() {
    let mut engine = make_engine(1);
    start(&mut engine, &make_mission(vec![], vec![ObjectiveKind::ReachExtraction]), 1);
    engine.tick();

    fire_at(&mut engine, Position::new(2.0, 2.0), 1000, true);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Defeat);
    assert!(snap.events.contains(&SimEvent::MissionEnded { victory: false }));
    assert_eq!(snap.selected_agent, None);

    let report = engine.take_report().unwrap();
    assert!(!report.victory);
    assert_eq!(report.rewards, MissionRewards::default());
    assert!(engine.take_report().is_none(), "Report handed out once");

    let time = engine.time();
    for _ in 0..10 {
        let snap = engine.tick();
        assert!(snap.events.is_empty());
    }
    assert_eq!(engine.time().tick, time.tick, "Finished missions stay frozen");
}

#[test]
fn test_abort_discards_state() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 10.0, 10.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 2);
    engine.tick();

    engine.queue_command(TacticalCommand::AbortMission);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Idle);
    assert_eq!(snap.events, vec![SimEvent::MissionAborted]);
    assert!(snap.combatants.is_empty());
    assert_eq!(engine.world().len(), 0);
    assert!(engine.take_report().is_none());

    // A second abort has nothing to discard.
    engine.queue_command(TacticalCommand::AbortMission);
    assert!(engine.tick().events.is_empty());
}

// ---- Enemies and fog ----

#[test]
fn test_enemy_spots_agent_in_vision() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("guard", 6.0, 2.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    let snap = engine.tick();
    let guard = combatant(&snap, 2);
    assert_eq!(alert_level(guard), ALERT_MAX);
    assert!(matches!(
        guard.role,
        CombatantRole::Enemy {
            posture: EnemyPosture::Pursuing,
            ..
        }
    ));
}

#[test]
fn test_fog_follows_agents() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 16.0, 16.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    let snap = engine.tick();
    let cell = |x: usize, y: usize| snap.fog.cells[y * 20 + x];
    assert_eq!(cell(2, 2), Visibility::Visible as u8);
    assert_eq!(cell(16, 16), Visibility::Unexplored as u8);
    match &combatant(&snap, 2).role {
        CombatantRole::Enemy { visible, .. } => assert!(!visible),
        _ => unreachable!(),
    }

    engine.queue_command(TacticalCommand::ToggleFogOfWar { enabled: false });
    let snap = engine.tick();
    assert!(!snap.fog_enabled);
    assert!(snap.fog.cells.iter().all(|&v| v == Visibility::Visible as u8));
    match &combatant(&snap, 2).role {
        CombatantRole::Enemy { visible, .. } => assert!(visible),
        _ => unreachable!(),
    }
}

#[test]
fn test_fog_reenabled_while_paused_shows_squad_view() {
    let mut engine = make_engine(1);
    let mission = make_mission(vec![enemy("dummy", 16.0, 16.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);
    engine.tick();

    engine.queue_commands([
        TacticalCommand::SetPaused { paused: true },
        TacticalCommand::ToggleFogOfWar { enabled: false },
        TacticalCommand::ToggleFogOfWar { enabled: true },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Paused);
    assert!(snap.fog_enabled);
    let cell = |x: usize, y: usize| snap.fog.cells[y * 20 + x];
    assert_eq!(cell(2, 2), Visibility::Visible as u8);
    assert_eq!(cell(5, 3), Visibility::Visible as u8);
    assert_eq!(cell(16, 16), Visibility::Unexplored as u8);
}

// ---- Non-finite state ----

fn corrupt_position(engine: &mut SimulationEngine, id: u32) {
    let entity = find_unit(engine.world(), id).unwrap();
    *engine.world_mut().get::<&mut Position>(entity).unwrap() = Position::new(f64::NAN, f64::NAN);
}

fn assert_finite(value: f64, what: &str) {
    assert!(value.is_finite(), "{what} became non-finite");
}

#[test]
fn test_non_finite_entities_are_isolated() {
    for seed in 0..5 {
        let mut picker = ChaCha8Rng::seed_from_u64(seed);
        let mut engine = make_engine(seed);
        let mission = make_mission(
            vec![
                enemy("guard", 10.0, 3.0),
                enemy("guard", 15.0, 15.0),
                enemy("dummy", 16.0, 5.0),
                enemy("guard", 5.0, 16.0),
            ],
            vec![ObjectiveKind::EliminateAll],
        );
        start(&mut engine, &mission, 4);

        // Agent 2 and guard 5 always stay healthy; the rest are picked per seed.
        let mut broken: Vec<u32> = [1, 3, 4, 6, 7, 8]
            .into_iter()
            .filter(|_| picker.gen_bool(0.5))
            .collect();
        if broken.is_empty() {
            broken.push(1);
        }
        for &id in &broken {
            corrupt_position(&mut engine, id);
        }

        // A healthy agent with an unreachable target drops it.
        let stray = (!broken.contains(&4)).then(|| {
            let entity = find_unit(engine.world(), 4).unwrap();
            engine.world_mut().get::<&mut Mover>(entity).unwrap().target =
                Position::new(f64::INFINITY, 2.0);
            *engine.world().get::<&Position>(entity).unwrap()
        });

        let attack = AttackProfile {
            owner: 99,
            damage: 10,
            accuracy: 1.0,
            crit_chance: 0.0,
        };
        let nowhere = Position::new(f64::NAN, 4.0);
        let far_off = Position::new(4.0, f64::INFINITY);
        spawn_projectile(engine.world_mut(), nowhere, Position::new(5.0, 5.0), 0.5, attack, true);
        spawn_projectile(engine.world_mut(), Position::new(5.0, 5.0), far_off, 0.5, attack, false);

        engine.queue_command(TacticalCommand::MoveAgentTo {
            agent_id: 2,
            x: 8.0,
            y: 2.0,
        });
        let mut snap = engine.tick();
        for _ in 0..90 {
            snap = engine.tick();
        }

        assert_eq!(snap.phase, GamePhase::Active, "seed {seed}");
        for view in &snap.combatants {
            if broken.contains(&view.id) {
                assert!(!view.position.is_finite(), "skipped entities stay where they were");
                continue;
            }
            assert_finite(view.position.x, "combatant x");
            assert_finite(view.position.y, "combatant y");
            if let CombatantRole::Enemy { alert_level, .. } = &view.role {
                assert_finite(*alert_level, "alert level");
            }
        }
        for projectile in &snap.projectiles {
            assert_finite(projectile.position.x, "projectile x");
            assert_finite(projectile.position.y, "projectile y");
            assert_finite(projectile.target.x, "projectile target x");
            assert_finite(projectile.target.y, "projectile target y");
        }

        let walker = combatant(&snap, 2).position;
        assert!(walker.distance_to(&Position::new(8.0, 2.0)) <= ARRIVAL_EPSILON, "seed {seed}");
        assert_eq!(alert_level(combatant(&snap, 5)), ALERT_MAX, "seed {seed}");
        assert_eq!(snap.fog.cells[2 * 20 + 8], Visibility::Visible as u8);

        if let Some(start) = stray {
            let entity = find_unit(engine.world(), 4).unwrap();
            let mover = *engine.world().get::<&Mover>(entity).unwrap();
            assert_eq!(combatant(&snap, 4).position, start);
            assert_eq!(mover.target, start);
        }
    }
}

// ---- Mission end ----

#[test]
fn test_extraction_with_open_objectives_stays_active() {
    let mut engine = make_engine(1);
    let mut mission = make_mission(vec![enemy("dummy", 10.0, 10.0)], vec![ObjectiveKind::EliminateAll]);
    mission.map.extraction = GridPoint::new(3, 2);
    start(&mut engine, &mission, 1);
    for _ in 0..30 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Active);
    }
}

#[test]
fn test_end_to_end_victory() {
    let mut engine = make_engine(7);
    let mission = make_mission(vec![enemy("guard", 10.0, 10.0)], vec![ObjectiveKind::EliminateAll]);
    start(&mut engine, &mission, 1);

    let mut ended = 0;
    let mut final_phase = GamePhase::Active;
    for _ in 0..5000 {
        let snap = engine.tick();
        ended += snap
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::MissionEnded { .. }))
            .count();
        final_phase = snap.phase;
        if snap.phase != GamePhase::Active {
            break;
        }

        let guard = snap
            .combatants
            .iter()
            .find(|c| c.alive && matches!(c.role, CombatantRole::Enemy { .. }));
        match guard {
            Some(guard) => engine.queue_commands([
                TacticalCommand::MoveAgentTo {
                    agent_id: 1,
                    x: guard.position.x,
                    y: guard.position.y,
                },
                TacticalCommand::UseAbility {
                    agent_id: 1,
                    ability_index: 0,
                    target: None,
                },
            ]),
            None => engine.queue_command(TacticalCommand::MoveAgentTo {
                agent_id: 1,
                x: 17.0,
                y: 17.0,
            }),
        }
    }

    assert_eq!(final_phase, GamePhase::Victory);
    assert_eq!(ended, 1);
    let guard = health_of(&engine, 2);
    assert!(guard.current <= 0 && !guard.alive);

    let report = engine.take_report().unwrap();
    assert!(report.victory);
    assert_eq!(report.enemies_defeated, 1);
    assert_eq!(report.rewards.credits, 500);

    let mut campaign = cyberops_campaign::CampaignState::new();
    assert!(campaign.record_outcome(&report));
    assert_eq!(campaign.stats.total_enemies_defeated, 1);
    assert!(campaign.is_completed("op-test"));
}

#[test]
fn test_unit_ids_are_stable() {
    let mut engine = make_engine(1);
    let mission = make_mission(
        vec![enemy("dummy", 10.0, 10.0), enemy("dummy", 12.0, 10.0)],
        vec![ObjectiveKind::EliminateAll],
    );
    start(&mut engine, &mission, 2);
    let mut ids: Vec<u32> = engine
        .world()
        .query::<&UnitId>()
        .iter()
        .map(|(_, id)| id.0)
        .collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}
