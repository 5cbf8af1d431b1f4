//! mission-runner: play a mission headlessly with a scripted squad.
//!
//! Usage:
//!   mission-runner run missions/training.json --ticks 20000
//!   mission-runner validate missions/training.json --templates enemies.json

mod autopilot;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use cyberops_campaign::CampaignState;
use cyberops_core::constants::TICK_RATE;
use cyberops_core::enums::{AgentClass, GamePhase};
use cyberops_core::events::SimEvent;
use cyberops_core::mission::{templates_from_json, AgentLoadout, EnemyTemplates, MissionDefinition};
use cyberops_enemy_ai::profiles::builtin_templates;
use cyberops_sim::{SimConfig, SimulationEngine};

/// Ten minutes of game time.
const DEFAULT_TICKS: u64 = TICK_RATE as u64 * 600;
const DEFAULT_SQUAD: usize = 3;
const SQUAD_CLASSES: [AgentClass; 4] = [
    AgentClass::Soldier,
    AgentClass::Hacker,
    AgentClass::Ghost,
    AgentClass::Heavy,
];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "validate" => cmd_validate(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "mission-runner: CyberOps headless mission player\n\
         \n\
         Commands:\n\
         \n\
         run       Play a mission with the scripted squad and print the outcome\n\
         \n\
           <mission.json>       Mission definition\n\
           --templates <path>   Enemy template list (default: stock templates)\n\
           --config <path>      Simulation config JSON (optional)\n\
           --seed <N>           Override the config seed\n\
           --ticks <N>          Give up after N ticks (default: {DEFAULT_TICKS})\n\
           --squad <N>          Squad size (default: {DEFAULT_SQUAD})\n\
         \n\
         validate  Check a mission against its templates without playing it\n\
         \n\
           <mission.json>       Mission definition\n\
           --templates <path>   Enemy template list (default: stock templates)\n\
         \n\
         Examples:\n\
         \n\
           mission-runner run tools/mission-runner/missions/training.json --seed 7\n\
           mission-runner validate tools/mission-runner/missions/training.json\n"
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match parse_flag(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: {flag} expects a number, got {raw:?}");
                process::exit(1);
            }
        },
        None => default,
    }
}

/// First argument that is neither a flag nor a flag's value.
fn parse_mission_path(args: &[String]) -> Option<PathBuf> {
    let mut i = 0;
    while i < args.len() {
        if args[i].starts_with("--") {
            i += 2;
            continue;
        }
        return Some(PathBuf::from(&args[i]));
    }
    None
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn load_mission(args: &[String]) -> MissionDefinition {
    let Some(path) = parse_mission_path(args) else {
        eprintln!("Error: <mission.json> is required");
        process::exit(1);
    };
    match MissionDefinition::from_json(&read_file(&path)) {
        Ok(def) => def,
        Err(e) => {
            eprintln!("Error in {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn load_templates(args: &[String]) -> EnemyTemplates {
    let Some(path) = parse_flag(args, "--templates").map(PathBuf::from) else {
        return builtin_templates();
    };
    match templates_from_json(&read_file(&path)) {
        Ok(templates) => templates,
        Err(e) => {
            eprintln!("Error in {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn load_config(args: &[String]) -> SimConfig {
    let mut config = match parse_flag(args, "--config").map(PathBuf::from) {
        Some(path) => match serde_json::from_str(&read_file(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error in {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    config.seed = parse_number(args, "--seed", config.seed);
    config
}

fn build_squad(size: usize) -> Vec<AgentLoadout> {
    (0..size)
        .map(|i| {
            let class = SQUAD_CLASSES[i % SQUAD_CLASSES.len()];
            AgentLoadout::standard(format!("Operative-{}", i + 1), class)
        })
        .collect()
}

// --- Validate command ---

fn cmd_validate(args: &[String]) {
    let def = load_mission(args);
    let templates = load_templates(args);
    let squad = build_squad(DEFAULT_SQUAD);
    match def.validate(&templates, &squad) {
        Ok(()) => println!(
            "{}: ok ({}x{} map, {} enemies, {} objectives, {} terminals)",
            def.id,
            def.map.width,
            def.map.height,
            def.enemies.len(),
            def.objectives.len(),
            def.map.terminals.len()
        ),
        Err(e) => {
            eprintln!("{}: {e}", def.id);
            process::exit(1);
        }
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let def = load_mission(args);
    let templates = load_templates(args);
    let config = load_config(args);
    let max_ticks: u64 = parse_number(args, "--ticks", DEFAULT_TICKS);
    let squad = build_squad(parse_number(args, "--squad", DEFAULT_SQUAD));

    let mut engine = SimulationEngine::new(config);
    if let Err(e) = engine.start_mission(&def, &templates, &squad) {
        eprintln!("Error: mission {} rejected: {e}", def.id);
        process::exit(1);
    }

    let mut snap = engine.tick();
    while snap.phase == GamePhase::Active && snap.time.tick < max_ticks {
        log_events(&snap.events, snap.time.tick);
        engine.queue_commands(autopilot::plan(&snap));
        snap = engine.tick();
    }
    log_events(&snap.events, snap.time.tick);

    let Some(report) = engine.take_report() else {
        println!(
            "{}: no result after {} ticks ({:.1}s)",
            def.id, snap.time.tick, snap.time.elapsed_secs
        );
        for objective in &snap.objectives {
            println!("  {} {}/{}", objective.id, objective.current, objective.total);
        }
        process::exit(2);
    };

    println!(
        "{}: {} in {:.1}s, {} enemies defeated, {} terminals hacked",
        report.mission_id,
        if report.victory { "VICTORY" } else { "DEFEAT" },
        report.elapsed_secs,
        report.enemies_defeated,
        report.terminals_hacked
    );

    let mut campaign = CampaignState::new();
    campaign.record_outcome(&report);
    match serde_json::to_string_pretty(&campaign) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing campaign state: {e}"),
    }
}

fn log_events(events: &[SimEvent], tick: u64) {
    for event in events {
        match event {
            SimEvent::EntityDied { .. }
            | SimEvent::TerminalHacked { .. }
            | SimEvent::DoorUnlocked { .. }
            | SimEvent::ObjectiveProgressChanged { .. }
            | SimEvent::MissionEnded { .. } => log::info!("[{tick}] {event:?}"),
            _ => log::debug!("[{tick}] {event:?}"),
        }
    }
}
