//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz). One tick per rendered frame.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Movement ---

/// Distance under which an agent is considered to have reached its target.
pub const ARRIVAL_EPSILON: f64 = 0.1;

/// Distance under which a pursuing enemy is considered to have reached its target.
pub const ENEMY_ARRIVAL_RADIUS: f64 = 0.5;

/// Idle enemies wander at this fraction of their alerted speed.
pub const IDLE_SPEED_FACTOR: f64 = 0.5;

/// Per-tick probability that an idle enemy picks a new wander target.
pub const WANDER_CHANCE: f64 = 0.01;

/// Maximum distance of a new wander target from the current position.
pub const WANDER_RADIUS: f64 = 5.0;

/// Spacing between squad members at the spawn point.
pub const SQUAD_SPAWN_SPACING: f64 = 1.0;

// --- Alert ---

/// Saturation value for enemy alert level.
pub const ALERT_MAX: f64 = 100.0;

/// Alert added to every enemy in range of a noisy action.
pub const ALERT_RAISE: f64 = 50.0;

/// Alert lost per tick by an enemy standing at its pursuit target.
pub const ALERT_DECAY_PER_TICK: f64 = 0.5;

// --- Enemy fire ---

/// Per-tick, per-agent probability that an enemy fires when in range.
pub const ENEMY_FIRE_CHANCE: f64 = 0.02;

/// Maximum distance at which enemies open fire.
pub const ENEMY_FIRE_RANGE: f64 = 5.0;

/// Accuracy used for enemy shots when the template does not specify one.
pub const ENEMY_DEFAULT_ACCURACY: f64 = 0.7;

// --- Projectiles ---

/// Projectile travel per tick (grid units).
pub const PROJECTILE_SPEED: f64 = 0.5;

/// Distance to target at which a projectile resolves.
pub const PROJECTILE_ARRIVAL_RADIUS: f64 = 0.5;

/// Radius around the impact point in which combatants are hit.
pub const PROJECTILE_HIT_RADIUS: f64 = 1.0;

// --- Line of sight / fog ---

/// Ticks a cached LOS result stays valid.
pub const LOS_CACHE_WINDOW_TICKS: u64 = 30;

/// Extra Bresenham steps allowed beyond `dx + dy`.
pub const LOS_STEP_MARGIN: i32 = 10;

/// Base agent vision radius (grid units).
pub const AGENT_VISION_RADIUS: f64 = 8.0;

/// Vision multiplier for the Ghost class.
pub const GHOST_VISION_MULTIPLIER: f64 = 1.5;

// --- Objectives ---

/// An agent within this distance of the extraction point counts as extracted.
pub const EXTRACTION_RADIUS: f64 = 2.0;

// --- Abilities ---

/// Number of ability slots per agent.
pub const ABILITY_COUNT: usize = 4;

pub const SHOOT_COOLDOWN_TICKS: u32 = 60;
pub const SHOOT_RANGE: f64 = 10.0;
/// Radius of the alert raised by a gunshot.
pub const SHOOT_NOISE_RADIUS: f64 = 8.0;

pub const GRENADE_COOLDOWN_TICKS: u32 = 180;
pub const GRENADE_RANGE: f64 = 8.0;
/// Delay between throw and detonation.
pub const GRENADE_FUSE_TICKS: u64 = 60;
pub const GRENADE_BLAST_RADIUS: f64 = 3.0;
pub const GRENADE_DAMAGE: u32 = 50;
pub const GRENADE_NOISE_RADIUS: f64 = 12.0;

pub const HACK_COOLDOWN_TICKS: u32 = 120;
pub const HACK_RANGE: f64 = 3.0;

pub const SHIELD_COOLDOWN_TICKS: u32 = 600;
pub const SHIELD_AMOUNT: i32 = 50;
pub const SHIELD_DURATION_TICKS: u32 = 300;

// --- Effects ---

pub const EXPLOSION_EFFECT_TICKS: u32 = 30;
pub const HACK_EFFECT_TICKS: u32 = 30;
pub const SHIELD_EFFECT_TICKS: u32 = 20;

// --- Combat formulas ---

pub const MIN_HIT_CHANCE: f64 = 0.05;
pub const MAX_HIT_CHANCE: f64 = 0.95;
pub const CRITICAL_MULTIPLIER: f64 = 1.5;
/// Damage rolls land in `base * (1 +- DAMAGE_VARIANCE)`.
pub const DAMAGE_VARIANCE: f64 = 0.2;

// --- Campaign ---

/// World-control percentage cap.
pub const WORLD_CONTROL_MAX: f64 = 100.0;
