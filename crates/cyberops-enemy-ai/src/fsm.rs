//! Enemy behaviour finite state machine.
//!
//! Pure functions that compute one tick of enemy behaviour from plain
//! data. No ECS dependency: the simulation builds an `EnemyContext`,
//! applies the returned `EnemyUpdate` and owns all side effects
//! (wall checks, projectile spawning).
//!
//! Every enemy checks every living agent each tick, so the cost grows
//! with enemies x agents. Fine for a few dozen combatants.

use rand::Rng;

use cyberops_core::constants::*;
use cyberops_core::enums::EnemyPosture;
use cyberops_core::types::Position;

/// Input to the FSM for a single living enemy.
pub struct EnemyContext<'a> {
    pub position: Position,
    /// Pursuit target when alerted, wander target otherwise.
    pub target: Position,
    pub alert_level: f64,
    /// Grid units per second.
    pub speed: f64,
    pub vision_range: f64,
    /// Living agents as `(unit id, position)`, sorted by id.
    pub agents: &'a [(u32, Position)],
}

/// Output of the FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyUpdate {
    /// Where the enemy wants to stand after this tick. The caller may
    /// refuse the step if it ends inside a wall.
    pub position: Position,
    pub target: Position,
    pub alert_level: f64,
    pub posture: EnemyPosture,
    /// Agents the enemy opens fire on this tick: `(unit id, aim point)`.
    pub shots: Vec<(u32, Position)>,
}

/// Posture implied by an alert level.
pub fn posture_for(alert_level: f64) -> EnemyPosture {
    if alert_level > 0.0 {
        EnemyPosture::Pursuing
    } else {
        EnemyPosture::Patrolling
    }
}

/// Alert level after one noisy event nearby. Saturates at `ALERT_MAX`.
pub fn raise_alert(alert_level: f64) -> f64 {
    (alert_level + ALERT_RAISE).min(ALERT_MAX)
}

/// Evaluate one tick for one enemy.
///
/// Random draws happen in a fixed order (wander roll, then one fire roll
/// per agent in firing range, in agent order) so a seeded RNG replays
/// identically.
pub fn evaluate<R: Rng + ?Sized>(ctx: &EnemyContext<'_>, rng: &mut R) -> EnemyUpdate {
    let mut update = EnemyUpdate {
        position: ctx.position,
        target: ctx.target,
        alert_level: ctx.alert_level,
        posture: posture_for(ctx.alert_level),
        shots: Vec::new(),
    };

    if !ctx.position.is_finite() {
        return update;
    }
    if !update.target.is_finite() {
        update.target = ctx.position;
    }

    let step = ctx.speed / TICK_RATE as f64;
    if ctx.alert_level > 0.0 {
        pursue(&mut update, step);
    } else {
        wander(&mut update, step, rng);
    }

    spot_and_fire(ctx, &mut update, rng);
    update.posture = posture_for(update.alert_level);
    update
}

fn pursue(update: &mut EnemyUpdate, step: f64) {
    if update.position.distance_to(&update.target) <= ENEMY_ARRIVAL_RADIUS {
        update.alert_level = (update.alert_level - ALERT_DECAY_PER_TICK).max(0.0);
    } else {
        update.position = update.position.step_toward(&update.target, step);
    }
}

fn wander<R: Rng + ?Sized>(update: &mut EnemyUpdate, step: f64, rng: &mut R) {
    if rng.gen_bool(WANDER_CHANCE) {
        // Uniform over the disc around the current position.
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let reach = WANDER_RADIUS * rng.gen::<f64>().sqrt();
        update.target = Position::new(
            update.position.x + reach * angle.cos(),
            update.position.y + reach * angle.sin(),
        );
    } else if update.position.distance_to(&update.target) > ARRIVAL_EPSILON {
        update.position = update
            .position
            .step_toward(&update.target, step * IDLE_SPEED_FACTOR);
    }
}

fn spot_and_fire<R: Rng + ?Sized>(ctx: &EnemyContext<'_>, update: &mut EnemyUpdate, rng: &mut R) {
    for &(agent_id, agent_pos) in ctx.agents {
        if !agent_pos.is_finite() {
            continue;
        }
        let dist = update.position.distance_to(&agent_pos);
        if dist > ctx.vision_range {
            continue;
        }
        update.alert_level = ALERT_MAX;
        update.target = agent_pos;
        if dist <= ENEMY_FIRE_RANGE && rng.gen_bool(ENEMY_FIRE_CHANCE) {
            update.shots.push((agent_id, agent_pos));
        }
    }
}
