//! Combat resolution: hit/damage/critical rolls and damage application.
//!
//! The roll itself is delegated to a `CombatFormulas` implementation
//! injected into the engine, so campaign content (or a test) can swap
//! the maths without touching the systems that call it.

use rand::{Rng, RngCore};

use cyberops_core::components::{AttackProfile, Health, Shield};
use cyberops_core::constants::*;
use cyberops_core::enums::ShieldPolicy;

/// Defender numbers that influence the roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseProfile {
    pub dodge: f64,
}

/// Result of one attack roll. A miss always carries zero damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub hit: bool,
    pub damage: u32,
    pub critical: bool,
}

impl AttackOutcome {
    pub const MISS: AttackOutcome = AttackOutcome {
        hit: false,
        damage: 0,
        critical: false,
    };
}

/// Hit chance, damage roll and critical chance for an attack.
pub trait CombatFormulas {
    fn resolve(
        &self,
        attack: &AttackProfile,
        defense: &DefenseProfile,
        rng: &mut dyn RngCore,
    ) -> AttackOutcome;
}

/// Default formulas: accuracy minus dodge (clamped), a +-20% damage roll
/// and a 1.5x critical multiplier.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormulas;

fn probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl CombatFormulas for StandardFormulas {
    fn resolve(
        &self,
        attack: &AttackProfile,
        defense: &DefenseProfile,
        rng: &mut dyn RngCore,
    ) -> AttackOutcome {
        let hit_chance =
            probability(attack.accuracy - defense.dodge).clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE);
        if !rng.gen_bool(hit_chance) {
            return AttackOutcome::MISS;
        }

        let critical = rng.gen_bool(probability(attack.crit_chance));
        let roll = rng.gen_range(1.0 - DAMAGE_VARIANCE..=1.0 + DAMAGE_VARIANCE);
        let multiplier = if critical { CRITICAL_MULTIPLIER } else { 1.0 };
        let damage = (attack.damage as f64 * roll * multiplier).round().max(0.0) as u32;

        AttackOutcome {
            hit: true,
            damage,
            critical,
        }
    }
}

/// Apply `damage` to a combatant, shield first.
///
/// Returns true only on the alive -> dead transition, so callers can
/// count a kill exactly once. Damage to a dead combatant is a no-op.
pub fn apply_damage(
    health: &mut Health,
    shield: Option<&mut Shield>,
    damage: u32,
    policy: ShieldPolicy,
) -> bool {
    if !health.alive {
        return false;
    }

    let mut remaining = damage.min(i32::MAX as u32) as i32;
    if let Some(shield) = shield {
        if shield.amount > 0 && shield.remaining_ticks > 0 {
            match policy {
                ShieldPolicy::Spillover => {
                    let absorbed = remaining.min(shield.amount);
                    shield.amount -= absorbed;
                    remaining -= absorbed;
                }
                ShieldPolicy::AbsorbAll => {
                    shield.amount = (shield.amount - remaining).max(0);
                    remaining = 0;
                }
            }
            if shield.amount == 0 {
                shield.remaining_ticks = 0;
            }
        }
    }

    health.current = (health.current - remaining).clamp(0, health.max);
    if health.current == 0 {
        health.alive = false;
        return true;
    }
    false
}
