//! Reward granting.

use serde::{Deserialize, Serialize};

use cyberops_core::constants::WORLD_CONTROL_MAX;
use cyberops_core::mission::MissionRewards;

/// Spendable and strategic resources held by the campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub credits: u64,
    pub research_points: u64,
    /// Percentage of the world under syndicate control, 0..=100.
    pub world_control: f64,
}

impl Resources {
    /// Add a mission's rewards. World control saturates at 100%.
    pub fn grant(&mut self, rewards: &MissionRewards) {
        self.credits += rewards.credits as u64;
        self.research_points += rewards.research_points as u64;
        let gain = if rewards.world_control.is_finite() {
            rewards.world_control.max(0.0)
        } else {
            0.0
        };
        self.world_control = (self.world_control + gain).min(WORLD_CONTROL_MAX);
    }
}
