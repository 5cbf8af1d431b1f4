//! Persistent campaign state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use cyberops_core::mission::MissionReport;

use crate::rewards::Resources;

/// Running totals across the whole campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub total_play_time_secs: f64,
    pub total_enemies_defeated: u32,
    pub total_terminals_hacked: u32,
    pub missions_won: u32,
    pub missions_failed: u32,
}

/// Campaign progress that survives across missions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignState {
    pub resources: Resources,
    pub completed_missions: BTreeSet<String>,
    pub stats: CampaignStats,
}

impl CampaignState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, mission_id: &str) -> bool {
        self.completed_missions.contains(mission_id)
    }

    /// Fold one finished attempt into the campaign.
    ///
    /// A victory accumulates play time and kills, marks the mission
    /// completed and grants its rewards (again, on a replay). A defeat only
    /// counts the failed attempt. Returns true when the mission was
    /// completed for the first time.
    pub fn record_outcome(&mut self, report: &MissionReport) -> bool {
        if !report.victory {
            self.stats.missions_failed += 1;
            log::info!("mission {} failed", report.mission_id);
            return false;
        }

        self.stats.missions_won += 1;
        if report.elapsed_secs.is_finite() && report.elapsed_secs > 0.0 {
            self.stats.total_play_time_secs += report.elapsed_secs;
        }
        self.stats.total_enemies_defeated += report.enemies_defeated;
        self.stats.total_terminals_hacked += report.terminals_hacked;
        self.resources.grant(&report.rewards);

        let first_time = self.completed_missions.insert(report.mission_id.clone());
        log::info!(
            "mission {} won (first completion: {first_time}), credits now {}",
            report.mission_id,
            self.resources.credits
        );
        first_time
    }
}
