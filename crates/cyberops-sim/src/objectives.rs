//! Mission objective tracking.
//!
//! `MissionTracker` is the per-attempt state machine
//! `Active -> Victory | Defeat`. Objective progress is recomputed from a
//! fresh `WorldSummary` every tick rather than from incremental counters.

use cyberops_core::constants::EXTRACTION_RADIUS;
use cyberops_core::enums::MissionStatus;
use cyberops_core::events::SimEvent;
use cyberops_core::mission::{ObjectiveDef, ObjectiveKind};
use cyberops_core::state::ObjectiveView;
use cyberops_core::types::Position;

/// What the tracker needs to know about the world this tick.
#[derive(Debug, Clone, Default)]
pub struct WorldSummary {
    pub living_agents: Vec<Position>,
    pub enemies_total: u32,
    pub enemies_dead: u32,
    pub terminals_total: u32,
    pub terminals_hacked: u32,
}

impl WorldSummary {
    fn agent_at_extraction(&self, extraction: &Position) -> bool {
        self.living_agents
            .iter()
            .any(|p| p.is_finite() && p.distance_to(extraction) <= EXTRACTION_RADIUS)
    }
}

#[derive(Debug, Clone)]
pub struct MissionTracker {
    objectives: Vec<ObjectiveDef>,
    extraction: Position,
    status: MissionStatus,
    progress: Vec<ObjectiveView>,
}

impl MissionTracker {
    pub fn new(objectives: Vec<ObjectiveDef>, extraction: Position) -> Self {
        let progress = objectives
            .iter()
            .map(|o| ObjectiveView {
                id: o.id.clone(),
                current: 0,
                total: 0,
                satisfied: false,
                required: o.required,
            })
            .collect();
        Self {
            objectives,
            extraction,
            status: MissionStatus::Active,
            progress,
        }
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    /// Progress as of the last evaluation.
    pub fn progress(&self) -> &[ObjectiveView] {
        &self.progress
    }

    /// Re-evaluate every objective and the end conditions.
    ///
    /// Pushes an `ObjectiveProgressChanged` event for each objective whose
    /// counter moved. Defeat is checked before victory. Once the status is
    /// terminal it never changes again.
    pub fn evaluate(&mut self, summary: &WorldSummary, events: &mut Vec<SimEvent>) -> MissionStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        for (objective, view) in self.objectives.iter().zip(self.progress.iter_mut()) {
            let (current, total) = measure(&objective.kind, summary, &self.extraction);
            if current != view.current || total != view.total {
                events.push(SimEvent::ObjectiveProgressChanged {
                    objective_id: objective.id.clone(),
                    current,
                    total,
                });
            }
            view.current = current;
            view.total = total;
            view.satisfied = current >= total;
        }

        self.status = if summary.living_agents.is_empty() {
            MissionStatus::Defeat
        } else if self.progress.iter().all(|p| p.satisfied || !p.required)
            && summary.agent_at_extraction(&self.extraction)
        {
            MissionStatus::Victory
        } else {
            MissionStatus::Active
        };
        self.status
    }
}

/// `(current, total)` for one objective.
fn measure(kind: &ObjectiveKind, summary: &WorldSummary, extraction: &Position) -> (u32, u32) {
    match kind {
        ObjectiveKind::EliminateAll => (summary.enemies_dead, summary.enemies_total),
        ObjectiveKind::Eliminate { count } => (summary.enemies_dead.min(*count), *count),
        ObjectiveKind::HackTerminals { count } => {
            let total = count.unwrap_or(summary.terminals_total);
            (summary.terminals_hacked.min(total), total)
        }
        ObjectiveKind::ReachExtraction => (summary.agent_at_extraction(extraction) as u32, 1),
    }
}
