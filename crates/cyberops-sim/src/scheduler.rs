//! Delayed-effect queue.
//!
//! Timed gameplay effects (grenade fuses) are stored as data keyed by the
//! tick they fall due and drained at the start of that tick, so replays
//! with the same seed and commands stay identical.

use std::collections::BTreeMap;

use cyberops_core::types::Position;

/// Something that happens a fixed number of ticks after it was queued.
#[derive(Debug, Clone, PartialEq)]
pub enum DelayedAction {
    Detonate {
        /// `UnitId` of the thrower.
        owner: u32,
        center: Position,
        radius: f64,
        damage: u32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EffectScheduler {
    /// Keyed by `(due_tick, sequence)`; the sequence keeps same-tick
    /// actions in the order they were queued.
    pending: BTreeMap<(u64, u64), DelayedAction>,
    next_sequence: u64,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_tick: u64, action: DelayedAction) {
        self.pending.insert((due_tick, self.next_sequence), action);
        self.next_sequence += 1;
    }

    /// Remove and return every action due at or before `tick`, oldest first.
    pub fn drain_due(&mut self, tick: u64) -> Vec<DelayedAction> {
        let later = match tick.checked_add(1) {
            Some(next) => self.pending.split_off(&(next, 0)),
            None => BTreeMap::new(),
        };
        std::mem::replace(&mut self.pending, later)
            .into_values()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
