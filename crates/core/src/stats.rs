//! In-memory round counters (reset on power cycle).

use crate::reaction::Outcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub reaction_rounds: u32,
    pub early_exits: u32,
    pub measured: u32,
    pub last_reaction_ms: Option<u64>,
    pub best_reaction_ms: Option<u64>,
    pub memory_rounds: u32,
    pub memory_completed: u32,
    pub shakes: u32,
}

impl Stats {
    pub(crate) fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Early => self.early_exits += 1,
            Outcome::Measured(ms) => {
                self.measured += 1;
                self.last_reaction_ms = Some(ms);
                self.best_reaction_ms = Some(self.best_reaction_ms.map_or(ms, |b| b.min(ms)));
            }
        }
    }
}
