//! Memory game engine.
//!
//! Sends the whole answer first (`MEM:<digits>`), then reveals one digit at a
//! time: lead-in, then hold/gap pairs, then `MEMDONE`. Not interruptible.

use crate::effect::{self, Effect};
use crate::rng::SimpleRng;
use crate::types::{
    reveal_hold_ms, Digits, DisplayOp, Event, Glyph, Level, MEMORY_GAP_MS, MEMORY_LEAD_IN_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryPhase {
    LeadIn,
    /// Digit at this index is on screen.
    Showing(usize),
    /// Blank gap after the digit at this index.
    Gap(usize),
}

#[derive(Debug, Clone)]
pub struct MemoryRound {
    digits: Digits,
    hold_ms: u64,
    phase: MemoryPhase,
    due_at: u64,
}

impl MemoryRound {
    pub(crate) fn start(
        level: Level,
        now: u64,
        rng: &mut SimpleRng,
        out: &mut Vec<Effect>,
    ) -> Self {
        let digits: Digits = (0..level.get()).map(|_| rng.digit()).collect();
        effect::send(out, Event::MemorySequence(digits.clone()));
        Self {
            hold_ms: reveal_hold_ms(level.get()),
            digits,
            phase: MemoryPhase::LeadIn,
            due_at: now + MEMORY_LEAD_IN_MS,
        }
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn hold_ms(&self) -> u64 {
        self.hold_ms
    }

    pub fn phase(&self) -> MemoryPhase {
        self.phase
    }

    pub fn due_at(&self) -> u64 {
        self.due_at
    }

    /// Fire the current deadline. Returns true once the reveal is complete.
    pub(crate) fn on_timer(&mut self, at: u64, out: &mut Vec<Effect>) -> bool {
        match self.phase {
            MemoryPhase::LeadIn => {
                self.reveal(0, at, out);
                false
            }
            MemoryPhase::Showing(i) => {
                effect::show(out, DisplayOp::Clear);
                self.phase = MemoryPhase::Gap(i);
                self.due_at = at + MEMORY_GAP_MS;
                false
            }
            MemoryPhase::Gap(i) if i + 1 < self.digits.len() => {
                self.reveal(i + 1, at, out);
                false
            }
            MemoryPhase::Gap(_) => {
                effect::send(out, Event::MemoryDone);
                effect::glyph(out, Glyph::SmallSquare);
                true
            }
        }
    }

    fn reveal(&mut self, index: usize, at: u64, out: &mut Vec<Effect>) {
        effect::show(out, DisplayOp::Digit(self.digits[index]));
        self.phase = MemoryPhase::Showing(index);
        self.due_at = at + self.hold_ms;
    }
}
