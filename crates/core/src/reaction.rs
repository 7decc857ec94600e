//! Reaction game engine.
//!
//! Phases: `Countdown` ("3", "2", "1") → `RandomWait` → `Armed` →
//! `Feedback` (after `EARLY` or `RT:<ms>`) → done. Each timed phase carries a
//! deadline that the controller fires in time order; presses reach the round
//! only through the input arbiter.

use crate::effect::{self, Effect};
use crate::rng::SimpleRng;
use crate::session::Session;
use crate::types::{
    DisplayOp, Event, Glyph, COUNTDOWN_FROM, COUNTDOWN_STEP_MS, EARLY_FEEDBACK_MS,
    RESULT_FEEDBACK_MS, WAIT_MAX_MS, WAIT_MIN_MS,
};

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Early,
    /// Reaction time in milliseconds.
    Measured(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionPhase {
    /// Showing the given countdown digit.
    Countdown(u8),
    /// Between `WAIT` and the flash; a press here is early.
    RandomWait,
    /// Flashed; the next press is measured.
    Armed,
    /// Outcome glyph on screen until the deadline.
    Feedback(Outcome),
}

/// Result of firing a round's deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Done(Outcome),
}

#[derive(Debug, Clone)]
pub struct ReactionRound {
    phase: ReactionPhase,
    wait_ms: u64,
    flashed_at: Option<u64>,
    due_at: Option<u64>,
}

impl ReactionRound {
    /// Begin the countdown at `now`. The random wait is drawn up front.
    pub(crate) fn start(now: u64, rng: &mut SimpleRng, out: &mut Vec<Effect>) -> Self {
        let wait_ms = rng.range_inclusive(WAIT_MIN_MS, WAIT_MAX_MS);
        effect::show(out, DisplayOp::Digit(COUNTDOWN_FROM));
        Self {
            phase: ReactionPhase::Countdown(COUNTDOWN_FROM),
            wait_ms,
            flashed_at: None,
            due_at: Some(now + COUNTDOWN_STEP_MS),
        }
    }

    pub fn phase(&self) -> ReactionPhase {
        self.phase
    }

    /// Randomized delay between `WAIT` and the flash.
    pub fn wait_ms(&self) -> u64 {
        self.wait_ms
    }

    pub fn flashed_at(&self) -> Option<u64> {
        self.flashed_at
    }

    pub fn due_at(&self) -> Option<u64> {
        self.due_at
    }

    /// Fire the current deadline, which fell at `at`.
    pub(crate) fn on_timer(&mut self, at: u64, session: &mut Session, out: &mut Vec<Effect>) -> Step {
        match self.phase {
            ReactionPhase::Countdown(n) if n > 1 => {
                let next = n - 1;
                effect::show(out, DisplayOp::Digit(next));
                self.phase = ReactionPhase::Countdown(next);
                self.due_at = Some(at + COUNTDOWN_STEP_MS);
                Step::Continue
            }
            ReactionPhase::Countdown(_) => {
                effect::show(out, DisplayOp::Clear);
                effect::send(out, Event::Wait);
                self.phase = ReactionPhase::RandomWait;
                self.due_at = Some(at + self.wait_ms);
                Step::Continue
            }
            ReactionPhase::RandomWait => {
                // Timestamp first, then flash: the capture must not trail the flash.
                session.arm(at);
                self.flashed_at = Some(at);
                effect::show(out, DisplayOp::Flash);
                effect::send(out, Event::Go);
                self.phase = ReactionPhase::Armed;
                self.due_at = None;
                Step::Continue
            }
            ReactionPhase::Armed => {
                self.due_at = None;
                Step::Continue
            }
            ReactionPhase::Feedback(outcome) => {
                effect::show(out, DisplayOp::Clear);
                self.due_at = None;
                Step::Done(outcome)
            }
        }
    }

    /// Press landed inside the random wait.
    pub(crate) fn exit_early(&mut self, at: u64, out: &mut Vec<Effect>) {
        debug_assert_eq!(self.phase, ReactionPhase::RandomWait);
        effect::send(out, Event::Early);
        effect::glyph(out, Glyph::No);
        self.phase = ReactionPhase::Feedback(Outcome::Early);
        self.due_at = Some(at + EARLY_FEEDBACK_MS);
    }

    /// Press landed after the flash.
    pub(crate) fn complete(&mut self, at: u64, reaction_ms: u64, out: &mut Vec<Effect>) {
        debug_assert_eq!(self.phase, ReactionPhase::Armed);
        effect::send(out, Event::ReactionTime(reaction_ms));
        effect::glyph(out, Glyph::Yes);
        self.phase = ReactionPhase::Feedback(Outcome::Measured(reaction_ms));
        self.due_at = Some(at + RESULT_FEEDBACK_MS);
    }
}
