//! Session - the long-lived context shared by the engines and the shake detector.
//!
//! Fields are private; the crate-visible mutators are the only writers, so each
//! field keeps a single writer role:
//!
//! - `activity`: the controller (round start and round end)
//! - `armed_at`: the reaction engine, at flash time
//! - `game_finished`: set by the end of a reaction round, cleared by a new
//!   round or consumed by the shake detector

/// Which engine currently owns the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Reaction,
    Memory,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    activity: Activity,
    armed_at: Option<u64>,
    game_finished: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_idle(&self) -> bool {
        self.activity == Activity::Idle
    }

    /// Timestamp captured right before the flash of the current reaction round.
    pub fn armed_at(&self) -> Option<u64> {
        self.armed_at
    }

    pub fn game_finished(&self) -> bool {
        self.game_finished
    }

    pub(crate) fn begin(&mut self, activity: Activity) {
        debug_assert!(self.is_idle(), "round started while {:?}", self.activity);
        self.activity = activity;
        self.armed_at = None;
        self.game_finished = false;
    }

    pub(crate) fn arm(&mut self, at: u64) {
        debug_assert_eq!(self.activity, Activity::Reaction);
        self.armed_at = Some(at);
    }

    pub(crate) fn finish_reaction(&mut self) {
        self.activity = Activity::Idle;
        self.armed_at = None;
        self.game_finished = true;
    }

    pub(crate) fn finish_memory(&mut self) {
        self.activity = Activity::Idle;
    }

    /// Clear `game_finished`, returning whether it was set.
    pub(crate) fn consume_finished(&mut self) -> bool {
        std::mem::take(&mut self.game_finished)
    }
}
