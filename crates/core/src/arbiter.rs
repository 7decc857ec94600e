//! Input arbiter: both buttons collapse into one logical confirm, which is
//! resolved against the reaction round's current phase.

use crate::reaction::{ReactionPhase, ReactionRound};
use crate::session::Session;
use crate::types::ButtonId;

/// A press from either button. Which button fired is kept only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirm {
    pub source: ButtonId,
    pub at: u64,
}

impl Confirm {
    pub fn new(source: ButtonId, at: u64) -> Self {
        Self { source, at }
    }
}

/// What a confirm means right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Pressed during the random wait.
    Early,
    /// Pressed after the flash; carries the reaction time in ms.
    Measured(u64),
    Ignored,
}

/// Resolve a confirm against the active reaction round, if any.
///
/// Callers must have fired every deadline up to `confirm.at` first, so the
/// phase seen here already reflects a wait timer that expired earlier.
pub fn resolve(confirm: Confirm, round: Option<&ReactionRound>, session: &Session) -> Resolution {
    let Some(round) = round else {
        return Resolution::Ignored;
    };
    match round.phase() {
        ReactionPhase::RandomWait => Resolution::Early,
        ReactionPhase::Armed => match session.armed_at() {
            Some(armed_at) => Resolution::Measured(confirm.at.saturating_sub(armed_at)),
            None => Resolution::Ignored,
        },
        ReactionPhase::Countdown(_) | ReactionPhase::Feedback(_) => Resolution::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;
    use crate::session::Activity;

    fn round_in_wait() -> (ReactionRound, Session) {
        let mut session = Session::new();
        session.begin(Activity::Reaction);
        let mut out = Vec::new();
        let mut round = ReactionRound::start(0, &mut SimpleRng::new(5), &mut out);
        for t in [1000, 2000, 3000] {
            round.on_timer(t, &mut session, &mut out);
        }
        (round, session)
    }

    #[test]
    fn no_round_is_ignored() {
        let session = Session::new();
        assert_eq!(
            resolve(Confirm::new(ButtonId::A, 10), None, &session),
            Resolution::Ignored
        );
    }

    #[test]
    fn both_buttons_resolve_the_same() {
        let (round, session) = round_in_wait();
        for button in [ButtonId::A, ButtonId::B] {
            assert_eq!(
                resolve(Confirm::new(button, 3500), Some(&round), &session),
                Resolution::Early
            );
        }
    }

    #[test]
    fn press_after_flash_is_measured_from_armed_at() {
        let (mut round, mut session) = round_in_wait();
        let flash_at = 3000 + round.wait_ms();
        round.on_timer(flash_at, &mut session, &mut Vec::new());

        assert_eq!(
            resolve(Confirm::new(ButtonId::B, flash_at + 237), Some(&round), &session),
            Resolution::Measured(237)
        );
    }

    #[test]
    fn countdown_press_is_not_checked() {
        let mut session = Session::new();
        session.begin(Activity::Reaction);
        let round = ReactionRound::start(0, &mut SimpleRng::new(5), &mut Vec::new());
        assert_eq!(
            resolve(Confirm::new(ButtonId::A, 400), Some(&round), &session),
            Resolution::Ignored
        );
    }
}
