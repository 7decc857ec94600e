//! Game controller - owns the session and routes every input.
//!
//! The controller is the single ordered event queue of the device. Each entry
//! point first fires all deadlines up to its own timestamp (timers due at the
//! same instant fire first), then handles its input. A press and the wait
//! timer can therefore never both claim a reaction round.
//!
//! Drivers keep time in milliseconds, sleep until [`Controller::next_deadline`]
//! or the next input, and pass every input with its arrival time.

use tracing::{debug, info, trace};

use crate::arbiter::{self, Confirm, Resolution};
use crate::effect::{self, Effect};
use crate::memory::MemoryRound;
use crate::reaction::{ReactionRound, Step};
use crate::rng::SimpleRng;
use crate::session::{Activity, Session};
use crate::shake::{Accelerometer, ShakeDetector};
use crate::stats::Stats;
use crate::types::{ButtonId, Command, DisplayOp, Event, Glyph, Level, SHAKE_ACK_MS, SHAKE_SETTLE_MS};

/// Inputs delivered by the transport and the button interrupts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Button(ButtonId),
    Connected,
    Disconnected,
}

/// Restart indicator shown after a shake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShakeIndicator {
    Showing { until: u64 },
    Settling { until: u64 },
}

impl ShakeIndicator {
    fn until(self) -> u64 {
        match self {
            ShakeIndicator::Showing { until } | ShakeIndicator::Settling { until } => until,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    session: Session,
    reaction: Option<ReactionRound>,
    memory: Option<MemoryRound>,
    shake: ShakeDetector,
    indicator: Option<ShakeIndicator>,
    rng: SimpleRng,
    stats: Stats,
    now_ms: u64,
}

impl Controller {
    pub fn new(seed: u32) -> Self {
        Self::with_shake_detector(seed, ShakeDetector::new())
    }

    pub fn with_shake_detector(seed: u32, shake: ShakeDetector) -> Self {
        Self {
            session: Session::new(),
            reaction: None,
            memory: None,
            shake,
            indicator: None,
            rng: SimpleRng::new(seed),
            stats: Stats::default(),
            now_ms: 0,
        }
    }

    /// Power-on indicator.
    pub fn boot(&mut self, out: &mut Vec<Effect>) {
        effect::glyph(out, Glyph::Heart);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reaction(&self) -> Option<&ReactionRound> {
        self.reaction.as_ref()
    }

    pub fn memory(&self) -> Option<&MemoryRound> {
        self.memory.as_ref()
    }

    pub fn shake_detector(&self) -> &ShakeDetector {
        &self.shake
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Latest time the controller has processed.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        let round = match (&self.reaction, &self.memory) {
            (Some(r), _) => r.due_at(),
            (None, Some(m)) => Some(m.due_at()),
            (None, None) => None,
        };
        let indicator = self.indicator.map(ShakeIndicator::until);
        match (round, indicator) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire every deadline at or before `now`, in time order.
    ///
    /// Time never runs backwards: an older `now` is treated as the latest
    /// processed time. Returns the effective time.
    pub fn advance(&mut self, now: u64, out: &mut Vec<Effect>) -> u64 {
        let now = now.max(self.now_ms);
        while let Some(due) = self.next_deadline() {
            if due > now {
                break;
            }
            self.now_ms = due;
            self.fire(due, out);
        }
        self.now_ms = now;
        now
    }

    /// Handle one input that arrived at `now`.
    pub fn handle(&mut self, input: Input, now: u64, out: &mut Vec<Effect>) {
        let now = self.advance(now, out);
        match input {
            Input::Command(cmd) => self.dispatch(cmd, now, out),
            Input::Button(button) => self.confirm(Confirm::new(button, now), out),
            Input::Connected => {
                info!("host connected");
                effect::glyph(out, Glyph::Yes);
            }
            Input::Disconnected => {
                info!("host disconnected");
                effect::glyph(out, Glyph::No);
            }
        }
    }

    /// Start a memory round from an unchecked level. Levels outside 1..=12
    /// are ignored. Returns whether a round started.
    pub fn request_memory(&mut self, level: u32, now: u64, out: &mut Vec<Effect>) -> bool {
        let Some(level) = Level::new(level) else {
            debug!(level, "memory level out of range, ignored");
            return false;
        };
        let now = self.advance(now, out);
        self.start_memory(level, now, out)
    }

    /// Periodic shake check. Reads the sensor only while a finished reaction
    /// round is waiting for a restart.
    pub fn shake_tick(&mut self, now: u64, sensor: &mut dyn Accelerometer, out: &mut Vec<Effect>) {
        let now = self.advance(now, out);
        if self.indicator.is_some() || !self.session.is_idle() {
            return;
        }
        if self.shake.poll(now, &mut self.session, sensor) {
            info!(at = now, "shake restart");
            self.stats.shakes += 1;
            effect::send(out, Event::Shake);
            effect::glyph(out, Glyph::Diamond);
            self.indicator = Some(ShakeIndicator::Showing {
                until: now + SHAKE_ACK_MS,
            });
        }
    }

    fn dispatch(&mut self, cmd: Command, now: u64, out: &mut Vec<Effect>) {
        match cmd {
            Command::Ping => effect::send(out, Event::Pong),
            Command::Start => {
                self.start_reaction(now, out);
            }
            Command::Memory(level) => {
                self.start_memory(level, now, out);
            }
        }
    }

    fn start_reaction(&mut self, now: u64, out: &mut Vec<Effect>) -> bool {
        if !self.session.is_idle() {
            debug!(activity = ?self.session.activity(), "START ignored, round in progress");
            return false;
        }
        self.indicator = None;
        self.session.begin(Activity::Reaction);
        let round = ReactionRound::start(now, &mut self.rng, out);
        debug!(at = now, wait_ms = round.wait_ms(), "reaction round started");
        self.reaction = Some(round);
        self.stats.reaction_rounds += 1;
        true
    }

    fn start_memory(&mut self, level: Level, now: u64, out: &mut Vec<Effect>) -> bool {
        if !self.session.is_idle() {
            debug!(activity = ?self.session.activity(), "MEMORY ignored, round in progress");
            return false;
        }
        self.indicator = None;
        self.session.begin(Activity::Memory);
        self.memory = Some(MemoryRound::start(level, now, &mut self.rng, out));
        debug!(at = now, level = level.get(), "memory round started");
        self.stats.memory_rounds += 1;
        true
    }

    fn confirm(&mut self, confirm: Confirm, out: &mut Vec<Effect>) {
        let resolution = arbiter::resolve(confirm, self.reaction.as_ref(), &self.session);
        trace!(button = ?confirm.source, at = confirm.at, ?resolution, "confirm");
        let Some(round) = self.reaction.as_mut() else {
            return;
        };
        match resolution {
            Resolution::Early => round.exit_early(confirm.at, out),
            Resolution::Measured(ms) => round.complete(confirm.at, ms, out),
            Resolution::Ignored => {}
        }
    }

    fn fire(&mut self, at: u64, out: &mut Vec<Effect>) {
        if let Some(round) = self.reaction.as_mut() {
            if round.due_at() == Some(at) {
                trace!(at, phase = ?round.phase(), "reaction timer");
                if let Step::Done(outcome) = round.on_timer(at, &mut self.session, out) {
                    info!(?outcome, "reaction round finished");
                    self.reaction = None;
                    self.session.finish_reaction();
                    self.stats.record_outcome(outcome);
                }
                return;
            }
        }

        if let Some(round) = self.memory.as_mut() {
            if round.due_at() == at {
                trace!(at, phase = ?round.phase(), "memory timer");
                if round.on_timer(at, out) {
                    info!(digits = round.digits().len(), "memory reveal finished");
                    self.memory = None;
                    self.session.finish_memory();
                    self.stats.memory_completed += 1;
                }
                return;
            }
        }

        match self.indicator {
            Some(ShakeIndicator::Showing { until }) if until == at => {
                effect::show(out, DisplayOp::Clear);
                self.indicator = Some(ShakeIndicator::Settling {
                    until: at + SHAKE_SETTLE_MS,
                });
            }
            Some(ShakeIndicator::Settling { until }) if until == at => {
                self.indicator = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::ReactionPhase;
    use crate::types::Sample;

    fn events(out: &[Effect]) -> Vec<Event> {
        out.iter().filter_map(Effect::event).cloned().collect()
    }

    #[test]
    fn ping_answers_even_mid_round() {
        let mut c = Controller::new(1);
        let mut out = Vec::new();
        c.handle(Input::Command(Command::Start), 0, &mut out);
        out.clear();
        c.handle(Input::Command(Command::Ping), 1500, &mut out);
        assert_eq!(events(&out), vec![Event::Pong]);
    }

    #[test]
    fn start_while_busy_is_ignored() {
        let mut c = Controller::new(1);
        let mut out = Vec::new();
        c.handle(Input::Command(Command::Start), 0, &mut out);
        let wait = c.reaction().unwrap().wait_ms();

        out.clear();
        c.handle(Input::Command(Command::Start), 500, &mut out);
        c.handle(
            Input::Command(Command::Memory(Level::new(3).unwrap())),
            600,
            &mut out,
        );
        assert!(out.is_empty());
        assert_eq!(c.reaction().unwrap().wait_ms(), wait);
        assert!(c.memory().is_none());
        assert_eq!(c.stats().reaction_rounds, 1);
    }

    #[test]
    fn deadline_tracks_active_round() {
        let mut c = Controller::new(1);
        let mut out = Vec::new();
        assert_eq!(c.next_deadline(), None);
        c.handle(Input::Command(Command::Start), 100, &mut out);
        assert_eq!(c.next_deadline(), Some(1100));
    }

    #[test]
    fn press_on_the_deadline_loses_to_the_timer() {
        let mut c = Controller::new(11);
        let mut out = Vec::new();
        c.handle(Input::Command(Command::Start), 0, &mut out);
        let flash_at = 3000 + c.reaction().unwrap().wait_ms();

        out.clear();
        c.handle(Input::Button(ButtonId::A), flash_at, &mut out);
        assert_eq!(
            events(&out),
            vec![Event::Wait, Event::Go, Event::ReactionTime(0)]
        );
    }

    #[test]
    fn time_does_not_run_backwards() {
        let mut c = Controller::new(1);
        let mut out = Vec::new();
        c.advance(5000, &mut out);
        assert_eq!(c.advance(10, &mut out), 5000);
        assert_eq!(c.now_ms(), 5000);
    }

    #[test]
    fn out_of_range_memory_request_is_ignored() {
        let mut c = Controller::new(1);
        let mut out = Vec::new();
        assert!(!c.request_memory(0, 0, &mut out));
        assert!(!c.request_memory(13, 0, &mut out));
        assert!(out.is_empty());
        assert!(c.request_memory(12, 0, &mut out));
        assert_eq!(c.session().activity(), Activity::Memory);
    }

    #[test]
    fn shake_indicator_clears_then_settles() {
        let mut c = Controller::new(2);
        let mut out = Vec::new();
        c.handle(Input::Command(Command::Start), 0, &mut out);
        let flash_at = 3000 + c.reaction().unwrap().wait_ms();
        c.handle(Input::Button(ButtonId::B), flash_at + 200, &mut out);
        c.advance(flash_at + 200 + 500, &mut out);
        assert!(c.session().game_finished());

        let t = flash_at + 1000;
        out.clear();
        c.shake_tick(t, &mut Sample::new(1500, 1500, 0), &mut out);
        assert_eq!(
            out,
            vec![
                Effect::Send(Event::Shake),
                Effect::Display(DisplayOp::Glyph(Glyph::Diamond)),
            ]
        );
        assert_eq!(c.next_deadline(), Some(t + SHAKE_ACK_MS));

        out.clear();
        c.advance(t + SHAKE_ACK_MS, &mut out);
        assert_eq!(out, vec![Effect::Display(DisplayOp::Clear)]);
        assert_eq!(c.next_deadline(), Some(t + SHAKE_ACK_MS + SHAKE_SETTLE_MS));

        c.advance(t + SHAKE_ACK_MS + SHAKE_SETTLE_MS, &mut out);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn start_during_shake_indicator_takes_the_display() {
        let mut c = Controller::new(2);
        let mut out = Vec::new();
        c.handle(Input::Command(Command::Start), 0, &mut out);
        let flash_at = 3000 + c.reaction().unwrap().wait_ms();
        c.handle(Input::Button(ButtonId::A), flash_at + 10, &mut out);
        c.advance(flash_at + 510, &mut out);
        c.shake_tick(flash_at + 600, &mut Sample::new(3000, 0, 0), &mut out);

        c.handle(Input::Command(Command::Start), flash_at + 650, &mut out);
        assert!(matches!(
            c.reaction().map(ReactionRound::phase),
            Some(ReactionPhase::Countdown(3))
        ));
        // Next deadline is the countdown, not the indicator clear.
        assert_eq!(c.next_deadline(), Some(flash_at + 650 + 1000));
    }

    #[test]
    fn connection_lifecycle_indicators() {
        let mut c = Controller::new(1);
        let mut out = Vec::new();
        c.handle(Input::Connected, 0, &mut out);
        c.handle(Input::Disconnected, 10, &mut out);
        assert_eq!(
            out,
            vec![
                Effect::Display(DisplayOp::Glyph(Glyph::Yes)),
                Effect::Display(DisplayOp::Glyph(Glyph::No)),
            ]
        );
    }
}
