//! Shake detector: a debounced restart trigger that is only live while a
//! finished reaction round is waiting to be restarted.

use crate::session::Session;
use crate::types::{Sample, SHAKE_COOLDOWN_MS, SHAKE_THRESHOLD};

/// Accelerometer collaborator.
pub trait Accelerometer {
    /// Latest reading, or `None` if the sensor could not be read this tick.
    fn sample(&mut self) -> Option<Sample>;
}

/// A fixed reading, handy for tests and headless runs.
impl Accelerometer for Sample {
    fn sample(&mut self) -> Option<Sample> {
        Some(*self)
    }
}

impl<F: FnMut() -> Option<Sample>> Accelerometer for F {
    fn sample(&mut self) -> Option<Sample> {
        self()
    }
}

#[derive(Debug, Clone)]
pub struct ShakeDetector {
    threshold: u32,
    cooldown_ms: u64,
    last_trigger_at: Option<u64>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShakeDetector {
    pub fn new() -> Self {
        Self::with_config(SHAKE_THRESHOLD, SHAKE_COOLDOWN_MS)
    }

    pub fn with_config(threshold: u32, cooldown_ms: u64) -> Self {
        Self {
            threshold,
            cooldown_ms,
            last_trigger_at: None,
        }
    }

    pub fn last_trigger_at(&self) -> Option<u64> {
        self.last_trigger_at
    }

    /// One tick. Returns true when a restart was triggered (and `game_finished`
    /// was consumed). The sensor is not read unless a round is finished.
    pub(crate) fn poll(
        &mut self,
        now: u64,
        session: &mut Session,
        sensor: &mut dyn Accelerometer,
    ) -> bool {
        if !session.game_finished() {
            return false;
        }
        let Some(sample) = sensor.sample() else {
            return false;
        };
        if sample.magnitude() <= self.threshold {
            return false;
        }
        if let Some(last) = self.last_trigger_at {
            if now.saturating_sub(last) <= self.cooldown_ms {
                return false;
            }
        }
        self.last_trigger_at = Some(now);
        session.consume_finished()
    }
}
