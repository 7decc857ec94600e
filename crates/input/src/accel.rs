//! Simulated accelerometer for running without hardware.
//!
//! At rest the board lies flat (gravity on -z). A shake key starts a short
//! burst of large alternating readings that decays back to rest.

use crate::core::Accelerometer;
use crate::types::Sample;

/// Reading of a board lying flat.
pub const REST: Sample = Sample::new(0, 0, -1024);

/// Default burst length.
pub const DEFAULT_BURST_MS: u64 = 300;

const BURST_PEAK: i32 = 1400;

#[derive(Debug, Clone)]
pub struct SimulatedAccelerometer {
    burst_ms: u64,
    burst_until: Option<u64>,
    now_ms: u64,
    flip: bool,
}

impl Default for SimulatedAccelerometer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedAccelerometer {
    pub fn new() -> Self {
        Self::with_burst_ms(DEFAULT_BURST_MS)
    }

    pub fn with_burst_ms(burst_ms: u64) -> Self {
        Self {
            burst_ms,
            burst_until: None,
            now_ms: 0,
            flip: false,
        }
    }

    /// Begin a shake burst at `now_ms`.
    pub fn shake(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        self.burst_until = Some(now_ms + self.burst_ms);
    }

    /// Move the simulated clock; readings depend on it.
    pub fn set_time(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        if self.burst_until.is_some_and(|until| self.now_ms >= until) {
            self.burst_until = None;
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.burst_until.is_some()
    }

    fn current(&mut self) -> Sample {
        let Some(until) = self.burst_until else {
            return REST;
        };
        // Linear decay over the burst. Lateral axes flip sign each read; the
        // vertical jolt always adds to gravity.
        let left = until.saturating_sub(self.now_ms).min(self.burst_ms);
        let amp = (BURST_PEAK as u64 * left / self.burst_ms.max(1)) as i32;
        self.flip = !self.flip;
        let s = if self.flip { amp } else { -amp };
        Sample::new(s, -s, REST.z - amp)
    }
}

impl Accelerometer for SimulatedAccelerometer {
    fn sample(&mut self) -> Option<Sample> {
        Some(self.current())
    }
}
