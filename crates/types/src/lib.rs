//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no I/O, making them usable in any context
//! (game core, serial link codec, terminal simulator).
//!
//! # Timing Constants
//!
//! All durations are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `COUNTDOWN_STEP_MS` | 1000 | Hold for each of "3", "2", "1" |
//! | `WAIT_MIN_MS` / `WAIT_MAX_MS` | 1000 / 4000 | Random wait before the flash |
//! | `EARLY_FEEDBACK_MS` | 1000 | Failure glyph hold after an early press |
//! | `RESULT_FEEDBACK_MS` | 500 | Success glyph hold after a measured press |
//! | `MEMORY_LEAD_IN_MS` | 500 | Pause between `MEM:` and the first digit |
//! | `MEMORY_GAP_MS` | 200 | Blank gap after each revealed digit |
//! | `SHAKE_TICK_MS` | 100 | Shake detector poll interval |
//! | `SHAKE_COOLDOWN_MS` | 500 | Minimum spacing between shake triggers |
//! | `SHAKE_ACK_MS` / `SHAKE_SETTLE_MS` | 800 / 500 | Shake indicator hold, then settle |
//!
//! # Examples
//!
//! ```
//! use reflexbit_types::{reveal_hold_ms, Level, Sample};
//!
//! let level = Level::new(4).unwrap();
//! assert_eq!(reveal_hold_ms(level.get()), 800);
//! assert!(Level::new(13).is_none());
//!
//! assert_eq!(Sample::new(-1000, 1000, 1000).magnitude(), 3000);
//! ```

use arrayvec::ArrayVec;

/// Number of countdown steps shown before the random wait ("3", "2", "1").
pub const COUNTDOWN_FROM: u8 = 3;

/// Hold time for each countdown digit.
pub const COUNTDOWN_STEP_MS: u64 = 1000;

/// Shortest random wait between `WAIT` and the flash.
pub const WAIT_MIN_MS: u64 = 1000;

/// Longest random wait between `WAIT` and the flash (inclusive).
pub const WAIT_MAX_MS: u64 = 4000;

/// Failure glyph hold after an early press.
pub const EARLY_FEEDBACK_MS: u64 = 1000;

/// Success glyph hold after a measured press.
pub const RESULT_FEEDBACK_MS: u64 = 500;

/// Pause between sending the memory answer and revealing the first digit.
pub const MEMORY_LEAD_IN_MS: u64 = 500;

/// Blank gap after each revealed digit.
pub const MEMORY_GAP_MS: u64 = 200;

/// Smallest memory level (digit count).
pub const MIN_LEVEL: u8 = 1;

/// Largest memory level (digit count).
pub const MAX_LEVEL: u8 = 12;

/// Shake detector poll interval.
pub const SHAKE_TICK_MS: u64 = 100;

/// Magnitude a sample must exceed to count as a shake.
pub const SHAKE_THRESHOLD: u32 = 2500;

/// Minimum time between two shake triggers.
pub const SHAKE_COOLDOWN_MS: u64 = 500;

/// Hold time of the restart indicator after a shake.
pub const SHAKE_ACK_MS: u64 = 800;

/// Quiet period after the restart indicator is cleared.
pub const SHAKE_SETTLE_MS: u64 = 500;

/// Hold time of each revealed digit, by sequence length.
///
/// 1000ms for up to 3 digits, 800ms for 4-5, 600ms for 6-7, 500ms for 8+.
pub const fn reveal_hold_ms(digits: u8) -> u64 {
    match digits {
        0..=3 => 1000,
        4..=5 => 800,
        6..=7 => 600,
        _ => 500,
    }
}

/// Memory level: the number of digits in a sequence, always in 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    /// Build a level from any integer; `None` outside 1..=12.
    pub fn new(value: u32) -> Option<Self> {
        if (MIN_LEVEL as u32..=MAX_LEVEL as u32).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Level {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Level::new(value).ok_or(value)
    }
}

/// A generated memory sequence (one digit 0-9 per entry).
pub type Digits = ArrayVec<u8, { MAX_LEVEL as usize }>;

/// Inbound command from the paired host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Start,
    Memory(Level),
}

impl Command {
    /// Wire verb, without arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Start => "START",
            Command::Memory(_) => "MEMORY",
        }
    }
}

/// Outbound event reported to the paired host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pong,
    Wait,
    Go,
    Early,
    /// Measured reaction time in milliseconds.
    ReactionTime(u64),
    /// The answer of a memory round, sent before the reveal starts.
    MemorySequence(Digits),
    MemoryDone,
    Shake,
}

impl Event {
    /// Wire name, without payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Pong => "PONG",
            Event::Wait => "WAIT",
            Event::Go => "GO",
            Event::Early => "EARLY",
            Event::ReactionTime(_) => "RT",
            Event::MemorySequence(_) => "MEM",
            Event::MemoryDone => "MEMDONE",
            Event::Shake => "SHAKE",
        }
    }
}

/// Physical button identity. Game logic treats both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    A,
    B,
}

/// One 3-axis accelerometer reading (milli-g).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Sample {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cheap movement intensity: `|x| + |y| + |z|`.
    pub fn magnitude(&self) -> u32 {
        self.x
            .unsigned_abs()
            .saturating_add(self.y.unsigned_abs())
            .saturating_add(self.z.unsigned_abs())
    }
}

/// Fixed icons the display can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Shown at boot.
    Heart,
    /// Link connected, measured press.
    Yes,
    /// Link disconnected, early press.
    No,
    /// Memory reveal finished.
    SmallSquare,
    /// Shake restart acknowledged.
    Diamond,
}

/// One instruction for the display collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOp {
    Glyph(Glyph),
    /// A single digit 0-9 (countdown steps and memory reveals).
    Digit(u8),
    /// Every pixel on at full brightness.
    Flash,
    Clear,
}
