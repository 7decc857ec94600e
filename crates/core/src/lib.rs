//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game-state machine of the controller: command
//! dispatch, the reaction and memory engines, the input arbiter for the two
//! buttons, and the debounced shake detector. It performs no I/O:
//!
//! - **Deterministic**: the same seed and the same timestamped inputs produce
//!   the same effects
//! - **Sans-IO**: display and serial output are returned as [`Effect`]s
//! - **Single queue**: timers and inputs are processed strictly in time order
//!
//! # Module Structure
//!
//! - [`controller`]: session owner and the entry points drivers call
//! - [`reaction`]: countdown → random wait → flash → measure
//! - [`memory`]: digit sequence generation and paced reveal
//! - [`arbiter`]: both buttons → one confirm, resolved against the round phase
//! - [`shake`]: accelerometer seam and the debounced restart trigger
//! - [`session`]: shared flags with one writer each
//! - [`rng`]: seeded LCG for waits and digits
//!
//! # Example
//!
//! ```
//! use reflexbit_core::{Controller, Effect, Input};
//! use reflexbit_core::types::{ButtonId, Command, Event};
//!
//! let mut controller = Controller::new(12345);
//! let mut out = Vec::new();
//!
//! controller.handle(Input::Command(Command::Start), 0, &mut out);
//! let flash_at = 3000 + controller.reaction().unwrap().wait_ms();
//!
//! out.clear();
//! controller.handle(Input::Button(ButtonId::A), flash_at + 180, &mut out);
//!
//! let sent: Vec<_> = out.iter().filter_map(Effect::event).cloned().collect();
//! assert_eq!(sent, vec![Event::Wait, Event::Go, Event::ReactionTime(180)]);
//! ```

pub mod arbiter;
pub mod controller;
pub mod effect;
pub mod memory;
pub mod reaction;
pub mod rng;
pub mod session;
pub mod shake;
pub mod stats;

pub use reflexbit_types as types;

// Re-export commonly used types for convenience
pub use arbiter::{Confirm, Resolution};
pub use controller::{Controller, Input};
pub use effect::Effect;
pub use memory::{MemoryPhase, MemoryRound};
pub use reaction::{Outcome, ReactionPhase, ReactionRound};
pub use rng::SimpleRng;
pub use session::{Activity, Session};
pub use shake::{Accelerometer, ShakeDetector};
pub use stats::Stats;
