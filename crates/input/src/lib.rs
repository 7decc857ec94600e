//! Simulator input module.
//!
//! Stands in for the physical inputs when running on a host machine: maps
//! `crossterm` key events to the two buttons and to a shake gesture, and
//! provides a simulated accelerometer implementing the core's
//! [`Accelerometer`](reflexbit_core::Accelerometer) seam.

pub mod accel;
pub mod map;

pub use reflexbit_core as core;
pub use reflexbit_types as types;

pub use accel::SimulatedAccelerometer;
pub use map::{handle_key_event, should_quit, KeyInput};
