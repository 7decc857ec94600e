//! reflexbit (workspace facade crate).
//!
//! Reaction-time and sequence-memory mini-games for a two-button controller
//! with a 5x5 LED matrix, driven over a line-based serial protocol. The
//! implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `reflexbit::{types, core, adapter, input, term}` and
//! ships the terminal simulator binary.

pub mod logging;

pub use reflexbit_adapter as adapter;
pub use reflexbit_core as core;
pub use reflexbit_input as input;
pub use reflexbit_term as term;
pub use reflexbit_types as types;
