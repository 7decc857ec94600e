//! Terminal simulator front-end.
//!
//! Draws the 5x5 LED matrix and a short link transcript into a plain
//! framebuffer that is flushed to the terminal with crossterm. No widget
//! toolkit is involved.
//!
//! - [`matrix`] models the LEDs and is driven by `DisplayOp`s
//! - [`view`] lays the device out on a framebuffer (pure, testable)
//! - [`renderer`] diffs frames and writes escape sequences

pub mod fb;
pub mod matrix;
pub mod renderer;
pub mod view;

pub use reflexbit_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use matrix::LedMatrix;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{DeviceView, LinkStatus, StatusView, Transcript, Viewport};
