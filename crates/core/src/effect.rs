//! Effects produced by the core for the display and serial collaborators.
//!
//! The core never talks to hardware. Every call appends to a caller-owned
//! `Vec<Effect>` that the driver drains and applies in order; callers keep one
//! buffer and `clear()` it between calls.

use crate::types::{DisplayOp, Event, Glyph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write one line to the paired host.
    Send(Event),
    Display(DisplayOp),
}

impl Effect {
    pub fn event(&self) -> Option<&Event> {
        match self {
            Effect::Send(ev) => Some(ev),
            Effect::Display(_) => None,
        }
    }

    pub fn display(&self) -> Option<DisplayOp> {
        match self {
            Effect::Display(op) => Some(*op),
            Effect::Send(_) => None,
        }
    }
}

pub(crate) fn send(out: &mut Vec<Effect>, event: Event) {
    out.push(Effect::Send(event));
}

pub(crate) fn show(out: &mut Vec<Effect>, op: DisplayOp) {
    out.push(Effect::Display(op));
}

pub(crate) fn glyph(out: &mut Vec<Effect>, glyph: Glyph) {
    show(out, DisplayOp::Glyph(glyph));
}
