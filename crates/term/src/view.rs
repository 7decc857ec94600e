//! DeviceView: maps the simulated device into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use std::collections::VecDeque;

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::matrix::{LedMatrix, SIZE};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disabled,
    Waiting,
    Connected,
}

impl LinkStatus {
    fn label(self) -> &'static str {
        match self {
            LinkStatus::Disabled => "link: disabled",
            LinkStatus::Waiting => "link: waiting for host",
            LinkStatus::Connected => "link: host connected",
        }
    }
}

/// Everything besides the LEDs that the view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub link: LinkStatus,
    pub best_ms: Option<u64>,
    pub last_ms: Option<u64>,
    pub rounds: u32,
}

/// Last few lines that crossed the link, newest last.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Transcript {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// `prefix` is "<" for inbound and ">" for outbound.
    pub fn push(&mut self, prefix: &str, line: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(format!("{} {}", prefix, line.trim_end()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

const LED_ON: CellStyle = CellStyle::fg(Rgb::new(255, 60, 40)).bold();
const LED_OFF: CellStyle = CellStyle::fg(Rgb::new(70, 30, 30));
const DIM: CellStyle = CellStyle::fg(Rgb::new(140, 140, 150));
const HELP: &str = "a/← button A   b/→ button B   s shake   q quit";

#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceView;

impl DeviceView {
    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        matrix: &LedMatrix,
        status: &StatusView,
        transcript: &Transcript,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);

        fb.put_str(1, 0, "reflexbit", CellStyle::default().bold());

        // LEDs are two columns wide to look square.
        let top = 2u16;
        for y in 0..SIZE {
            for x in 0..SIZE {
                let (text, style) = if matrix.is_lit(x, y) {
                    ("██", LED_ON)
                } else {
                    ("··", LED_OFF)
                };
                fb.put_str(3 + (x as u16) * 3, top + y as u16, text, style);
            }
        }

        let mut row = top + SIZE as u16 + 1;
        fb.put_str(1, row, status.link.label(), DIM);
        row += 1;
        let fmt_ms = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |ms| format!("{}ms", ms));
        let scores = format!(
            "rounds: {}   last: {}   best: {}",
            status.rounds,
            fmt_ms(status.last_ms),
            fmt_ms(status.best_ms)
        );
        fb.put_str(1, row, &scores, DIM);
        row += 2;

        for line in transcript.iter() {
            if row + 1 >= viewport.height {
                break;
            }
            fb.put_str(1, row, line, CellStyle::default());
            row += 1;
        }

        if viewport.height > 0 {
            fb.put_str(1, viewport.height - 1, HELP, DIM);
        }
    }
}
