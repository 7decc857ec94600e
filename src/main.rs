//! reflexbit simulator (default binary).
//!
//! Runs the controller against the terminal: the LED matrix is drawn with
//! the framebuffer renderer, the two buttons and the shake gesture come from
//! the keyboard, and the serial link is a local TCP listener (see
//! `reflexbit::adapter`).

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use tracing::info;

use reflexbit::adapter::{encode_into, LinkEvent, SerialLink};
use reflexbit::core::{Controller, Effect, Input};
use reflexbit::input::{handle_key_event, should_quit, KeyInput, SimulatedAccelerometer};
use reflexbit::logging::init_logging;
use reflexbit::term::{
    DeviceView, FrameBuffer, LedMatrix, LinkStatus, StatusView, TerminalRenderer, Transcript,
    Viewport,
};
use reflexbit::types::{Command, SHAKE_TICK_MS};

/// Upper bound on one keyboard wait, so link commands are picked up promptly.
const MAX_POLL_MS: u64 = 5;

const TRANSCRIPT_LINES: usize = 8;

fn main() -> Result<()> {
    init_logging()?;

    // Bind before taking over the terminal so address errors stay readable.
    let link = SerialLink::start_from_env()?;
    if link.is_none() {
        info!("serial link disabled");
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, Simulator::new(seed_from_env(), link));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// `REFLEXBIT_SEED` pins the round sequence; otherwise the clock seeds it.
fn seed_from_env() -> u32 {
    std::env::var("REFLEXBIT_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
}

struct Simulator {
    controller: Controller,
    sensor: SimulatedAccelerometer,
    matrix: LedMatrix,
    transcript: Transcript,
    link: Option<SerialLink>,
    link_status: LinkStatus,
    effects: Vec<Effect>,
    line: String,
}

impl Simulator {
    fn new(seed: u32, link: Option<SerialLink>) -> Self {
        let link_status = if link.is_some() {
            LinkStatus::Waiting
        } else {
            LinkStatus::Disabled
        };
        let mut sim = Self {
            controller: Controller::new(seed),
            sensor: SimulatedAccelerometer::new(),
            matrix: LedMatrix::new(),
            transcript: Transcript::new(TRANSCRIPT_LINES),
            link,
            link_status,
            effects: Vec::with_capacity(16),
            line: String::with_capacity(64),
        };
        info!(seed, "controller booted");
        sim.controller.boot(&mut sim.effects);
        sim.flush_effects();
        sim
    }

    fn status(&self) -> StatusView {
        let stats = self.controller.stats();
        StatusView {
            link: self.link_status,
            best_ms: stats.best_reaction_ms,
            last_ms: stats.last_reaction_ms,
            rounds: stats.reaction_rounds,
        }
    }

    /// Apply pending effects to the matrix and the link. Returns whether
    /// anything visible changed.
    fn flush_effects(&mut self) -> bool {
        let changed = !self.effects.is_empty();
        for effect in self.effects.drain(..) {
            match effect {
                Effect::Display(op) => self.matrix.apply(op),
                Effect::Send(event) => {
                    self.line.clear();
                    encode_into(&event, &mut self.line);
                    self.transcript.push(">", &self.line);
                    if let Some(link) = self.link.as_ref() {
                        link.send(&event);
                    }
                }
            }
        }
        changed
    }

    fn on_key(&mut self, key: KeyInput, now: u64) -> bool {
        match key {
            KeyInput::Button(button) => {
                self.controller
                    .handle(Input::Button(button), now, &mut self.effects);
            }
            KeyInput::Shake => self.sensor.shake(now),
        }
        self.flush_effects()
    }

    fn drain_link(&mut self, now: u64) -> bool {
        let mut changed = false;
        while let Some(event) = self.link.as_mut().and_then(SerialLink::try_recv) {
            let input = match event {
                LinkEvent::Connected => {
                    self.link_status = LinkStatus::Connected;
                    Input::Connected
                }
                LinkEvent::Disconnected => {
                    self.link_status = LinkStatus::Waiting;
                    Input::Disconnected
                }
                LinkEvent::Command(cmd) => {
                    self.transcript.push("<", &command_line(cmd));
                    Input::Command(cmd)
                }
            };
            self.controller.handle(input, now, &mut self.effects);
            self.flush_effects();
            changed = true;
        }
        changed
    }

    fn shake_tick(&mut self, now: u64) -> bool {
        self.sensor.set_time(now);
        self.controller
            .shake_tick(now, &mut self.sensor, &mut self.effects);
        self.flush_effects()
    }

    fn advance(&mut self, now: u64) -> bool {
        self.controller.advance(now, &mut self.effects);
        self.flush_effects()
    }
}

fn command_line(cmd: Command) -> String {
    match cmd {
        Command::Memory(level) => format!("{}:{}", cmd.as_str(), level.get()),
        _ => cmd.as_str().to_string(),
    }
}

fn run(term: &mut TerminalRenderer, mut sim: Simulator) -> Result<()> {
    let epoch = Instant::now();
    let clock = || epoch.elapsed().as_millis() as u64;

    let view = DeviceView;
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_size = (0, 0);
    let mut dirty = true;
    let mut next_shake_at = SHAKE_TICK_MS;

    loop {
        let size = crossterm::terminal::size().unwrap_or((80, 24));
        if size != last_size {
            last_size = size;
            term.invalidate();
            dirty = true;
        }
        if dirty {
            view.render_into(
                &sim.matrix,
                &sim.status(),
                &sim.transcript,
                Viewport::new(size.0, size.1),
                &mut fb,
            );
            term.draw(&fb)?;
            dirty = false;
        }

        // Sleep until the next deadline, the next shake tick or a key.
        let now = clock();
        let wake_at = sim
            .controller
            .next_deadline()
            .map_or(next_shake_at, |due| due.min(next_shake_at));
        let timeout = Duration::from_millis(wake_at.saturating_sub(now).min(MAX_POLL_MS));

        let key_ready = event::poll(timeout)?;

        // Link input that arrived during the wait is older than the key.
        dirty |= sim.drain_link(clock());

        if key_ready {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(input) = handle_key_event(key) {
                        dirty |= sim.on_key(input, clock());
                    }
                }
                TermEvent::Resize(..) => dirty = true,
                _ => {}
            }
        }

        let now = clock();
        if now >= next_shake_at {
            dirty |= sim.shake_tick(now);
            next_shake_at = now + SHAKE_TICK_MS;
        }
        dirty |= sim.advance(now);
    }
}
