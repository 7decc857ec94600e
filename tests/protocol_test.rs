//! Host conversations driven through the codec and the controller together.

use reflexbit::adapter::{decode, encode_into, DecodeError};
use reflexbit::core::{Controller, Effect, Input};
use reflexbit::types::ButtonId;

/// Feed timestamped host lines and button presses; collect the outbound text.
struct Bench {
    controller: Controller,
    out: Vec<Effect>,
    wire: String,
}

impl Bench {
    fn new(seed: u32) -> Self {
        Self {
            controller: Controller::new(seed),
            out: Vec::new(),
            wire: String::new(),
        }
    }

    fn line(&mut self, line: &str, at: u64) {
        if let Ok(cmd) = decode(line) {
            self.controller
                .handle(Input::Command(cmd), at, &mut self.out);
        }
        self.flush();
    }

    fn press(&mut self, at: u64) {
        self.controller
            .handle(Input::Button(ButtonId::A), at, &mut self.out);
        self.flush();
    }

    fn advance(&mut self, at: u64) {
        self.controller.advance(at, &mut self.out);
        self.flush();
    }

    fn flush(&mut self) {
        for effect in self.out.drain(..) {
            if let Effect::Send(event) = effect {
                encode_into(&event, &mut self.wire);
            }
        }
    }
}

#[test]
fn ping_pong() {
    let mut b = Bench::new(1);
    b.line("PING", 0);
    b.line("PING\r", 10);
    assert_eq!(b.wire, "PONG\nPONG\n");
}

#[test]
fn unrecognized_lines_get_no_reply() {
    let mut b = Bench::new(1);
    for line in [
        "",
        "ping",
        " PING",
        "PING ",
        "STARTX",
        "MEMORY:",
        "MEMORY:0",
        "MEMORY:13",
        "MEMORY:05",
        "MEMORY:+3",
    ] {
        b.line(line, 0);
    }
    assert_eq!(b.wire, "");
    assert!(b.controller.session().is_idle());
}

#[test]
fn full_reaction_conversation() {
    let mut b = Bench::new(2024);
    b.line("START", 0);
    let flash_at = 3000 + b.controller.reaction().unwrap().wait_ms();
    b.press(flash_at + 312);
    assert_eq!(b.wire, "WAIT\nGO\nRT:312\n");
}

#[test]
fn memory_conversation_sends_sequence_then_done() {
    let mut b = Bench::new(77);
    b.line("MEMORY:4", 0);
    b.advance(60_000);

    let lines: Vec<&str> = b.wire.lines().collect();
    assert_eq!(lines.len(), 2);
    let digits = lines[0].strip_prefix("MEM:").unwrap();
    assert_eq!(digits.len(), 4);
    assert!(digits.bytes().all(|c| c.is_ascii_digit()));
    assert_eq!(lines[1], "MEMDONE");
}

#[test]
fn ping_is_answered_between_memory_digits() {
    let mut b = Bench::new(3);
    b.line("MEMORY:2", 0);
    b.line("PING", 700);
    b.line("START", 800);
    b.advance(60_000);

    let lines: Vec<&str> = b.wire.lines().collect();
    assert_eq!(lines[1], "PONG");
    assert_eq!(lines.last(), Some(&"MEMDONE"));
    assert_eq!(lines.len(), 3);
}

#[test]
fn decode_errors_are_distinguishable() {
    assert_eq!(decode(""), Err(DecodeError::Empty));
    assert!(matches!(decode("HELLO"), Err(DecodeError::UnknownVerb(_))));
    assert!(matches!(decode("MEMORY:x"), Err(DecodeError::MalformedLevel(_))));
    assert_eq!(decode("MEMORY:40"), Err(DecodeError::LevelOutOfRange(40)));
}
