//! Protocol module - newline-delimited text codec for the serial link
//!
//! Inbound grammar (one command per line, exact and case-sensitive):
//!
//! ```text
//! PING
//! START
//! MEMORY:<n>      n = 1..12, plain decimal, no sign or leading zeros
//! ```
//!
//! Outbound lines: `PONG`, `WAIT`, `GO`, `EARLY`, `RT:<ms>`, `MEM:<digits>`,
//! `MEMDONE`, `SHAKE`, each terminated by `\n`.

use std::fmt::Write as _;

use thiserror::Error;

use crate::types::{Command, Event, Level, MAX_LEVEL, MIN_LEVEL};

/// Why a line did not decode. Every variant is treated as "unrecognized"
/// by the link: the line is dropped without a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownVerb(String),
    #[error("malformed memory level `{0}`")]
    MalformedLevel(String),
    #[error("memory level {0} outside {min}..={max}", min = MIN_LEVEL, max = MAX_LEVEL)]
    LevelOutOfRange(u32),
}

/// Decode one inbound line (delimiter already removed; a trailing `\r` is
/// tolerated).
pub fn decode(line: &str) -> Result<Command, DecodeError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match line {
        "" => Err(DecodeError::Empty),
        "PING" => Ok(Command::Ping),
        "START" => Ok(Command::Start),
        _ => match line.strip_prefix("MEMORY:") {
            Some(arg) => parse_level(arg).map(Command::Memory),
            None => Err(DecodeError::UnknownVerb(line.to_string())),
        },
    }
}

fn parse_level(arg: &str) -> Result<Level, DecodeError> {
    let canonical = !arg.is_empty()
        && arg.bytes().all(|b| b.is_ascii_digit())
        && !(arg.len() > 1 && arg.starts_with('0'));
    if !canonical {
        return Err(DecodeError::MalformedLevel(arg.to_string()));
    }
    let n: u32 = arg
        .parse()
        .map_err(|_| DecodeError::MalformedLevel(arg.to_string()))?;
    Level::new(n).ok_or(DecodeError::LevelOutOfRange(n))
}

/// Append the wire form of `event`, including the trailing newline.
pub fn encode_into(event: &Event, out: &mut String) {
    out.push_str(event.as_str());
    match event {
        Event::ReactionTime(ms) => {
            // Writing into a String cannot fail.
            let _ = write!(out, ":{}", ms);
        }
        Event::MemorySequence(digits) => {
            out.push(':');
            out.extend(digits.iter().map(|d| char::from(b'0' + d % 10)));
        }
        _ => {}
    }
    out.push('\n');
}

pub fn encode(event: &Event) -> String {
    let mut out = String::with_capacity(24);
    encode_into(event, &mut out);
    out
}
