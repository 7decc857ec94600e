//! Serial link adapter - the controller's connection to its paired host
//!
//! On the device the link is a short-range serial (UART-style) channel. This
//! crate provides the text codec for that channel and, for running on a
//! host machine, a TCP stand-in with the same framing.
//!
//! # Protocol Overview
//!
//! Newline-delimited text, one command or event per line:
//!
//! | Host → controller | Effect |
//! |---|---|
//! | `PING` | reply `PONG` |
//! | `START` | begin a reaction-time round |
//! | `MEMORY:<n>` (1..12) | begin a memory round of n digits |
//! | anything else | ignored |
//!
//! Controller → host: `PONG`, `WAIT`, `GO`, `EARLY`, `RT:<ms>`,
//! `MEM:<digits>`, `MEMDONE`, `SHAKE`.
//!
//! # Environment Variables
//!
//! - `REFLEXBIT_LINK_HOST`: Bind address (default: "127.0.0.1")
//! - `REFLEXBIT_LINK_PORT`: Port number (default: 7878)
//! - `REFLEXBIT_LINK_MAX_PENDING`: Inbound command backlog (default: 16)
//! - `REFLEXBIT_LINK_LOG_PATH`: Append a JSON wire log to this file
//! - `REFLEXBIT_LINK_DISABLED`: Set to "1" or "true" to disable the link
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! PING
//! START
//! ```

pub mod error;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use reflexbit_types as types;

pub use error::LinkError;
pub use protocol::{decode, encode, encode_into, DecodeError};
pub use runtime::SerialLink;
pub use server::{run_link, LinkConfig, LinkEvent, MAX_LINE_BYTES};
