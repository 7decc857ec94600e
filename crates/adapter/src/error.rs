//! Error types for the serial link bridge.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    /// Host/port from the configuration do not form a socket address.
    #[error("invalid link address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// The background runtime could not be created.
    #[error("failed to start link runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
