//! TCP stand-in for the serial link
//!
//! On a host machine the short-range serial link is emulated by a TCP
//! listener: one paired host at a time, newline-delimited text both ways.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, trace, warn};

use crate::error::LinkError;
use crate::protocol::decode;
use crate::types::Command;

/// Longest inbound line accepted, delimiter included. Longer lines are
/// dropped whole.
pub const MAX_LINE_BYTES: usize = 256;

/// Link configuration
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub host: String,
    pub port: u16,
    pub max_pending: usize,
    /// Append every line that crosses the link to this file as JSON.
    pub log_path: Option<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending: 16,
            log_path: None,
        }
    }
}

impl LinkConfig {
    /// Create from `REFLEXBIT_LINK_*` environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("REFLEXBIT_LINK_HOST").unwrap_or(defaults.host);
        let port = env::var("REFLEXBIT_LINK_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_pending = env::var("REFLEXBIT_LINK_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending);

        let log_path = env::var("REFLEXBIT_LINK_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            host,
            port,
            max_pending,
            log_path,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, LinkError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| LinkError::InvalidAddress { addr, source })
    }

    /// Check if the link is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("REFLEXBIT_LINK_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// What the link reports to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Command(Command),
    Disconnected,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    In,
    Out,
}

/// One line of the wire log.
#[derive(Debug, Clone, Serialize)]
struct WireRecord {
    ts: u64,
    dir: Direction,
    line: String,
}

impl WireRecord {
    fn new(dir: Direction, line: &str) -> Self {
        Self {
            ts: current_timestamp_ms(),
            dir,
            line: line.trim_end_matches('\n').to_string(),
        }
    }
}

/// The currently paired host.
struct HostHandle {
    id: usize,
    addr: SocketAddr,
    tx: mpsc::UnboundedSender<String>,
}

#[derive(Default)]
struct LinkState {
    host: RwLock<Option<HostHandle>>,
}

/// Run the link until the listener fails.
///
/// `out_rx` carries fully encoded lines (newline included). Lines sent while
/// no host is paired are dropped.
pub async fn run_link(
    config: LinkConfig,
    event_tx: mpsc::Sender<LinkEvent>,
    mut out_rx: mpsc::UnboundedReceiver<String>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "serial link listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(LinkState::default());
    let mut host_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        let wire_log_tx = wire_log_tx.clone();
        tokio::spawn(async move {
            while let Some(line) = out_rx.recv().await {
                let host = state.host.read().await;
                match host.as_ref() {
                    Some(h) => {
                        if let Some(tx) = wire_log_tx.as_ref() {
                            let _ = tx.send(WireRecord::new(Direction::Out, &line));
                        }
                        let _ = h.tx.send(line);
                    }
                    None => trace!(line = line.trim_end(), "no host paired, dropped"),
                }
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;

        if let Some(current) = state.host.read().await.as_ref() {
            warn!(%addr, paired = %current.addr, "refusing second host");
            drop(socket);
            continue;
        }

        host_id_counter += 1;
        let host_id = host_id_counter;
        info!(host_id, %addr, "host connected");

        let state = Arc::clone(&state);
        let event_tx = event_tx.clone();
        let wire_log_tx = wire_log_tx.clone();
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        *state.host.write().await = Some(HostHandle { id: host_id, addr, tx });

        tokio::spawn(async move {
            let _ = event_tx.send(LinkEvent::Connected).await;
            if let Err(e) = handle_host(socket, rx, &event_tx, wire_log_tx).await {
                warn!(host_id, error = %e, "host error");
            }

            {
                let mut host = state.host.write().await;
                if host.as_ref().map(|h| h.id) == Some(host_id) {
                    *host = None;
                }
            }
            info!(host_id, "host disconnected");
            let _ = event_tx.send(LinkEvent::Disconnected).await;
        });
    }
}

/// Pump one host connection until it closes.
async fn handle_host(
    socket: TcpStream,
    mut rx: mpsc::UnboundedReceiver<String>,
    event_tx: &mpsc::Sender<LinkEvent>,
    wire_log_tx: Option<mpsc::UnboundedSender<WireRecord>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut buf: Vec<u8> = Vec::with_capacity(64);
    let mut discarding = false;
    let result = loop {
        buf.clear();
        let bytes_read = match (&mut reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await
        {
            Ok(n) => n,
            Err(e) => break Err(e.into()),
        };
        if bytes_read == 0 {
            break Ok(());
        }

        let terminated = buf.last() == Some(&b'\n');
        if discarding {
            // Tail of an overlong line.
            discarding = !terminated;
            continue;
        }
        if !terminated && bytes_read == MAX_LINE_BYTES {
            debug!(limit = MAX_LINE_BYTES, "overlong line ignored");
            discarding = true;
            continue;
        }

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let Ok(raw_line) = std::str::from_utf8(bytes) else {
            debug!(len = bytes.len(), "non-UTF-8 line ignored");
            continue;
        };
        if let Some(tx) = wire_log_tx.as_ref() {
            let _ = tx.send(WireRecord::new(Direction::In, raw_line));
        }

        match decode(raw_line) {
            Ok(cmd) => {
                if event_tx.try_send(LinkEvent::Command(cmd)).is_err() {
                    warn!(command = cmd.as_str(), "game loop backlog full, command dropped");
                }
            }
            Err(e) => debug!(error = %e, "unrecognized line ignored"),
        }
    };

    write_task.abort();
    result
}

fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<WireRecord> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!(%path, error = %e, "wire log unavailable");
                return;
            }
        };

        let mut buf: Vec<u8> = Vec::with_capacity(256);
        while let Some(rec) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &rec).is_err() {
                continue;
            }
            buf.push(b'\n');
            if file.write_all(&buf).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
