//! Serial link runtime integration.
//!
//! Bridges the synchronous game loop with the async link server.

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::error::LinkError;
use crate::protocol::encode;
use crate::server::{run_link, LinkConfig, LinkEvent};
use crate::types::Event;

/// Running link instance.
pub struct SerialLink {
    _rt: Runtime,
    event_rx: mpsc::Receiver<LinkEvent>,
    out_tx: mpsc::UnboundedSender<String>,
}

impl SerialLink {
    /// Start the link from environment variables.
    ///
    /// Returns `Ok(None)` if `REFLEXBIT_LINK_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>, LinkError> {
        if LinkConfig::is_disabled() {
            return Ok(None);
        }
        Self::start(LinkConfig::from_env()).map(Some)
    }

    pub fn start(config: LinkConfig) -> Result<Self, LinkError> {
        // Fail fast on a bad address instead of inside the background task.
        config.socket_addr()?;

        let (event_tx, event_rx) = mpsc::channel::<LinkEvent>(config.max_pending.max(1));
        let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();

        let rt = Runtime::new()?;
        rt.spawn(async move {
            if let Err(e) = run_link(config, event_tx, out_rx, None).await {
                tracing::error!(error = %e, "serial link stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            event_rx,
            out_tx,
        })
    }

    pub fn try_recv(&mut self) -> Option<LinkEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Encode and queue one event for the paired host.
    pub fn send(&self, event: &Event) {
        let _ = self.out_tx.send(encode(event));
    }
}
