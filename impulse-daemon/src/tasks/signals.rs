//! Termination signal watcher
//!
//! SIGINT and SIGTERM only flip the shared cancellation flag. The control
//! future notices it at the next pulse-step boundary, persists the dial and
//! releases the relays.

use std::io;
use std::sync::Arc;

use impulse_core::CancelToken;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{debug, info};

/// Registered SIGINT/SIGTERM streams
pub struct Signals {
    interrupt: Signal,
    terminate: Signal,
}

impl Signals {
    /// Install the handlers
    ///
    /// Must run inside the runtime, before any pulse is issued.
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next termination signal, returning its name
    async fn next(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

/// Signal task - cancels `cancel` on the first SIGINT/SIGTERM
///
/// Later signals are logged and ignored while cleanup runs.
pub async fn signal_task(mut signals: Signals, cancel: Arc<CancelToken>) {
    loop {
        let name = signals.next().await;
        if cancel.cancel() {
            info!("Caught signal {}, shutting down", name);
        } else {
            debug!("{} ignored, shutdown already in progress", name);
        }
    }
}
