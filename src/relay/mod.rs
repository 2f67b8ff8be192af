//! Delivery relay.
//!
//! # Data Flow
//! ```text
//! Logger::info/warning/error
//!     → Relay::enqueue (bounded queue per severity, blocks when full)
//!     → worker.rs (single thread, select over all queues)
//!     → sink.rs (console line + collector POST)
//! ```
//!
//! # Design Decisions
//! - One worker thread per relay; delivery is serialized
//! - FIFO within a severity, no ordering across severities
//! - A full queue blocks the producer (back-pressure) instead of dropping;
//!   `try_enqueue` is the drop-newest alternative for callers that prefer it
//! - Delivery failures never reach the producer
//! - Shutdown drains whatever is still queued before the worker exits

pub mod sink;
mod worker;

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::codec::{LogMessage, Severity};
use crate::observability::metrics;

pub use sink::{Delivery, DeliveryError, LogSink, ShippingSink};
use worker::{Control, Queues};

/// Default number of slots per severity queue.
pub const DEFAULT_CAPACITY: usize = 100;

/// Errors surfaced to producers.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay queue for {0} entries is full")]
    Full(Severity),

    #[error("relay has been shut down")]
    Closed,

    #[error("failed to start relay worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Bounded producer/consumer relay between log calls and the sink.
pub struct Relay {
    queues: Queues,
    control: Sender<Control>,
    handle: Mutex<Option<JoinHandle<()>>>,
    /// Held shared for the duration of every send and exclusively while
    /// closing, so no send can land after the final drain.
    closed: RwLock<bool>,
}

impl Relay {
    /// Start the worker thread draining into `sink`.
    pub fn spawn<S: LogSink>(capacity: usize, sink: S) -> Result<Self, RelayError> {
        let (queues, control, handle) = worker::spawn_worker(capacity.max(1), Box::new(sink))?;
        tracing::debug!(capacity, "log relay worker started");
        Ok(Self {
            queues,
            control,
            handle: Mutex::new(Some(handle)),
            closed: RwLock::new(false),
        })
    }

    /// Queue a message, blocking while its severity queue is full.
    pub fn enqueue(&self, message: LogMessage) -> Result<(), RelayError> {
        let closed = self.closed.read();
        if *closed {
            return Err(RelayError::Closed);
        }
        let severity = message.severity;
        self.queues
            .sender(severity)
            .send(message)
            .map_err(|_| RelayError::Closed)?;
        metrics::record_enqueued(severity);
        Ok(())
    }

    /// Queue a message without blocking; a full queue rejects the new entry.
    pub fn try_enqueue(&self, message: LogMessage) -> Result<(), RelayError> {
        let closed = self.closed.read();
        if *closed {
            return Err(RelayError::Closed);
        }
        let severity = message.severity;
        match self.queues.sender(severity).try_send(message) {
            Ok(()) => {
                metrics::record_enqueued(severity);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                metrics::record_dropped(severity);
                Err(RelayError::Full(severity))
            }
            Err(TrySendError::Disconnected(_)) => Err(RelayError::Closed),
        }
    }

    /// Wait until every entry queued before this call has been delivered.
    ///
    /// Returns `false` if the worker did not confirm within `timeout`.
    pub fn flush(&self, timeout: Duration) -> bool {
        if self.is_closed() {
            return false;
        }
        let (ack_tx, ack_rx) = bounded(1);
        match self.control.send_timeout(Control::Flush(ack_tx), timeout) {
            Ok(()) => ack_rx.recv_timeout(timeout).is_ok(),
            Err(SendTimeoutError::Timeout(_)) | Err(SendTimeoutError::Disconnected(_)) => false,
        }
    }

    /// Drain remaining entries and stop the worker. Idempotent.
    ///
    /// Waits for producers blocked on a full queue to finish their send, so
    /// every `Ok` from `enqueue` is delivered.
    pub fn shutdown(&self) {
        {
            let mut closed = self.closed.write();
            if *closed {
                return;
            }
            *closed = true;
        }
        let (ack_tx, ack_rx) = bounded(1);
        if self.control.send(Control::Shutdown(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("log relay worker panicked");
            }
        }
        tracing::debug!("log relay worker stopped");
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("closed", &self.is_closed())
            .finish()
    }
}
