//! Session shutdown handshake
//!
//! Two one-slot channels between the task that owns a connection (the
//! closer) and the task reading from it:
//!
//! ```text
//!   closer                         reader
//!     │ ── cancel ──────────────────▶ │  polled between reads
//!     │ ◀──────────────── ack ─────── │  sent right before exiting
//!     ▼                               ▼
//!  release connection             (gone)
//! ```
//!
//! The closer only releases the connection once the ack arrives. If the
//! reader dies without acknowledging, dropping its half disconnects the ack
//! channel and the closer gets `SessionAborted` instead of blocking forever.

use std::cell::Cell;

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::{AckwireError, Result};

/// Create a connected trigger/listener pair
pub fn shutdown_pair() -> (ShutdownTrigger, ShutdownListener) {
    let (cancel_tx, cancel_rx) = bounded(1);
    let (ack_tx, ack_rx) = bounded(1);

    (
        ShutdownTrigger { cancel_tx, ack_rx },
        ShutdownListener {
            cancel_rx,
            ack_tx,
            requested: Cell::new(false),
        },
    )
}

/// Closer's half: raises the cancel signal and waits for the ack
pub struct ShutdownTrigger {
    cancel_tx: Sender<()>,
    ack_rx: Receiver<()>,
}

impl ShutdownTrigger {
    /// Signal the reader and block until it has acknowledged
    ///
    /// Returns `SessionAborted` if the reader exited without acknowledging.
    /// Either way, once this returns the reader no longer touches the
    /// connection.
    pub fn signal_and_wait(self) -> Result<()> {
        // A failed send means the listener is already gone; the recv below
        // reports that as a disconnect.
        let _ = self.cancel_tx.send(());
        self.ack_rx.recv().map_err(|_| AckwireError::SessionAborted)
    }
}

/// Reader's half: polls for cancellation and acknowledges it
pub struct ShutdownListener {
    cancel_rx: Receiver<()>,
    ack_tx: Sender<()>,
    requested: Cell<bool>,
}

impl ShutdownListener {
    /// Non-blocking check for the cancel signal
    ///
    /// Once seen, the signal stays latched, so this can be polled from
    /// several places in the read loop. A dropped trigger counts as
    /// cancellation: nobody is left to close the connection cooperatively.
    pub fn is_requested(&self) -> bool {
        if self.requested.get() {
            return true;
        }
        let requested = match self.cancel_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        };
        self.requested.set(requested);
        requested
    }

    /// Confirm the reader has stopped using the connection
    pub fn acknowledge(self) {
        let _ = self.ack_tx.send(());
    }
}
