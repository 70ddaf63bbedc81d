//! Prepare handshake synchronizer
//!
//! A one-shot, timeout-bounded handshake between the native player's
//! notification context (which raises `Prepared`) and the controller thread
//! blocked inside `load_source`. The protocol is strictly
//! request → prepare → signal, never pipelined: at most one wait is
//! outstanding, enforced by the single controller thread owning the handle.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::trace;
use std::time::Duration;

/// Outcome of a bounded prepare wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// The prepare notification arrived in time
    Signaled,

    /// The timeout elapsed with no notification
    TimedOut,
}

/// One-shot signal between the notification context and the controller
/// thread.
///
/// Backed by a bounded(1) channel used as a binary semaphore: the channel
/// exists from handle construction, so a signal that races ahead of the wait
/// is retained rather than lost, and extra signals saturate at one pending
/// token.
pub struct PrepareSynchronizer {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl PrepareSynchronizer {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    /// Transition Idle → Armed: discard any stale signal from a previous
    /// cycle.
    ///
    /// Must be called before the asynchronous prepare request is issued.
    pub fn arm(&self) {
        while self.rx.try_recv().is_ok() {
            trace!("discarded stale prepare signal");
        }
    }

    /// Signal the waiting thread from the notification context.
    ///
    /// Callable any number of times per cycle; the slot saturates at one
    /// pending signal, so duplicates cannot corrupt state.
    pub fn signal(&self) {
        let _ = self.tx.try_send(());
    }

    /// Block the calling thread until `signal()` or the timeout, whichever
    /// comes first.
    pub fn wait(&self, timeout: Duration) -> PrepareOutcome {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => PrepareOutcome::Signaled,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                PrepareOutcome::TimedOut
            }
        }
    }
}

impl Default for PrepareSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
