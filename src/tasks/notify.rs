//! Notification channel that triggers sweeps.

use tokio::sync::broadcast;
use tracing::debug;

/// Buffered notifications per listener before older ones are dropped.
const CHANNEL_CAPACITY: usize = 16;

// == Notifier ==
/// Payload-free event source, e.g. "navigation/state changed".
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<()>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Fires the event. Returns the number of listeners it reached.
    pub fn notify(&self) -> usize {
        match self.tx.send(()) {
            Ok(receivers) => {
                debug!("Notification delivered to {} listeners", receivers);
                receivers
            }
            Err(_) => {
                debug!("Notification fired with no listeners");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
