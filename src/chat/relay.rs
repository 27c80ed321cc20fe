use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

pub type ConnectionId = Uuid;

/// Registry of open chat connections.
///
/// Each connection owns the receiving half of an unbounded queue; the relay
/// keeps the sending halves. The lock is never held across an await point.
#[derive(Default)]
pub struct ChatRelay {
    peers: Mutex<HashMap<ConnectionId, UnboundedSender<Message>>>,
}

impl ChatRelay {
    pub fn new() -> Self {
        Self::default()
    }

    fn peers(&self) -> MutexGuard<'_, HashMap<ConnectionId, UnboundedSender<Message>>> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new connection and returns its outbound queue.
    pub fn connect(&self) -> (ConnectionId, UnboundedReceiver<Message>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers().insert(id, tx);
        (id, rx)
    }

    pub fn disconnect(&self, id: &ConnectionId) {
        self.peers().remove(id);
    }

    /// Forwards `message` to every connection except `from`.
    ///
    /// Peers whose queue is already closed are skipped. Returns how many
    /// peers the message was handed to.
    pub fn broadcast(&self, from: &ConnectionId, message: Message) -> usize {
        let peers = self.peers();
        peers
            .iter()
            .filter(|(id, _)| *id != from)
            .filter(|(_, tx)| tx.send(message.clone()).is_ok())
            .count()
    }

    pub fn connection_count(&self) -> usize {
        self.peers().len()
    }
}
