use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::messages::{Outbound, ServerMessage};
use crate::coordinator::SessionCoordinator;
use crate::session::PlayerId;

type Sender = mpsc::UnboundedSender<ServerMessage>;

/// Live connections keyed by client id.
///
/// A client that reconnects replaces its previous sender; the stale connection
/// can then only unregister itself, never the new one.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    senders: Mutex<HashMap<PlayerId, (u64, Sender)>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns its id and outbound queue.
    pub fn register(&self, client_id: &str) -> (u64, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if self
            .senders
            .lock()
            .insert(client_id.to_string(), (connection_id, tx))
            .is_some()
        {
            debug!(client_id, "Replaced existing connection");
        }
        (connection_id, rx)
    }

    /// Removes the connection if it is still the current one for `client_id`.
    pub fn unregister(&self, client_id: &str, connection_id: u64) -> bool {
        let mut senders = self.senders.lock();
        match senders.get(client_id) {
            Some((current, _)) if *current == connection_id => {
                senders.remove(client_id);
                true
            }
            _ => false,
        }
    }

    /// Queues `message` for `client_id`. Returns `false` if they are not connected.
    pub fn send(&self, client_id: &str, message: ServerMessage) -> bool {
        let sender = self.senders.lock().get(client_id).map(|(_, tx)| tx.clone());
        match sender {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    pub fn deliver(&self, outbound: Vec<Outbound>) {
        for Outbound { recipient, message } in outbound {
            if !self.send(&recipient, message) {
                debug!(recipient = %recipient, "Dropped message for disconnected player");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.senders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,

    pub connections: Arc<ConnectionRegistry>,
}

impl AppState {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self {
            coordinator,
            connections: Arc::new(ConnectionRegistry::new()),
        }
    }
}
