use crate::protocol::ServerMessage;
use crate::types::ConnectionId;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the outbound channel shared by all sockets. A single session
/// event emits a handful of entries whatever the roster size, since
/// multi-recipient sends share one entry.
pub const OUTBOUND_CAPACITY: usize = 256;

/// Outbound delivery used by the session. Sends never fail from the caller's view.
pub trait Transport {
    /// Deliver to a single connection
    fn send_to(&self, connection_id: &ConnectionId, msg: ServerMessage);

    /// Deliver one message to a group of connections
    fn send_to_many(&self, connection_ids: &[ConnectionId], msg: ServerMessage);

    /// Deliver to every connected socket
    fn broadcast(&self, msg: ServerMessage);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    All,
    One(ConnectionId),
    Many(Arc<[ConnectionId]>),
}

/// A message on the shared outbound channel, filtered by each socket
#[derive(Debug, Clone)]
pub struct Outbound {
    pub target: Target,
    pub msg: ServerMessage,
}

impl Outbound {
    pub fn is_for(&self, connection_id: &str) -> bool {
        match &self.target {
            Target::All => true,
            Target::One(id) => id == connection_id,
            Target::Many(ids) => ids.iter().any(|id| id == connection_id),
        }
    }
}

/// Transport backed by a tokio broadcast channel that every socket subscribes to.
/// Direct and broadcast messages share one channel so per-socket ordering holds.
#[derive(Clone)]
pub struct ChannelTransport {
    tx: broadcast::Sender<Outbound>,
}

impl ChannelTransport {
    pub fn new(tx: broadcast::Sender<Outbound>) -> Self {
        Self { tx }
    }
}

impl Transport for ChannelTransport {
    fn send_to(&self, connection_id: &ConnectionId, msg: ServerMessage) {
        // Ignore send errors (no receivers connected is fine)
        let _ = self.tx.send(Outbound {
            target: Target::One(connection_id.clone()),
            msg,
        });
    }

    fn send_to_many(&self, connection_ids: &[ConnectionId], msg: ServerMessage) {
        if connection_ids.is_empty() {
            return;
        }
        let _ = self.tx.send(Outbound {
            target: Target::Many(connection_ids.into()),
            msg,
        });
    }

    fn broadcast(&self, msg: ServerMessage) {
        let _ = self.tx.send(Outbound {
            target: Target::All,
            msg,
        });
    }
}
