use crate::types::ConnectionId;
use std::collections::HashSet;

/// Tracks which roster members have answered the active round
#[derive(Debug, Default)]
pub struct ResponseBarrier {
    responded: HashSet<ConnectionId>,
}

impl ResponseBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response. Returns false if this participant already responded.
    pub fn record(&mut self, connection_id: &str) -> bool {
        self.responded.insert(connection_id.to_string())
    }

    pub fn has_responded(&self, connection_id: &str) -> bool {
        self.responded.contains(connection_id)
    }

    /// Drop a participant that left the roster
    pub fn forget(&mut self, connection_id: &str) {
        self.responded.remove(connection_id);
    }

    pub fn is_complete(&self, roster_len: usize) -> bool {
        self.responded.len() >= roster_len
    }

    pub fn responded(&self) -> &HashSet<ConnectionId> {
        &self.responded
    }

    pub fn len(&self) -> usize {
        self.responded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responded.is_empty()
    }

    pub fn clear(&mut self) {
        self.responded.clear();
    }
}
