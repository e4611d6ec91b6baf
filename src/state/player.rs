use super::Session;
use crate::protocol::ServerMessage;
use crate::types::ConnectionId;

impl Session {
    /// Register a new connection and greet it
    pub(super) fn connect(&mut self, connection_id: ConnectionId) {
        let participant = self.registry.connect(connection_id.clone());
        tracing::info!(
            "[player] {} connected as {}",
            connection_id,
            participant.display_id
        );

        self.transport.send_to(
            &connection_id,
            ServerMessage::UserAssigned {
                connection_id: participant.connection_id,
                display_id: participant.display_id,
                score: participant.score,
            },
        );
        self.broadcast_roster();

        let status = if self.is_match_started() {
            ServerMessage::MatchInProgress
        } else {
            ServerMessage::WaitingForPlayers
        };
        self.transport.send_to(&connection_id, status);

        self.try_start_match();
    }

    /// Drop a connection. A player leaving mid-round no longer holds it up.
    pub(super) fn disconnect(&mut self, connection_id: &str) {
        let Some(departure) = self.registry.disconnect(connection_id) else {
            tracing::debug!("Disconnect for unknown connection {}", connection_id);
            return;
        };
        tracing::info!(
            "[player] {} disconnected (in match: {})",
            departure.participant.display_id,
            departure.was_on_roster
        );

        if departure.was_on_roster {
            self.barrier.forget(connection_id);
            self.complete_round_if_ready();
        }

        self.broadcast_roster();
    }

    /// Remove everyone on the roster who has not answered the active round
    pub(super) fn evict_unresponsive(&mut self) {
        let evicted = self.registry.evict_unresponsive(self.barrier.responded());

        if !evicted.is_empty() {
            tracing::info!(
                "[player] Evicted {} unresponsive players: {:?}",
                evicted.len(),
                evicted
            );
            self.transport.send_to_many(&evicted, ServerMessage::MatchInProgress);
        }

        self.complete_round_if_ready();
    }
}
