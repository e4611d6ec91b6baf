//! Connected participants and the roster of the running match

use crate::types::{ConnectionId, Participant};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// A participant that left, and whether they were playing at the time
#[derive(Debug, Clone)]
pub struct Departure {
    pub participant: Participant,
    pub was_on_roster: bool,
}

/// Participants keyed by connection id, in connection order
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    participants: IndexMap<ConnectionId, Participant>,
    roster: IndexSet<ConnectionId>,
    next_display_id: u64,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection with a fresh display id and no score
    pub fn connect(&mut self, connection_id: ConnectionId) -> Participant {
        let participant = Participant {
            connection_id: connection_id.clone(),
            display_id: format!("user{}", self.next_display_id),
            score: None,
        };
        self.next_display_id += 1;

        self.participants.insert(connection_id, participant.clone());
        participant
    }

    /// Remove a connection from the registry and from the roster
    pub fn disconnect(&mut self, connection_id: &str) -> Option<Departure> {
        let participant = self.participants.shift_remove(connection_id)?;
        let was_on_roster = self.roster.shift_remove(connection_id);

        Some(Departure {
            participant,
            was_on_roster,
        })
    }

    pub fn get(&self, connection_id: &str) -> Option<&Participant> {
        self.participants.get(connection_id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Everyone connected, in connection order
    pub fn participants(&self) -> Vec<Participant> {
        self.participants.values().cloned().collect()
    }

    pub fn can_start_match(&self, min_players: usize, match_started: bool) -> bool {
        self.participants.len() >= min_players && !match_started
    }

    /// Admit every connected participant into the match with a zero score
    pub fn freeze_roster(&mut self) {
        self.roster.clear();
        for (id, participant) in self.participants.iter_mut() {
            participant.score = Some(0.0);
            self.roster.insert(id.clone());
        }
    }

    /// Drop everyone from the roster and clear all scores
    pub fn clear_roster(&mut self) {
        self.roster.clear();
        for participant in self.participants.values_mut() {
            participant.score = None;
        }
    }

    /// Remove roster members that did not respond. Returns the evicted ids.
    pub fn evict_unresponsive(&mut self, responded: &HashSet<ConnectionId>) -> Vec<ConnectionId> {
        let evicted: Vec<ConnectionId> = self
            .roster
            .iter()
            .filter(|id| !responded.contains(*id))
            .cloned()
            .collect();

        for id in &evicted {
            self.roster.shift_remove(id);
            if let Some(participant) = self.participants.get_mut(id) {
                participant.score = None;
            }
        }

        evicted
    }

    pub fn is_on_roster(&self, connection_id: &str) -> bool {
        self.roster.contains(connection_id)
    }

    pub fn roster(&self) -> impl Iterator<Item = &ConnectionId> {
        self.roster.iter()
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Add points to a roster member's running total
    pub fn add_score(&mut self, connection_id: &str, points: f64) {
        if !self.roster.contains(connection_id) {
            return;
        }
        if let Some(participant) = self.participants.get_mut(connection_id) {
            participant.score = Some(participant.score.unwrap_or(0.0) + points);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[&str]) -> PlayerRegistry {
        let mut registry = PlayerRegistry::new();
        for id in ids {
            registry.connect(id.to_string());
        }
        registry
    }

    #[test]
    fn test_connect_assigns_unique_display_ids() {
        let mut registry = PlayerRegistry::new();
        let a = registry.connect("a".to_string());
        let b = registry.connect("b".to_string());
        registry.disconnect("a");
        let c = registry.connect("c".to_string());

        assert_eq!(a.display_id, "user0");
        assert_eq!(b.display_id, "user1");
        assert_eq!(c.display_id, "user2");
        assert!(a.score.is_none());
    }

    #[test]
    fn test_participants_keep_connection_order() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.disconnect("b");
        registry.connect("d".to_string());

        let ids: Vec<_> = registry
            .participants()
            .into_iter()
            .map(|p| p.connection_id)
            .collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_can_start_match() {
        let registry = registry_with(&["a", "b"]);
        assert!(!registry.can_start_match(3, false));
        assert!(registry.can_start_match(2, false));
        assert!(!registry.can_start_match(2, true));
    }

    #[test]
    fn test_freeze_roster_zeroes_scores() {
        let mut registry = registry_with(&["a", "b"]);
        registry.freeze_roster();

        assert_eq!(registry.roster_len(), 2);
        assert!(registry
            .participants()
            .iter()
            .all(|p| p.score == Some(0.0)));
    }

    #[test]
    fn test_late_joiner_is_not_on_roster() {
        let mut registry = registry_with(&["a", "b"]);
        registry.freeze_roster();
        registry.connect("c".to_string());

        assert!(!registry.is_on_roster("c"));
        assert_eq!(registry.get("c").unwrap().score, None);
    }

    #[test]
    fn test_disconnect_reports_roster_membership() {
        let mut registry = registry_with(&["a", "b"]);
        registry.freeze_roster();
        registry.connect("c".to_string());

        assert!(registry.disconnect("a").unwrap().was_on_roster);
        assert!(!registry.disconnect("c").unwrap().was_on_roster);
        assert!(registry.disconnect("zzz").is_none());
        assert_eq!(registry.roster_len(), 1);
    }

    #[test]
    fn test_evict_unresponsive() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.freeze_roster();
        registry.add_score("a", 40.0);

        let responded: HashSet<_> = ["a".to_string(), "b".to_string()].into_iter().collect();
        let evicted = registry.evict_unresponsive(&responded);

        assert_eq!(evicted, vec!["c".to_string()]);
        assert!(!registry.is_on_roster("c"));
        assert_eq!(registry.get("c").unwrap().score, None);
        assert_eq!(registry.get("a").unwrap().score, Some(40.0));
        // Evicted participants stay connected
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_add_score_ignores_non_roster() {
        let mut registry = registry_with(&["a"]);
        registry.add_score("a", 10.0);
        assert_eq!(registry.get("a").unwrap().score, None);

        registry.freeze_roster();
        registry.add_score("a", 10.0);
        registry.add_score("a", 5.0);
        assert_eq!(registry.get("a").unwrap().score, Some(15.0));
    }

    #[test]
    fn test_clear_roster_resets_scores() {
        let mut registry = registry_with(&["a", "b"]);
        registry.freeze_roster();
        registry.add_score("b", 12.0);
        registry.clear_roster();

        assert_eq!(registry.roster_len(), 0);
        assert_eq!(registry.len(), 2);
        assert!(registry.participants().iter().all(|p| p.score.is_none()));
    }
}
