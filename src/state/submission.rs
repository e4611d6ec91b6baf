use super::Session;
use crate::types::Submission;

impl Session {
    /// Score a roster member's answer to the active round. Only the first answer counts.
    pub(super) fn submit(&mut self, connection_id: &str, submission: Submission) {
        if !self.is_round_in_progress() {
            tracing::debug!("Submission from {} outside of a round", connection_id);
            return;
        }
        if !self.registry.is_on_roster(connection_id) {
            tracing::debug!("Submission from {} who is not in the match", connection_id);
            return;
        }
        if self.barrier.has_responded(connection_id) {
            tracing::debug!("Duplicate submission from {}", connection_id);
            return;
        }
        let Some(round) = self.rounds.get(self.current_round) else {
            return;
        };

        let points = self.scorer.score(
            submission.reaction_time,
            round.duration as f64,
            &submission.choices,
            &round.answer.choices,
        );
        let points = if points.is_finite() { points } else { 0.0 };

        tracing::debug!(
            "[submission] {} picked {:?} in {:.2}s for {} points",
            connection_id,
            submission.choices,
            submission.reaction_time,
            points
        );

        self.registry.add_score(connection_id, points);
        self.barrier.record(connection_id);
        self.complete_round_if_ready();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::SessionEvent;
    use crate::state::AlarmKind;
    use crate::types::{MatchPhase, Submission};

    fn into_round(harness: &mut Harness) {
        for id in ["a", "b", "c"] {
            harness.connect(id);
        }
        harness.fire(AlarmKind::IntroElapsed);
        while matches!(harness.session.phase(), MatchPhase::Countdown { .. }) {
            harness.fire(AlarmKind::CountdownTick);
        }
    }

    fn submit(harness: &mut Harness, id: &str, choices: Vec<String>, time: f64) {
        harness.session.handle(SessionEvent::Submitted {
            connection_id: id.to_string(),
            submission: Submission {
                choices,
                reaction_time: time,
            },
        });
    }

    fn score_of(harness: &Harness, id: &str) -> Option<f64> {
        harness.session.registry().get(id).unwrap().score
    }

    #[test]
    fn test_correct_answer_scores() {
        let mut harness = Harness::new(quick_config(), corpus());
        into_round(&mut harness);
        let correct = harness.session.active_round().unwrap().answer.choices.to_vec();

        submit(&mut harness, "a", correct, 0.0);
        submit(&mut harness, "b", Vec::new(), 1.0);

        assert_eq!(score_of(&harness, "a"), Some(200.0));
        assert_eq!(score_of(&harness, "b"), Some(0.0));
        assert!(harness.session.barrier().has_responded("a"));
        assert!(harness.session.barrier().has_responded("b"));
    }

    #[test]
    fn test_duplicate_submission_is_ignored() {
        let mut harness = Harness::new(quick_config(), corpus());
        into_round(&mut harness);
        let correct = harness.session.active_round().unwrap().answer.choices.to_vec();

        submit(&mut harness, "a", Vec::new(), 1.0);
        submit(&mut harness, "a", correct, 0.0);

        assert_eq!(score_of(&harness, "a"), Some(0.0));
        assert_eq!(harness.session.barrier().len(), 1);
        assert!(harness.session.is_round_in_progress());
    }

    #[test]
    fn test_submission_outside_round_is_ignored() {
        let mut harness = Harness::new(quick_config(), corpus());
        for id in ["a", "b", "c"] {
            harness.connect(id);
        }
        assert_eq!(*harness.session.phase(), MatchPhase::Intro);

        submit(&mut harness, "a", vec!["Paris".to_string()], 0.0);

        assert_eq!(score_of(&harness, "a"), Some(0.0));
        assert!(harness.session.barrier().is_empty());
    }

    #[test]
    fn test_late_joiner_submission_is_ignored() {
        let mut harness = Harness::new(quick_config(), corpus());
        into_round(&mut harness);
        harness.connect("late");
        let correct = harness.session.active_round().unwrap().answer.choices.to_vec();

        submit(&mut harness, "late", correct, 0.0);

        assert_eq!(score_of(&harness, "late"), None);
        assert!(!harness.session.barrier().has_responded("late"));
    }

    #[test]
    fn test_scores_accumulate_across_rounds() {
        let mut harness = Harness::new(quick_config(), corpus());
        into_round(&mut harness);

        let correct = harness.session.active_round().unwrap().answer.choices.to_vec();
        for id in ["a", "b", "c"] {
            submit(&mut harness, id, correct.clone(), 0.0);
        }
        harness.fire(AlarmKind::BetweenRounds);
        harness.fire(AlarmKind::NextRound);
        while matches!(harness.session.phase(), MatchPhase::Countdown { .. }) {
            harness.fire(AlarmKind::CountdownTick);
        }

        let correct = harness.session.active_round().unwrap().answer.choices.to_vec();
        submit(&mut harness, "a", correct, 0.0);

        assert_eq!(score_of(&harness, "a"), Some(400.0));
        assert_eq!(score_of(&harness, "b"), Some(200.0));
    }
}
