//! Per-round scoring
//!
//! The session only depends on the [`Scorer`] trait; the formula is swappable.

/// Scores one submission against the round's correct options
pub trait Scorer: Send + Sync {
    /// `reaction_time` and `round_duration` are in seconds.
    fn score(
        &self,
        reaction_time: f64,
        round_duration: f64,
        submitted: &[String],
        correct: &[String],
    ) -> f64;
}

/// Points for each correct pick, scaled by how quickly it was made.
/// Wrong picks cost a flat penalty, and the total never goes below zero.
#[derive(Debug, Clone)]
pub struct SpeedScorer {
    pub points_per_correct: f64,
    pub wrong_penalty: f64,
}

impl Default for SpeedScorer {
    fn default() -> Self {
        Self {
            points_per_correct: 100.0,
            wrong_penalty: 25.0,
        }
    }
}

impl Scorer for SpeedScorer {
    fn score(
        &self,
        reaction_time: f64,
        round_duration: f64,
        submitted: &[String],
        correct: &[String],
    ) -> f64 {
        if round_duration <= 0.0 {
            return 0.0;
        }

        // Half the points are guaranteed, the other half decays linearly over the round
        let remaining = (1.0 - reaction_time.max(0.0) / round_duration).clamp(0.0, 1.0);
        let per_hit = self.points_per_correct * (0.5 + 0.5 * remaining);

        let mut seen = Vec::with_capacity(submitted.len());
        let mut total = 0.0;
        for answer in submitted {
            if seen.contains(&answer) {
                continue;
            }
            seen.push(answer);

            if correct.contains(answer) {
                total += per_hit;
            } else {
                total -= self.wrong_penalty;
            }
        }

        total.max(0.0).round()
    }
}
