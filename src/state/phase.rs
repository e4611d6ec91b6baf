//! Match phase controller
//!
//! Lobby -> Intro -> (Countdown -> RoundActive -> RoundScoringReveal ->
//! BetweenRounds)* -> GameOver -> Lobby. Every phase change happens either in
//! response to an alarm or synchronously inside an event handler, and every
//! alarm is checked against the current generation and phase before it acts.

use super::{build_rounds, Alarm, AlarmKind, Session};
use crate::protocol::ServerMessage;
use crate::types::MatchPhase;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("No rounds could be generated from the corpus")]
    NoRounds,
}

impl Session {
    /// Start a match if enough participants are connected and none is running
    pub(super) fn try_start_match(&mut self) {
        if !self
            .registry
            .can_start_match(self.config.min_players, self.is_match_started())
        {
            return;
        }

        match self.start_match() {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Match start aborted: {}", e);
                self.reset();
                self.enter_phase(MatchPhase::Lobby);
                self.transport.broadcast(ServerMessage::WaitingForPlayers);
            }
        }
    }

    fn start_match(&mut self) -> Result<(), StartError> {
        tracing::info!(
            "[phase] Starting match with {} participants",
            self.registry.len()
        );
        self.registry.freeze_roster();

        let rows = self.corpus.rows();
        self.rounds = build_rounds(
            &rows,
            self.config.round_count,
            self.config.round_seconds,
            &mut rand::rng(),
        );
        if self.rounds.is_empty() {
            return Err(StartError::NoRounds);
        }

        self.current_round = 0;
        self.enter_phase(MatchPhase::Intro);
        self.broadcast_roster();

        let intro = self.config.timings.intro;
        self.send_to_roster(ServerMessage::GameIntro {
            duration: intro.as_millis() as u64,
        });
        self.schedule(AlarmKind::IntroElapsed, intro);
        Ok(())
    }

    /// Route an alarm through the transition table
    pub(super) fn on_alarm(&mut self, alarm: Alarm) {
        let current = match alarm.kind {
            AlarmKind::Unresponsive => self.unresponsive_generation,
            _ => self.phase_generation,
        };
        if alarm.generation != current {
            tracing::debug!("Ignoring stale {:?} alarm", alarm.kind);
            return;
        }

        let expected = match alarm.kind {
            AlarmKind::IntroElapsed => matches!(self.phase, MatchPhase::Intro),
            AlarmKind::CountdownTick => matches!(self.phase, MatchPhase::Countdown { .. }),
            AlarmKind::Unresponsive => self.phase == MatchPhase::RoundActive,
            AlarmKind::RevealAnswer | AlarmKind::BetweenRounds => {
                self.phase == MatchPhase::RoundScoringReveal
            }
            AlarmKind::NextRound => self.phase == MatchPhase::BetweenRounds,
            AlarmKind::GameOverElapsed => self.phase == MatchPhase::GameOver,
        };
        if !expected {
            tracing::debug!("Ignoring {:?} alarm in phase {:?}", alarm.kind, self.phase);
            return;
        }

        match alarm.kind {
            AlarmKind::IntroElapsed => self.begin_countdown(),
            AlarmKind::CountdownTick => self.tick_countdown(),
            AlarmKind::Unresponsive => self.evict_unresponsive(),
            AlarmKind::RevealAnswer => self.reveal_answer(),
            AlarmKind::BetweenRounds => self.enter_between_rounds(),
            AlarmKind::NextRound => self.advance_round(),
            AlarmKind::GameOverElapsed => self.reopen_lobby(),
        }
    }

    /// Check the barrier and close the active round if everyone on the roster answered
    pub(super) fn complete_round_if_ready(&mut self) {
        if !self.is_round_in_progress() || !self.barrier.is_complete(self.registry.roster_len()) {
            return;
        }

        tracing::info!(
            "[phase] Round {} complete ({} responses)",
            self.current_round + 1,
            self.barrier.len()
        );
        self.enter_phase(MatchPhase::RoundScoringReveal);
        self.barrier.clear();
        // Round is over, the straggler check must not fire
        self.unresponsive_generation += 1;

        self.broadcast_roster();

        let timings = self.config.timings.clone();
        self.schedule(AlarmKind::RevealAnswer, timings.reveal_delay);
        self.schedule(AlarmKind::BetweenRounds, timings.between_rounds_delay);
    }

    fn begin_countdown(&mut self) {
        let remaining = self.config.countdown_seconds;
        tracing::info!(
            "[phase] Countdown for round {} of {}",
            self.current_round + 1,
            self.rounds.len()
        );
        self.enter_phase(MatchPhase::Countdown { remaining });
        self.barrier.clear();

        if remaining == 0 {
            self.start_round();
        } else {
            self.schedule(AlarmKind::CountdownTick, self.config.timings.tick);
        }
    }

    fn tick_countdown(&mut self) {
        let remaining = match &mut self.phase {
            MatchPhase::Countdown { remaining } => {
                *remaining = remaining.saturating_sub(1);
                *remaining
            }
            _ => return,
        };

        self.send_to_roster(ServerMessage::RoundCountdown { time: remaining });

        if remaining == 0 {
            self.start_round();
        } else {
            self.schedule(AlarmKind::CountdownTick, self.config.timings.tick);
        }
    }

    fn start_round(&mut self) {
        if self.registry.roster_len() == 0 {
            tracing::info!("[phase] Everyone left the match");
            self.game_over();
            return;
        }

        let Some(round) = self.rounds.get(self.current_round) else {
            self.game_over();
            return;
        };
        let payload = ServerMessage::from(round);

        tracing::info!("[phase] Round {} started", round.index);
        self.enter_phase(MatchPhase::RoundActive);
        self.barrier.clear();
        self.send_to_roster(payload);

        self.unresponsive_generation += 1;
        let alarm = Alarm {
            kind: AlarmKind::Unresponsive,
            generation: self.unresponsive_generation,
        };
        self.scheduler
            .schedule(alarm, self.config.timings.unresponsive_timeout);
    }

    fn reveal_answer(&mut self) {
        let Some(round) = self.rounds.get(self.current_round) else {
            return;
        };
        let msg = ServerMessage::RoundEnded {
            answer: round.answer.answer.clone(),
            choices: round.answer.choices.to_vec(),
        };
        self.send_to_roster(msg);
    }

    fn enter_between_rounds(&mut self) {
        self.send_to_roster(ServerMessage::BetweenRounds);
        self.enter_phase(MatchPhase::BetweenRounds);
        self.schedule(AlarmKind::NextRound, self.config.timings.next_round_delay);
    }

    fn advance_round(&mut self) {
        self.current_round += 1;

        if self.current_round >= self.rounds.len() || self.registry.roster_len() == 0 {
            self.game_over();
        } else {
            self.begin_countdown();
        }
    }

    fn game_over(&mut self) {
        tracing::info!("[phase] Game over");
        self.send_to_roster(ServerMessage::GameOver);
        self.reset();
        self.enter_phase(MatchPhase::GameOver);
        self.schedule(
            AlarmKind::GameOverElapsed,
            self.config.timings.game_over_display,
        );
    }

    fn reopen_lobby(&mut self) {
        self.enter_phase(MatchPhase::Lobby);
        self.transport.broadcast(ServerMessage::WaitingForPlayers);
        self.try_start_match();
    }

    /// Switch phase and invalidate every alarm armed for the previous one
    fn enter_phase(&mut self, phase: MatchPhase) {
        tracing::debug!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_generation += 1;
    }

    fn schedule(&self, kind: AlarmKind, delay: Duration) {
        self.scheduler.schedule(
            Alarm {
                kind,
                generation: self.phase_generation,
            },
            delay,
        );
    }
}
