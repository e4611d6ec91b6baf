//! Generation-stamped alarms
//!
//! Alarms are never cancelled in place. Each carries the generation that was
//! current when it was armed, and the session drops any alarm whose generation
//! has since moved on.

use super::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    IntroElapsed,
    CountdownTick,
    /// Stragglers get dropped from the round
    Unresponsive,
    RevealAnswer,
    BetweenRounds,
    NextRound,
    GameOverElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub kind: AlarmKind,
    pub generation: u64,
}

/// Delivers an alarm back to the session after a delay
pub trait Scheduler {
    fn schedule(&self, alarm: Alarm, delay: Duration);
}

/// Sleeps on the tokio runtime, then posts the alarm to the session queue
#[derive(Clone)]
pub struct TokioScheduler {
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl TokioScheduler {
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { events }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, alarm: Alarm, delay: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Session gone means the process is shutting down
            let _ = events.send(SessionEvent::Alarm(alarm));
        });
    }
}
