mod barrier;
mod phase;
mod player;
mod registry;
mod rounds;
mod submission;
mod timer;

pub use barrier::ResponseBarrier;
pub use phase::StartError;
pub use registry::{Departure, PlayerRegistry};
pub use rounds::{build_rounds, DRAW_BUDGET, MAX_OPTIONS, ROWS_PER_ROUND};
pub use timer::{Alarm, AlarmKind, Scheduler, TokioScheduler};

use crate::broadcast::{ChannelTransport, Outbound, Transport, OUTBOUND_CAPACITY};
use crate::config::SessionConfig;
use crate::corpus::CorpusSource;
use crate::protocol::ServerMessage;
use crate::scoring::Scorer;
use crate::types::*;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Everything the session reacts to, delivered one at a time
#[derive(Debug)]
pub enum SessionEvent {
    Connected {
        connection_id: ConnectionId,
    },
    Disconnected {
        connection_id: ConnectionId,
    },
    Submitted {
        connection_id: ConnectionId,
        submission: Submission,
    },
    Chat {
        msg: serde_json::Value,
    },
    Alarm(Alarm),
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Read-only view of the session for operators
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub phase: MatchPhase,
    pub match_started: bool,
    pub round_in_progress: bool,
    /// 0-based position in the round list
    pub current_round: usize,
    pub round_total: usize,
    pub participants: Vec<ParticipantStatus>,
    pub server_now: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStatus {
    pub display_id: DisplayId,
    pub score: Option<f64>,
    pub in_match: bool,
    pub responded: bool,
}

/// The single match session. Owned by one task, mutated only through [`Session::handle`].
pub struct Session {
    config: SessionConfig,
    corpus: CorpusSource,
    scorer: Box<dyn Scorer>,
    transport: Box<dyn Transport + Send>,
    scheduler: Box<dyn Scheduler + Send>,
    registry: PlayerRegistry,
    barrier: ResponseBarrier,
    rounds: Vec<RoundDefinition>,
    current_round: usize,
    phase: MatchPhase,
    phase_generation: u64,
    unresponsive_generation: u64,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        corpus: CorpusSource,
        scorer: Box<dyn Scorer>,
        transport: Box<dyn Transport + Send>,
        scheduler: Box<dyn Scheduler + Send>,
    ) -> Self {
        Self {
            config,
            corpus,
            scorer,
            transport,
            scheduler,
            registry: PlayerRegistry::new(),
            barrier: ResponseBarrier::new(),
            rounds: Vec::new(),
            current_round: 0,
            phase: MatchPhase::Lobby,
            phase_generation: 0,
            unresponsive_generation: 0,
        }
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { connection_id } => self.connect(connection_id),
            SessionEvent::Disconnected { connection_id } => self.disconnect(&connection_id),
            SessionEvent::Submitted {
                connection_id,
                submission,
            } => self.submit(&connection_id, submission),
            SessionEvent::Chat { msg } => {
                self.transport.broadcast(ServerMessage::NewMessage { msg });
            }
            SessionEvent::Alarm(alarm) => self.on_alarm(alarm),
            SessionEvent::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    pub fn is_match_started(&self) -> bool {
        self.phase.is_match_started()
    }

    pub fn is_round_in_progress(&self) -> bool {
        self.phase == MatchPhase::RoundActive
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn barrier(&self) -> &ResponseBarrier {
        &self.barrier
    }

    pub fn rounds(&self) -> &[RoundDefinition] {
        &self.rounds
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn active_round(&self) -> Option<&RoundDefinition> {
        self.rounds.get(self.current_round)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let participants = self
            .registry
            .participants()
            .into_iter()
            .map(|p| ParticipantStatus {
                in_match: self.registry.is_on_roster(&p.connection_id),
                responded: self.barrier.has_responded(&p.connection_id),
                display_id: p.display_id,
                score: p.score,
            })
            .collect();

        SessionSnapshot {
            phase: self.phase.clone(),
            match_started: self.is_match_started(),
            round_in_progress: self.is_round_in_progress(),
            current_round: self.current_round,
            round_total: self.rounds.len(),
            participants,
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Return match state to its initial values. Connected participants are kept.
    fn reset(&mut self) {
        self.registry.clear_roster();
        self.barrier.clear();
        self.rounds.clear();
        self.current_round = 0;
        self.unresponsive_generation += 1;
    }

    fn send_to_roster(&self, msg: ServerMessage) {
        let roster: Vec<ConnectionId> = self.registry.roster().cloned().collect();
        self.transport.send_to_many(&roster, msg);
    }

    fn broadcast_roster(&self) {
        self.transport.broadcast(ServerMessage::RosterChanged {
            participants: self.registry.participants(),
        });
    }
}

/// Drive the session from its event queue until every sender is gone
pub async fn run_session(mut session: Session, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        session.handle(event);
    }
    tracing::info!("Session event queue closed");
}

/// Shared handle to the session task, cloned into every request handler
#[derive(Clone)]
pub struct AppState {
    events: mpsc::UnboundedSender<SessionEvent>,
    outbound: broadcast::Sender<Outbound>,
}

impl AppState {
    /// Create the session and spawn the task that owns it
    pub fn spawn(config: SessionConfig, corpus: CorpusSource, scorer: Box<dyn Scorer>) -> Self {
        let (events, rx) = mpsc::unbounded_channel();
        let (outbound, _rx) = broadcast::channel(OUTBOUND_CAPACITY);

        let session = Session::new(
            config,
            corpus,
            scorer,
            Box::new(ChannelTransport::new(outbound.clone())),
            Box::new(TokioScheduler::new(events.clone())),
        );
        tokio::spawn(run_session(session, rx));

        Self { events, outbound }
    }

    /// Queue an event for the session task
    pub fn dispatch(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::error!("Session task is gone, dropping event");
        }
    }

    /// Subscribe to outbound messages. Subscribe before dispatching `Connected`
    /// so the greeting messages are not missed.
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.outbound.subscribe()
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(SessionEvent::Snapshot { reply });
        rx.await.ok()
    }
}
