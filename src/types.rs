use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type ConnectionId = String;
pub type DisplayId = String;

/// Class name attached to every round payload. Clients use it for styling.
pub const ROUND_CLASS_NAME: &str = "a";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPhase {
    Lobby,
    Intro,
    Countdown { remaining: u32 },
    RoundActive,
    RoundScoringReveal,
    BetweenRounds,
    GameOver,
}

impl MatchPhase {
    /// A match is started from the intro until the game-over cleanup runs
    pub fn is_match_started(&self) -> bool {
        !matches!(self, MatchPhase::Lobby | MatchPhase::GameOver)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_id: DisplayId,
    /// `None` while the participant is not playing in a match
    pub score: Option<f64>,
}

/// Hidden part of a round: the theme label and the two options that count as correct
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerKey {
    pub answer: String,
    pub choices: [String; 2],
}

/// A fully generated round, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundDefinition {
    /// 1-based ordinal
    pub index: u32,
    /// Seconds the round is open for answers
    pub duration: u32,
    pub theme: String,
    /// Shuffled display options, 2..=6 distinct entries
    pub options: Vec<String>,
    pub answer: AnswerKey,
}

/// One validated corpus row: a theme label and its alternate phrasings
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// A participant's answer for the active round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub choices: Vec<String>,
    /// Client-reported reaction time in seconds
    pub reaction_time: f64,
}
