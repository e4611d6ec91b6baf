use crate::types::*;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Free-form chat, relayed to everyone as-is
    ChatMessage { msg: serde_json::Value },
    SubmitSelection {
        #[serde(default, deserialize_with = "lenient_choice")]
        choice1: Option<String>,
        #[serde(default, deserialize_with = "lenient_choice")]
        choice2: Option<String>,
        /// Reaction time in seconds; anything non-numeric counts as 0
        #[serde(default, deserialize_with = "lenient_time")]
        time: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    UserAssigned {
        connection_id: ConnectionId,
        display_id: DisplayId,
        score: Option<f64>,
    },
    RosterChanged {
        participants: Vec<Participant>,
    },
    WaitingForPlayers,
    /// Sent to late joiners and to participants evicted from the running match
    MatchInProgress,
    GameIntro {
        /// Milliseconds
        duration: u64,
    },
    RoundCountdown {
        time: u32,
    },
    NextRound {
        index: u32,
        duration: u32,
        class_name: String,
        theme: String,
        options: Vec<String>,
    },
    RoundEnded {
        answer: String,
        choices: Vec<String>,
    },
    BetweenRounds,
    GameOver,
    NewMessage {
        msg: serde_json::Value,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl From<&RoundDefinition> for ServerMessage {
    fn from(round: &RoundDefinition) -> Self {
        ServerMessage::NextRound {
            index: round.index,
            duration: round.duration,
            class_name: ROUND_CLASS_NAME.to_string(),
            theme: round.theme.clone(),
            options: round.options.clone(),
        }
    }
}

/// Collect the non-empty choices of a selection into a submission
pub fn selection_to_submission(
    choice1: Option<String>,
    choice2: Option<String>,
    time: f64,
) -> Submission {
    let choices = [choice1, choice2]
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .collect();

    Submission {
        choices,
        reaction_time: if time.is_finite() { time } else { 0.0 },
    }
}

fn lenient_time<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|t| t.is_finite()).unwrap_or(0.0))
}

fn lenient_choice<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}
