//! Client message dispatch
//!
//! Every client message becomes a session event tagged with the sending connection.

use crate::protocol::{selection_to_submission, ClientMessage};
use crate::state::SessionEvent;

/// Turn a parsed client message into the event the session handles
pub fn to_event(msg: ClientMessage, connection_id: &str) -> SessionEvent {
    match msg {
        ClientMessage::ChatMessage { msg } => SessionEvent::Chat { msg },

        ClientMessage::SubmitSelection {
            choice1,
            choice2,
            time,
        } => SessionEvent::Submitted {
            connection_id: connection_id.to_string(),
            submission: selection_to_submission(choice1, choice2, time),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ClientMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_selection_becomes_submission() {
        let msg = parse(
            r#"{"t":"submit_selection","choice1":"Paris","choice2":"Rome","time":3.5}"#,
        );

        match to_event(msg, "conn-1") {
            SessionEvent::Submitted {
                connection_id,
                submission,
            } => {
                assert_eq!(connection_id, "conn-1");
                assert_eq!(submission.choices, vec!["Paris", "Rome"]);
                assert_eq!(submission.reaction_time, 3.5);
            }
            other => panic!("Expected submission, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_selection_keeps_given_choices() {
        let msg = parse(
            r#"{"t":"submit_selection","choice1":"","choice2":"Rome","time":"soon"}"#,
        );

        match to_event(msg, "conn-1") {
            SessionEvent::Submitted { submission, .. } => {
                assert_eq!(submission.choices, vec!["Rome"]);
                assert_eq!(submission.reaction_time, 0.0);
            }
            other => panic!("Expected submission, got {:?}", other),
        }
    }

    #[test]
    fn test_chat_is_passed_through() {
        let msg = parse(r#"{"t":"chat_message","msg":{"text":"hi","from":"user2"}}"#);

        match to_event(msg, "conn-1") {
            SessionEvent::Chat { msg } => {
                assert_eq!(msg["text"], "hi");
                assert_eq!(msg["from"], "user2");
            }
            other => panic!("Expected chat, got {:?}", other),
        }
    }
}
