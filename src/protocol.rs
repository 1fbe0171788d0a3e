//! Session channel protocol
//!
//! All participants of a session share one pub/sub topic and exchange the
//! closed message set defined here. Because the channel persists nothing
//! and guarantees nothing, the protocol leans on idempotent snapshots:
//! [`BroadcastMessage::SyncState`] and [`BroadcastMessage::UpdatePlayers`]
//! fully replace local state, so out-of-order or duplicated delivery
//! self-corrects on the next snapshot. The only one-shot event is
//! [`BroadcastMessage::AnswerResult`], which a disconnected player can
//! miss without corrupting their state.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    pin::GamePin,
    quiz::Shape,
    roster::{Player, PlayerId},
};

/// One step of the session's finite-state lifecycle
///
/// `Menu` and `Create` are pre-session; all other phases belong to an
/// active session. The host is the sole writer of the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    /// No session; the device shows the main menu
    Menu,
    /// Host is authoring a quiz
    Create,
    /// Session exists, players are joining
    Lobby,
    /// Short countdown before a question starts
    Countdown,
    /// A question is live and accepting answers
    Question,
    /// Per-answer vote tallies are on the shared screen
    AnswerReveal,
    /// Standings between questions
    Leaderboard,
    /// Optional bonus mini-round entered from the leaderboard
    Minigame,
    /// Final standings; the quiz is over
    Podium,
}

/// The messages published on the shared session channel
///
/// This tagged union is authoritative for the core protocol. Handlers
/// dispatch by kind and tolerate messages addressed to the other role,
/// including their own publications looped back by the transport.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum BroadcastMessage {
    /// A player asks to be added to the roster
    Join {
        /// The player's durable id, minted client-side on first join
        id: PlayerId,
        /// Display name, validated before publishing
        nickname: String,
        /// Opaque avatar configuration, rendered client-side
        avatar: Option<serde_json::Value>,
    },
    /// A player leaves the session
    Leave {
        /// The departing player's id
        player_id: PlayerId,
    },
    /// A late or reconnecting client asks for a state snapshot
    RequestState {},
    /// Full session snapshot; replaces the receiver's phase state
    SyncState {
        /// Current phase
        state: GameState,
        /// Index of the current question
        current_question_index: usize,
        /// Total number of questions in the quiz
        total_questions: usize,
        /// The session's PIN
        pin: GamePin,
    },
    /// Full roster snapshot; replaces the receiver's roster mirror
    UpdatePlayers {
        /// Every player, in roster order
        players: Vec<Player>,
    },
    /// A question went live; players reseed their local countdown
    QuestionStart {
        /// Index of the question that started
        question_index: usize,
        /// Seconds available to answer
        time_limit: u32,
    },
    /// A player submits their answer for the current question
    SubmitAnswer {
        /// The submitting player's id
        player_id: PlayerId,
        /// The chosen answer's shape slot
        shape: Shape,
        /// Seconds remaining on the player's local countdown at submission
        time_left: u32,
    },
    /// Host-computed verdict for one player's submission
    AnswerResult {
        /// The player this result is addressed to
        player_id: PlayerId,
        /// Whether the submitted answer was correct
        correct: bool,
        /// Points awarded for this round
        points_to_add: u32,
        /// The player's streak after this round
        new_streak: u32,
    },
    /// High-frequency motion vector for the bonus mini-round
    PlayerInput {
        /// The submitting player's id
        player_id: PlayerId,
        /// Horizontal input component
        x: f64,
        /// Vertical input component
        y: f64,
    },
    /// The session is over; participants return to the menu
    GameEnded {},
}

impl BroadcastMessage {
    /// Converts the message to a JSON string for publishing
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never
    /// happen with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }

    /// Parses a message received from the channel
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the payload is not a well-formed
    /// protocol message.
    pub fn from_message(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tagging() {
        let message = BroadcastMessage::SubmitAnswer {
            player_id: PlayerId::new(),
            shape: Shape::Circle,
            time_left: 12,
        };
        let json: serde_json::Value = serde_json::from_str(&message.to_message()).unwrap();

        assert_eq!(json["type"], "SUBMIT_ANSWER");
        assert_eq!(json["shape"], "CIRCLE");
        assert_eq!(json["timeLeft"], 12);
        assert!(json.get("playerId").is_some());
    }

    #[test]
    fn test_sync_state_round_trip() {
        let message = BroadcastMessage::SyncState {
            state: GameState::Question,
            current_question_index: 3,
            total_questions: 10,
            pin: "042137".parse().unwrap(),
        };

        let decoded = BroadcastMessage::from_message(&message.to_message()).unwrap();
        let BroadcastMessage::SyncState {
            state,
            current_question_index,
            total_questions,
            pin,
        } = decoded
        else {
            panic!("wrong variant");
        };
        assert_eq!(state, GameState::Question);
        assert_eq!(current_question_index, 3);
        assert_eq!(total_questions, 10);
        assert_eq!(pin.to_string(), "042137");
    }

    #[test]
    fn test_empty_payload_messages() {
        let json: serde_json::Value =
            serde_json::from_str(&BroadcastMessage::RequestState {}.to_message()).unwrap();
        assert_eq!(json["type"], "REQUEST_STATE");

        let decoded = BroadcastMessage::from_message(r#"{"type":"GAME_ENDED"}"#).unwrap();
        assert!(matches!(decoded, BroadcastMessage::GameEnded {}));
    }

    #[test]
    fn test_join_omits_absent_avatar() {
        let message = BroadcastMessage::Join {
            id: PlayerId::new(),
            nickname: "Alex".to_string(),
            avatar: None,
        };
        let json: serde_json::Value = serde_json::from_str(&message.to_message()).unwrap();
        assert!(json.get("avatar").is_none());
    }

    #[test]
    fn test_malformed_message_is_error() {
        assert!(BroadcastMessage::from_message("not json").is_err());
        assert!(BroadcastMessage::from_message(r#"{"type":"NO_SUCH_KIND"}"#).is_err());
    }

    #[test]
    fn test_game_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&GameState::AnswerReveal).unwrap(),
            "\"ANSWER_REVEAL\""
        );
        let state: GameState = serde_json::from_str("\"LEADERBOARD\"").unwrap();
        assert_eq!(state, GameState::Leaderboard);
    }
}
