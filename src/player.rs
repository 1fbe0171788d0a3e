//! Player-side session mirror
//!
//! A player device never computes game state of its own. It holds a
//! [`PlayerSession`] reducer that folds inbound channel messages into a
//! read-only mirror of the host's truth: phase, roster, own score. The
//! only local state is the answer latch and the display countdown, and
//! neither ever feeds back into scoring on this side.
//!
//! Because snapshots fully replace the mirror, applying them late, twice,
//! or out of order self-corrects on the next one received.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    channel::Channel,
    nickname,
    pin::GamePin,
    protocol::{BroadcastMessage, GameState},
    quiz::Shape,
    roster::{self, Player, PlayerId},
    store::{self, PlayerRef, SessionStore},
};

/// The outcome of the player's own answer for the current round
///
/// Captured from the one `AnswerResult` addressed to this player and
/// rendered once the phase reaches the reveal. A player disconnected at
/// the wrong moment misses it for that round and simply shows nothing;
/// the score itself arrives through the next roster snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundFeedback {
    /// Whether the submitted answer was correct
    pub correct: bool,
    /// Points the host awarded for this round
    pub points_to_add: u32,
    /// The streak after this round
    pub new_streak: u32,
}

/// Derived state held by one player device
#[derive(Debug)]
pub struct PlayerSession {
    /// This device's durable identity
    id: PlayerId,
    /// Nickname, set once [`PlayerSession::join`] succeeds
    nickname: Option<String>,
    /// Mirror of the host's phase
    state: GameState,
    /// One answer per round; reset when a new round begins
    has_answered: bool,
    /// Own score as last reported by the host
    my_score: u32,
    /// Feedback for the current round, if it arrived
    my_feedback: Option<RoundFeedback>,
    /// Mirror of the host's roster
    players: Vec<Player>,
    current_question_index: usize,
    total_questions: usize,
    /// The session PIN as learned from the first snapshot
    pin: Option<GamePin>,
    /// Local display countdown seeded from `QuestionStart`; submitted
    /// alongside answers but otherwise cosmetic
    time_left: u32,
}

impl PlayerSession {
    /// Creates a session with a freshly minted identity
    pub fn new() -> Self {
        Self::with_id(PlayerId::new())
    }

    /// Creates a session resuming a persisted identity
    ///
    /// The embedder stores the id across reloads; rejoining with the same
    /// id picks up the existing roster entry instead of creating one.
    pub fn with_id(id: PlayerId) -> Self {
        Self {
            id,
            nickname: None,
            state: GameState::Menu,
            has_answered: false,
            my_score: 0,
            my_feedback: None,
            players: Vec::new(),
            current_question_index: 0,
            total_questions: 0,
            pin: None,
            time_left: 0,
        }
    }

    /// Validates the nickname locally and announces the join
    ///
    /// # Errors
    ///
    /// Returns a [`nickname::Error`] without publishing anything if the
    /// nickname is empty, too long, or inappropriate.
    pub fn join<C: Channel>(
        &mut self,
        nickname: &str,
        avatar: Option<serde_json::Value>,
        channel: &C,
    ) -> Result<(), nickname::Error> {
        let nickname = nickname::validate(nickname)?;
        self.nickname = Some(nickname.clone());
        channel.publish(&BroadcastMessage::Join {
            id: self.id,
            nickname,
            avatar,
        });
        channel.publish(&BroadcastMessage::RequestState {});
        Ok(())
    }

    /// Registers this player with the persistence backend
    ///
    /// Returns `Ok(None)` until both a nickname and a snapshot-delivered
    /// PIN are known. The embedder keeps the returned handle and passes
    /// it to [`SessionStore::delete_player`] when the player leaves for
    /// good.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the backend rejects the
    /// registration.
    pub fn register<S: SessionStore>(&self, store: &S) -> Result<Option<PlayerRef>, store::Error> {
        let (Some(pin), Some(nickname)) = (self.pin, self.nickname.as_deref()) else {
            return Ok(None);
        };
        store.register_player(pin, nickname).map(Some)
    }

    /// Announces leaving the session
    pub fn leave<C: Channel>(&self, channel: &C) {
        channel.publish(&BroadcastMessage::Leave {
            player_id: self.id,
        });
    }

    /// Asks the host for a fresh snapshot
    ///
    /// The channel has no history, so this is the only way a late or
    /// refreshed device learns the current state.
    pub fn request_state<C: Channel>(&self, channel: &C) {
        channel.publish(&BroadcastMessage::RequestState {});
    }

    /// Submits an answer for the current question
    ///
    /// A no-op outside the question phase or once this round's answer is
    /// latched. The locally observed countdown is sent along; the host
    /// scores from that value, not from its own clock.
    pub fn submit<C: Channel>(&mut self, shape: Shape, channel: &C) {
        if self.state != GameState::Question {
            debug!(state = ?self.state, "submit outside question phase ignored");
            return;
        }
        if self.has_answered {
            debug!("answer already submitted this round");
            return;
        }
        self.has_answered = true;
        channel.publish(&BroadcastMessage::SubmitAnswer {
            player_id: self.id,
            shape,
            time_left: self.time_left,
        });
    }

    /// Sends a mini-round input vector
    pub fn send_input<C: Channel>(&self, x: f64, y: f64, channel: &C) {
        if self.state != GameState::Minigame {
            return;
        }
        channel.publish(&BroadcastMessage::PlayerInput {
            player_id: self.id,
            x,
            y,
        });
    }

    /// Advances the local display countdown by one second
    ///
    /// Purely cosmetic between ticks of the host's authoritative timer,
    /// except that its current value is what [`PlayerSession::submit`]
    /// reports.
    pub fn tick_display(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
    }

    /// Folds one inbound channel message into the mirror
    ///
    /// Host-bound kinds, including this device's own publishes looping
    /// back, are ignored.
    pub fn apply(&mut self, message: &BroadcastMessage) {
        match message {
            BroadcastMessage::SyncState {
                state,
                current_question_index,
                total_questions,
                pin,
            } => self.apply_sync(*state, *current_question_index, *total_questions, *pin),
            BroadcastMessage::UpdatePlayers { players } => {
                self.players = players.clone();
                // The host is authoritative; never trust a locally
                // computed score over the roster entry.
                self.my_score = self
                    .players
                    .iter()
                    .find(|p| p.id == self.id)
                    .map_or(self.my_score, |p| p.score);
            }
            BroadcastMessage::QuestionStart {
                question_index,
                time_limit,
            } => {
                self.current_question_index = *question_index;
                self.time_left = *time_limit;
            }
            BroadcastMessage::AnswerResult {
                player_id,
                correct,
                points_to_add,
                new_streak,
            } => {
                if *player_id == self.id {
                    self.my_feedback = Some(RoundFeedback {
                        correct: *correct,
                        points_to_add: *points_to_add,
                        new_streak: *new_streak,
                    });
                }
            }
            BroadcastMessage::GameEnded {} => {
                self.state = GameState::Menu;
                self.pin = None;
                self.has_answered = false;
                self.my_feedback = None;
                self.time_left = 0;
            }
            // Host-bound kinds, and this device's own loopback.
            BroadcastMessage::Join { .. }
            | BroadcastMessage::Leave { .. }
            | BroadcastMessage::RequestState {}
            | BroadcastMessage::SubmitAnswer { .. }
            | BroadcastMessage::PlayerInput { .. } => {}
        }
    }

    fn apply_sync(
        &mut self,
        state: GameState,
        current_question_index: usize,
        total_questions: usize,
        pin: GamePin,
    ) {
        // A new round begins only when the phase or the question index
        // actually moves; a redelivered snapshot of the same round must
        // not re-open the answer latch.
        let new_round = matches!(state, GameState::Countdown | GameState::Question)
            && (state != self.state || current_question_index != self.current_question_index);
        if new_round {
            self.has_answered = false;
            self.my_feedback = None;
        }
        if state == GameState::Lobby && self.state != GameState::Lobby {
            self.my_score = 0;
        }
        self.state = state;
        self.current_question_index = current_question_index;
        self.total_questions = total_questions;
        self.pin = Some(pin);
    }

    /// This player's 1-based rank on the mirrored roster
    ///
    /// `None` when the mirror has no entry for this player yet; the UI
    /// shows a neutral placeholder in that case.
    pub fn rank(&self) -> Option<usize> {
        roster::rank_of(&self.players, self.id)
    }

    // Accessors

    /// This device's durable identity
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// The validated nickname, once joined
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Mirrored phase
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Whether this round's answer is latched
    pub fn has_answered(&self) -> bool {
        self.has_answered
    }

    /// Own score as last reported by the host
    pub fn score(&self) -> u32 {
        self.my_score
    }

    /// Feedback for the current round, if received
    pub fn feedback(&self) -> Option<RoundFeedback> {
        self.my_feedback
    }

    /// Mirrored roster
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Mirrored question progress as (current index, total)
    pub fn question_progress(&self) -> (usize, usize) {
        (self.current_question_index, self.total_questions)
    }

    /// The session PIN, once a snapshot has arrived
    pub fn pin(&self) -> Option<GamePin> {
        self.pin
    }

    /// Local display countdown
    pub fn time_left(&self) -> u32 {
        self.time_left
    }
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self::new()
    }
}
