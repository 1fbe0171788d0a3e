//! Host-authoritative session state machine
//!
//! The host owns the canonical game state: phase, question index, the
//! roster, and every score and streak. It reacts to inbound channel
//! messages, drives phase transitions off a 1 Hz countdown, computes all
//! scoring, and re-broadcasts full snapshots on every change. Nothing
//! else in the system is permitted to advance the phase or write a
//! score; player devices only mirror what the host publishes.
//!
//! Timers are host-local. If the host process exits the session silently
//! stops advancing; there is no failover host election. This is an
//! accepted limitation of a single-authoritative-host design for casual,
//! same-room gameplay.

use garde::Validate;
use tracing::debug;

use crate::{
    channel::Channel,
    constants,
    minigame::MinigameState,
    pin::GamePin,
    protocol::{BroadcastMessage, GameState},
    quiz::{Question, Quiz, Shape},
    roster::{PlayerId, Roster},
    scoring,
    store::{self, SessionStore},
};

/// What the armed countdown does when it reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingTransition {
    /// The pre-question countdown expired; the question goes live
    StartQuestion,
    /// The question's time limit expired; reveal the answers
    RevealAnswers,
}

/// The single armed countdown a host session owns
///
/// Arming a new countdown replaces this value wholesale, which is what
/// cancels the previous one: a stale timer cannot fire because it no
/// longer exists. Entering any phase that owns a timer therefore starts
/// from a clean slate even on rapid re-entry.
#[derive(Debug, Clone, Copy)]
struct Countdown {
    /// Seconds remaining, decremented once per [`HostSession::tick`]
    remaining: u32,
    /// Transition fired when `remaining` reaches zero
    next: PendingTransition,
}

/// The authoritative game session held by the host device
///
/// Constructed when the host finalizes quiz authoring; torn down via
/// [`HostSession::end_session`]. The channel and store collaborators are
/// passed into each operation rather than held, so the session never
/// reaches for ambient singletons.
#[derive(Debug)]
pub struct HostSession {
    /// The quiz being played; immutable for the session's lifetime
    quiz: Quiz,
    /// The session's join code
    pin: GamePin,
    /// Current phase; this session is its sole writer
    state: GameState,
    /// Index of the current question, monotonically non-decreasing
    current_question_index: usize,
    /// The player roster, exclusively owned and mutated here
    roster: Roster,
    /// The armed countdown, if the current phase owns one
    countdown: Option<Countdown>,
    /// Input tracking while the bonus mini-round is active
    minigame: Option<MinigameState>,
}

impl HostSession {
    /// Creates a session for a validated quiz, in the lobby phase
    ///
    /// Generates a random PIN. Collisions are not checked: sessions are
    /// short-lived and the PIN is scoped to one broadcast channel.
    ///
    /// # Errors
    ///
    /// Returns a `garde::Report` if the quiz fails validation.
    pub fn new(quiz: Quiz) -> Result<Self, garde::Report> {
        quiz.validate()?;
        Ok(Self {
            quiz,
            pin: GamePin::new(),
            state: GameState::Lobby,
            current_question_index: 0,
            roster: Roster::default(),
            countdown: None,
            minigame: None,
        })
    }

    /// Registers the session with the store and announces the lobby
    ///
    /// # Errors
    ///
    /// Returns the store's error if the session cannot be persisted.
    pub fn open<C: Channel, S: SessionStore>(
        &self,
        channel: &C,
        store: &S,
    ) -> Result<(), store::Error> {
        store.create_session(self.pin, &self.quiz.title)?;
        self.broadcast_sync(channel);
        Ok(())
    }

    /// Starts the game from the lobby
    ///
    /// Ignored in any other phase.
    pub fn start_game<C: Channel>(&mut self, channel: &C) {
        if self.state != GameState::Lobby {
            debug!(state = ?self.state, "start_game outside lobby ignored");
            return;
        }
        self.start_countdown(0, channel);
    }

    /// Advances the session on the host's "next" action
    ///
    /// The effect depends on the phase: skipping the countdown or a live
    /// question, moving from the reveal to the leaderboard, and from the
    /// leaderboard to the next question's countdown or the podium.
    pub fn next<C: Channel>(&mut self, channel: &C) {
        match self.state {
            GameState::Lobby => self.start_game(channel),
            GameState::Countdown => self.start_question(channel),
            GameState::Question => self.reveal_answers(channel),
            GameState::AnswerReveal => self.show_leaderboard(channel),
            GameState::Leaderboard => {
                let next_index = self.current_question_index + 1;
                if next_index < self.quiz.len() {
                    self.start_countdown(next_index, channel);
                } else {
                    self.show_podium(channel);
                }
            }
            GameState::Minigame => self.end_minigame(channel),
            GameState::Menu | GameState::Create | GameState::Podium => {
                debug!(state = ?self.state, "next has no effect in this phase");
            }
        }
    }

    /// Advances the authoritative countdown by one second
    ///
    /// The embedder calls this at 1 Hz. A tick with no armed countdown
    /// is a no-op; a tick that reaches zero fires the armed transition.
    pub fn tick<C: Channel>(&mut self, channel: &C) {
        let Some(countdown) = &mut self.countdown else {
            return;
        };
        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining > 0 {
            return;
        }
        let next = countdown.next;
        self.countdown = None;
        match next {
            PendingTransition::StartQuestion => self.start_question(channel),
            PendingTransition::RevealAnswers => self.reveal_answers(channel),
        }
    }

    /// Handles one inbound message from the session channel
    ///
    /// Unknown players, stale rounds, and messages of the host's own
    /// making (looped back by the transport) are silently ignored;
    /// transient races between phase transitions and in-flight player
    /// messages are expected and must never crash the host.
    pub fn receive_message<C: Channel>(&mut self, message: &BroadcastMessage, channel: &C) {
        match message {
            BroadcastMessage::Join {
                id,
                nickname,
                avatar,
            } => match self.roster.join(*id, nickname.clone(), avatar.clone()) {
                Ok(true) => self.broadcast_players(channel),
                Ok(false) => debug!(%id, "duplicate join ignored"),
                Err(error) => debug!(%id, %error, "join rejected"),
            },
            BroadcastMessage::Leave { player_id } => {
                if self.roster.remove(*player_id).is_some() {
                    self.broadcast_players(channel);
                }
            }
            BroadcastMessage::RequestState {} => {
                if self.state == GameState::Menu {
                    debug!("state requested with no active session");
                    return;
                }
                self.broadcast_sync(channel);
                self.broadcast_players(channel);
            }
            BroadcastMessage::SubmitAnswer {
                player_id,
                shape,
                time_left,
            } => self.handle_answer(*player_id, *shape, *time_left, channel),
            BroadcastMessage::PlayerInput { player_id, x, y } => {
                self.handle_player_input(*player_id, *x, *y);
            }
            // Host-originated kinds looping back from the channel.
            BroadcastMessage::SyncState { .. }
            | BroadcastMessage::UpdatePlayers { .. }
            | BroadcastMessage::QuestionStart { .. }
            | BroadcastMessage::AnswerResult { .. }
            | BroadcastMessage::GameEnded {} => {}
        }
    }

    /// Enters the bonus mini-round from the leaderboard
    pub fn start_minigame<C: Channel>(&mut self, channel: &C) {
        if self.state != GameState::Leaderboard {
            debug!(state = ?self.state, "minigame can only start from the leaderboard");
            return;
        }
        self.minigame = Some(MinigameState::new());
        self.state = GameState::Minigame;
        self.broadcast_sync(channel);
    }

    /// Leaves the bonus mini-round, returning to the leaderboard
    pub fn end_minigame<C: Channel>(&mut self, channel: &C) {
        if self.state != GameState::Minigame {
            return;
        }
        self.minigame = None;
        self.state = GameState::Leaderboard;
        self.broadcast_sync(channel);
    }

    /// Awards mini-round score deltas and re-broadcasts the roster
    ///
    /// Deltas bump scores without touching streaks; the mini-round has
    /// no bearing on the question/answer scoring path.
    pub fn award_minigame_points<C: Channel>(
        &mut self,
        deltas: &[(PlayerId, u32)],
        channel: &C,
    ) {
        for (player_id, delta) in deltas {
            self.roster.award(*player_id, *delta);
        }
        self.broadcast_players(channel);
    }

    /// Ends the session: announces the end, unregisters the PIN, and
    /// returns the machine to the menu
    ///
    /// # Errors
    ///
    /// Returns the store's error if the session row cannot be deleted;
    /// the end-of-game announcement has been published either way.
    pub fn end_session<C: Channel, S: SessionStore>(
        &mut self,
        channel: &C,
        store: &S,
    ) -> Result<(), store::Error> {
        channel.publish(&BroadcastMessage::GameEnded {});
        self.countdown = None;
        self.minigame = None;
        self.state = GameState::Menu;
        store.delete_session(self.pin)
    }

    // Phase transitions

    fn start_countdown<C: Channel>(&mut self, index: usize, channel: &C) {
        self.roster.clear_round_markers();
        self.current_question_index = index;
        self.state = GameState::Countdown;
        self.countdown = Some(Countdown {
            remaining: constants::session::COUNTDOWN_SECONDS,
            next: PendingTransition::StartQuestion,
        });
        self.broadcast_sync(channel);
    }

    fn start_question<C: Channel>(&mut self, channel: &C) {
        let Some(question) = self.quiz.questions.get(self.current_question_index) else {
            debug!(
                index = self.current_question_index,
                "no question at current index"
            );
            return;
        };
        let time_limit = question.time_limit;
        self.state = GameState::Question;
        self.countdown = Some(Countdown {
            remaining: time_limit,
            next: PendingTransition::RevealAnswers,
        });
        self.broadcast_sync(channel);
        // Published separately from the snapshot so players reseed their
        // local countdown precisely.
        channel.publish(&BroadcastMessage::QuestionStart {
            question_index: self.current_question_index,
            time_limit,
        });
    }

    fn reveal_answers<C: Channel>(&mut self, channel: &C) {
        self.countdown = None;
        self.state = GameState::AnswerReveal;
        self.broadcast_sync(channel);
    }

    fn show_leaderboard<C: Channel>(&mut self, channel: &C) {
        self.state = GameState::Leaderboard;
        self.broadcast_sync(channel);
    }

    fn show_podium<C: Channel>(&mut self, channel: &C) {
        self.countdown = None;
        self.state = GameState::Podium;
        self.broadcast_sync(channel);
    }

    // Inbound handlers

    fn handle_answer<C: Channel>(
        &mut self,
        player_id: PlayerId,
        shape: Shape,
        time_left: u32,
        channel: &C,
    ) {
        // Submissions are accepted whenever the question phase is live,
        // even if the host's own countdown already hit zero: the window
        // extends by one network round-trip.
        if self.state != GameState::Question {
            debug!(%player_id, state = ?self.state, "answer outside question phase ignored");
            return;
        }
        let Some(question) = self.quiz.questions.get(self.current_question_index) else {
            return;
        };
        let correct = question.is_correct(shape);
        let time_limit = question.time_limit;
        let max_points = question.points;

        let Some(player) = self.roster.get_mut(player_id) else {
            debug!(%player_id, "answer from unknown player ignored");
            return;
        };
        if player.last_answer_shape.is_some() {
            debug!(%player_id, "player already answered this round");
            return;
        }

        player.last_answer_shape = Some(shape);
        player.last_answer_correct = correct;

        let (points_to_add, new_streak) = if correct {
            let streak = player.streak + 1;
            (
                scoring::score(time_left, time_limit, streak, max_points),
                streak,
            )
        } else {
            (0, 0)
        };
        player.streak = new_streak;
        player.score += points_to_add;

        channel.publish(&BroadcastMessage::AnswerResult {
            player_id,
            correct,
            points_to_add,
            new_streak,
        });
        self.broadcast_players(channel);
    }

    fn handle_player_input(&mut self, player_id: PlayerId, x: f64, y: f64) {
        if self.state != GameState::Minigame {
            debug!(%player_id, "player input outside minigame ignored");
            return;
        }
        if self.roster.get(player_id).is_none() {
            debug!(%player_id, "input from unknown player ignored");
            return;
        }
        if let Some(minigame) = &mut self.minigame {
            minigame.receive_input(player_id, x, y);
        }
    }

    // Broadcasts

    /// Publishes the full session snapshot
    ///
    /// Carries everything a late or rejoining player needs to resume
    /// without further round-trips, roster aside.
    fn broadcast_sync<C: Channel>(&self, channel: &C) {
        channel.publish(&BroadcastMessage::SyncState {
            state: self.state,
            current_question_index: self.current_question_index,
            total_questions: self.quiz.len(),
            pin: self.pin,
        });
    }

    fn broadcast_players<C: Channel>(&self, channel: &C) {
        channel.publish(&BroadcastMessage::UpdatePlayers {
            players: self.roster.players().to_vec(),
        });
    }

    // Accessors

    /// The session's PIN
    pub fn pin(&self) -> GamePin {
        self.pin
    }

    /// Current phase
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Index of the current question
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    /// The current question, if the index is in range
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current_question_index)
    }

    /// Seconds remaining on the armed countdown, zero when disarmed
    pub fn time_left(&self) -> u32 {
        self.countdown.map_or(0, |c| c.remaining)
    }

    /// The player roster
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The active mini-round state, if any
    pub fn minigame(&self) -> Option<&MinigameState> {
        self.minigame.as_ref()
    }
}
