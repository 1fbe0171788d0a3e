//! Player roster management
//!
//! The roster is the host-owned list of players in a session, keyed by
//! each player's durable id. Players hold read-only mirrors of it; only
//! the host mutates scores, streaks, and per-round answer markers. Entry
//! order is insertion order, which also breaks ties in the standings.

use std::{
    collections::{HashMap, hash_map::Entry},
    fmt::Display,
    str::FromStr,
};

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay, skip_serializing_none};
use thiserror::Error;
use uuid::Uuid;

use crate::quiz::Shape;

/// A stable opaque identifier for a player
///
/// Generated on the player device on first join and persisted locally, so
/// a refreshing or reconnecting player resumes as the same roster entry.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Creates a new random player id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    /// Parses a player id from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A single roster entry
///
/// `score` and `streak` are written only by the host; the
/// `last_answer_*` fields are transient per-round markers cleared on
/// every transition into the next countdown.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// The player's durable id
    pub id: PlayerId,
    /// Display name chosen at join time
    pub nickname: String,
    /// Total score, host-computed
    pub score: u32,
    /// Consecutive correct answers, reset on any incorrect answer
    pub streak: u32,
    /// The shape this player submitted in the current round, if any
    pub last_answer_shape: Option<Shape>,
    /// Whether the current round's submission was correct
    #[serde(default)]
    pub last_answer_correct: bool,
    /// Opaque avatar configuration, rendered client-side
    pub avatar: Option<serde_json::Value>,
}

impl Player {
    /// A fresh entry with zeroed score, streak, and round markers
    pub fn new(id: PlayerId, nickname: String, avatar: Option<serde_json::Value>) -> Self {
        Self {
            id,
            nickname,
            score: 0,
            streak: 0,
            last_answer_shape: None,
            last_answer_correct: false,
            avatar,
        }
    }
}

/// Errors that can occur when mutating the roster
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The game has reached the maximum number of allowed players
    #[error("maximum number of players reached")]
    MaximumPlayers,
}

/// The host-owned collection of players, keyed by durable id
#[derive(Debug, Default, Clone)]
pub struct Roster {
    /// Players in insertion order
    players: Vec<Player>,
    /// Index from id into `players`
    index: HashMap<PlayerId, usize>,
}

impl Roster {
    /// Adds a player to the roster with score 0 and streak 0
    ///
    /// A duplicate id (a retried or re-delivered JOIN) leaves the roster
    /// unchanged and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaximumPlayers`] if the roster is full.
    pub fn join(
        &mut self,
        id: PlayerId,
        nickname: String,
        avatar: Option<serde_json::Value>,
    ) -> Result<bool, Error> {
        match self.index.entry(id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(v) => {
                if self.players.len() >= crate::constants::session::MAX_PLAYER_COUNT {
                    return Err(Error::MaximumPlayers);
                }
                v.insert(self.players.len());
                self.players.push(Player::new(id, nickname, avatar));
                Ok(true)
            }
        }
    }

    /// Removes a player, returning the removed entry if it existed
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let position = self.index.remove(&id)?;
        let removed = self.players.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Looks up a player by id
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    /// Looks up a player by id for mutation
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.index.get(&id).map(|&i| &mut self.players[i])
    }

    /// Clears every player's transient per-round answer markers
    ///
    /// Called on every transition into the next question's countdown so
    /// the single-answer latch resets exactly once per round.
    pub fn clear_round_markers(&mut self) {
        for player in &mut self.players {
            player.last_answer_shape = None;
            player.last_answer_correct = false;
        }
    }

    /// Adds points to a player's score without touching their streak
    ///
    /// Used by the bonus mini-round's delta updates.
    pub fn award(&mut self, id: PlayerId, delta: u32) {
        if let Some(player) = self.get_mut(id) {
            player.score += delta;
        }
    }

    /// The players in insertion order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players in the roster
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Per-shape tally of this round's submitted answers
    ///
    /// Drives the host's answer-reveal screen.
    pub fn answer_tally(&self) -> EnumMap<Shape, usize> {
        let mut tally: EnumMap<Shape, usize> = EnumMap::default();
        for player in &self.players {
            if let Some(shape) = player.last_answer_shape {
                tally[shape] += 1;
            }
        }
        tally
    }
}

/// Players sorted by score descending, ties broken by insertion order
///
/// Works on any roster view, including a player device's read-only
/// mirror, which is why this is a free function rather than a `Roster`
/// method.
pub fn standings(players: &[Player]) -> Vec<&Player> {
    players
        .iter()
        .sorted_by_key(|p| std::cmp::Reverse(p.score))
        .collect_vec()
}

/// One-based rank of a player in the standings
///
/// Returns `None` when the id is absent, so the UI can show a neutral
/// placeholder instead of crashing.
pub fn rank_of(players: &[Player], id: PlayerId) -> Option<usize> {
    standings(players)
        .iter()
        .position(|p| p.id == id)
        .map(|i| i + 1)
}
