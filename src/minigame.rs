//! Optional bonus mini-round
//!
//! Between questions the host may enter a side-phase that accepts
//! high-frequency motion vectors from player devices. Input drives a
//! visual mini-game only; it is throttled, never persisted, and has no
//! bearing on the question/answer protocol. Score changes are awarded
//! separately as deltas via the host session.

use std::collections::HashMap;

use web_time::{Duration, SystemTime};

use crate::{constants, roster::PlayerId};

/// A player's most recent input vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputVector {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

/// Per-player input tracking for an active mini-round
///
/// Inputs arriving faster than the throttle interval are dropped; the
/// channel delivers them at whatever rate the transport manages and the
/// mini-game only needs the latest vector anyway.
#[derive(Debug, Default)]
pub struct MinigameState {
    inputs: HashMap<PlayerId, (InputVector, SystemTime)>,
}

impl MinigameState {
    /// Creates a fresh mini-round with no recorded input
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an input vector, returning whether it was accepted
    ///
    /// Rejects input arriving sooner than the throttle interval after
    /// the player's last accepted vector.
    pub fn receive_input(&mut self, player_id: PlayerId, x: f64, y: f64) -> bool {
        self.receive_input_at(player_id, x, y, SystemTime::now())
    }

    fn receive_input_at(&mut self, player_id: PlayerId, x: f64, y: f64, now: SystemTime) -> bool {
        let min_interval =
            Duration::from_millis(constants::minigame::MIN_INPUT_INTERVAL_MS);
        if let Some((_, last)) = self.inputs.get(&player_id) {
            let elapsed = now.duration_since(*last).unwrap_or_default();
            if elapsed < min_interval {
                return false;
            }
        }
        self.inputs.insert(player_id, (InputVector { x, y }, now));
        true
    }

    /// The player's latest accepted input vector, if any
    pub fn input_of(&self, player_id: PlayerId) -> Option<InputVector> {
        self.inputs.get(&player_id).map(|(vector, _)| *vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_input_accepted() {
        let mut minigame = MinigameState::new();
        let id = PlayerId::new();

        assert!(minigame.receive_input(id, 0.5, -0.5));
        assert_eq!(
            minigame.input_of(id),
            Some(InputVector { x: 0.5, y: -0.5 })
        );
    }

    #[test]
    fn test_rapid_input_throttled() {
        let mut minigame = MinigameState::new();
        let id = PlayerId::new();
        let start = SystemTime::now();

        assert!(minigame.receive_input_at(id, 1.0, 0.0, start));
        // 10ms later: under the interval, dropped.
        assert!(!minigame.receive_input_at(
            id,
            0.0,
            1.0,
            start + Duration::from_millis(10)
        ));
        assert_eq!(minigame.input_of(id), Some(InputVector { x: 1.0, y: 0.0 }));

        // Past the interval, accepted again.
        assert!(minigame.receive_input_at(
            id,
            0.0,
            1.0,
            start + Duration::from_millis(60)
        ));
        assert_eq!(minigame.input_of(id), Some(InputVector { x: 0.0, y: 1.0 }));
    }

    #[test]
    fn test_throttle_is_per_player() {
        let mut minigame = MinigameState::new();
        let first = PlayerId::new();
        let second = PlayerId::new();
        let start = SystemTime::now();

        assert!(minigame.receive_input_at(first, 1.0, 0.0, start));
        assert!(minigame.receive_input_at(second, -1.0, 0.0, start));
    }

    #[test]
    fn test_unknown_player_has_no_input() {
        let minigame = MinigameState::new();
        assert_eq!(minigame.input_of(PlayerId::new()), None);
    }
}
