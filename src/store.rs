//! Persistence collaborator contract
//!
//! The store exists so a reloaded page can resolve a PIN back to a
//! running session and so the host can clean up after itself. That is
//! the full extent of the contract: quiz-definition storage and any
//! backend schema are out of scope for the game core.

use thiserror::Error;

use crate::pin::GamePin;

/// An opaque handle to a registered player row
///
/// Returned by [`SessionStore::register_player`] and handed back to
/// [`SessionStore::delete_player`]; the game core never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef(pub String);

/// Errors surfaced by a session store backend
#[derive(Error, Debug)]
pub enum Error {
    /// No running session is registered under the given PIN
    #[error("no session with pin {0}")]
    UnknownSession(GamePin),
    /// The backend failed in a backend-specific way
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Minimal persistence operations a session backend must provide
pub trait SessionStore {
    /// Registers a running session under its PIN
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the backend write fails.
    fn create_session(&self, pin: GamePin, title: &str) -> Result<(), Error>;

    /// Registers a player under a running session's PIN
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if no session is registered
    /// under `pin`, or [`Error::Backend`] if the write fails.
    fn register_player(&self, pin: GamePin, nickname: &str) -> Result<PlayerRef, Error>;

    /// Removes a previously registered player row
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the backend write fails.
    fn delete_player(&self, player: PlayerRef) -> Result<(), Error>;

    /// Removes a session registration, ending PIN resolution for it
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the backend write fails.
    fn delete_session(&self, pin: GamePin) -> Result<(), Error>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! An in-memory store used by tests across the crate.

    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// Keeps sessions and player rows in maps, like the real backend
    /// keeps tables.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        sessions: RefCell<HashMap<GamePin, String>>,
        players: RefCell<HashMap<String, String>>,
        counter: RefCell<usize>,
    }

    impl MemoryStore {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn has_session(&self, pin: GamePin) -> bool {
            self.sessions.borrow().contains_key(&pin)
        }

        pub(crate) fn player_count(&self) -> usize {
            self.players.borrow().len()
        }
    }

    impl SessionStore for MemoryStore {
        fn create_session(&self, pin: GamePin, title: &str) -> Result<(), Error> {
            self.sessions.borrow_mut().insert(pin, title.to_owned());
            Ok(())
        }

        fn register_player(&self, pin: GamePin, nickname: &str) -> Result<PlayerRef, Error> {
            if !self.sessions.borrow().contains_key(&pin) {
                return Err(Error::UnknownSession(pin));
            }
            let mut counter = self.counter.borrow_mut();
            *counter += 1;
            let key = format!("player-{counter}", counter = *counter);
            self.players
                .borrow_mut()
                .insert(key.clone(), nickname.to_owned());
            Ok(PlayerRef(key))
        }

        fn delete_player(&self, player: PlayerRef) -> Result<(), Error> {
            self.players.borrow_mut().remove(&player.0);
            Ok(())
        }

        fn delete_session(&self, pin: GamePin) -> Result<(), Error> {
            self.sessions.borrow_mut().remove(&pin);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_register_player_requires_session() {
            let store = MemoryStore::new();
            let pin = GamePin::new();

            assert!(matches!(
                store.register_player(pin, "Alex"),
                Err(Error::UnknownSession(_))
            ));

            store.create_session(pin, "Geography").unwrap();
            let player = store.register_player(pin, "Alex").unwrap();
            assert_eq!(store.player_count(), 1);

            store.delete_player(player).unwrap();
            assert_eq!(store.player_count(), 0);

            store.delete_session(pin).unwrap();
            assert!(!store.has_session(pin));
        }
    }
}
