//! Session channel contract
//!
//! This module defines the trait for the pub/sub topic every session
//! participant joins. The channel is the sole transport for game events
//! and is deliberately weak: best-effort ordering, no delivery guarantee,
//! no persistence, and loopback delivery of a participant's own messages.
//! Implementations might bridge WebSockets, a realtime database topic, or
//! an in-process broadcast for tests; the game core only ever publishes
//! and lets the embedder feed received messages back into the reducers.

use crate::protocol::BroadcastMessage;

/// Connectivity of the channel as surfaced to the UI
///
/// Game logic never reacts to connectivity; a disconnected host keeps
/// ticking and the protocol's snapshots heal the gap on reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// The transport is up
    Connected,
    /// The transport is down; publishes are being dropped
    Disconnected,
}

/// Trait for publishing messages to the shared session topic
///
/// Publishing is fire-and-forget: implementations log failures (the
/// crate-wide convention is `tracing::warn!`) and never retry, because
/// the next state-triggered snapshot re-establishes consistency anyway.
pub trait Channel {
    /// Publishes a message to every subscriber of the session topic
    ///
    /// Subscribers include the sender itself; handlers must tolerate
    /// their own messages looping back.
    fn publish(&self, message: &BroadcastMessage);

    /// Current transport connectivity, for display only
    fn connectivity(&self) -> Connectivity {
        Connectivity::Connected
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A recording channel used by tests across the crate.

    use std::cell::RefCell;

    use super::*;

    /// Captures every published message for later inspection.
    #[derive(Default)]
    pub(crate) struct RecordingChannel {
        published: RefCell<Vec<BroadcastMessage>>,
    }

    impl RecordingChannel {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// All messages published so far, in order.
        pub(crate) fn published(&self) -> Vec<BroadcastMessage> {
            self.published.borrow().clone()
        }

        /// The most recent published message, if any.
        pub(crate) fn last(&self) -> Option<BroadcastMessage> {
            self.published.borrow().last().cloned()
        }

        /// Drops all recorded messages.
        pub(crate) fn clear(&self) {
            self.published.borrow_mut().clear();
        }
    }

    impl Channel for RecordingChannel {
        fn publish(&self, message: &BroadcastMessage) {
            self.published.borrow_mut().push(message.clone());
        }
    }
}
