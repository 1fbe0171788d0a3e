//! # Partyquiz Game Library
//!
//! This library provides the core game logic for a party quiz game played
//! over a shared broadcast channel. A host device runs the authoritative
//! session state machine; player devices run a derived reducer that
//! mirrors whatever the host publishes. The transport itself is not part
//! of this crate: embedders supply a [`channel::Channel`] for publishing
//! and feed received messages into the host and player reducers.
//!
//! The protocol is self-healing by construction. State travels as full
//! snapshots that replace rather than patch, so late, duplicated, or
//! reordered delivery corrects itself on the next snapshot received.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]

pub mod channel;
pub mod constants;
pub mod host;
pub mod minigame;
pub mod nickname;
pub mod pin;
pub mod player;
pub mod protocol;
pub mod quiz;
pub mod roster;
pub mod scoring;
pub mod store;
