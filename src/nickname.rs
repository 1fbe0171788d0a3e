//! Nickname validation
//!
//! Nicknames are checked on the player device before a JOIN is published,
//! so an invalid nickname never reaches the channel. Unlike names in a
//! moderated lobby, nicknames are not required to be unique: the roster
//! is keyed by the player's durable id, not their display name.

use rustrict::CensorStr;
use thiserror::Error;

use crate::constants;

/// Errors that can occur during nickname validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The nickname is empty or contains only whitespace
    #[error("nickname cannot be empty")]
    Empty,
    /// The nickname exceeds the maximum allowed length
    #[error("nickname is too long")]
    TooLong,
    /// The nickname contains inappropriate content
    #[error("nickname is inappropriate")]
    Inappropriate,
}

/// Validates and cleans a nickname
///
/// Trims surrounding whitespace and checks the length and content limits.
///
/// # Errors
///
/// * [`Error::TooLong`] - nickname exceeds 30 characters
/// * [`Error::Empty`] - nickname is empty after trimming whitespace
/// * [`Error::Inappropriate`] - nickname fails the content filter
pub fn validate(nickname: &str) -> Result<String, Error> {
    if nickname.len() > constants::nickname::MAX_LENGTH {
        return Err(Error::TooLong);
    }
    let nickname = rustrict::trim_whitespace(nickname);
    if nickname.is_empty() {
        return Err(Error::Empty);
    }
    if nickname.is_inappropriate() {
        return Err(Error::Inappropriate);
    }
    Ok(nickname.to_owned())
}
