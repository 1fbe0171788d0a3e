//! Game PIN generation and management
//!
//! This module provides the short numeric codes that identify a running
//! session. PINs are six decimal digits, zero-padded, so they are easy to
//! type on a phone or encode in a join link. Collisions are not checked:
//! sessions are short-lived and the PIN is scoped to one broadcast
//! channel, not globally unique.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Number of decimal digits in a PIN
const DIGITS: usize = 6;
/// Exclusive upper bound of the PIN space
const SPAN: u32 = 1_000_000;

/// A six-digit numeric code identifying a running game session
///
/// Players resolve a PIN to a session either by typing it by hand or by
/// following a join link / QR code. The PIN travels on the wire as a
/// zero-padded string so leading zeros survive serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GamePin(u32);

/// Errors that can occur when parsing a PIN from a string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePinError {
    /// The string is not exactly six characters long
    #[error("pin must be exactly {DIGITS} digits")]
    WrongLength,
    /// The string contains something other than decimal digits
    #[error("pin must be numeric: {0}")]
    NotNumeric(#[from] ParseIntError),
}

impl GamePin {
    /// Creates a new random PIN
    pub fn new() -> Self {
        Self(fastrand::u32(0..SPAN))
    }
}

impl Default for GamePin {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for GamePin {
    /// Formats the PIN as a zero-padded six-digit decimal number
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl FromStr for GamePin {
    type Err = ParsePinError;

    /// Parses a PIN from its zero-padded decimal representation
    ///
    /// # Errors
    ///
    /// Returns [`ParsePinError`] if the string is not exactly six decimal
    /// digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DIGITS {
            return Err(ParsePinError::WrongLength);
        }
        Ok(Self(s.parse()?))
    }
}

impl Serialize for GamePin {
    /// Serializes the PIN as a zero-padded string
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GamePin {
    /// Deserializes a PIN from its zero-padded string form
    fn deserialize<D>(deserializer: D) -> Result<GamePin, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        GamePin::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Builds the join URL a player device opens to pre-fill this PIN
///
/// The PIN is the only query parameter a player client needs to resolve
/// a session on load.
pub fn join_url(origin: &str, pin: GamePin) -> String {
    format!("{origin}?pin={pin}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_new_in_range() {
        for _ in 0..100 {
            let pin = GamePin::new();
            assert!(pin.0 < SPAN);
        }
    }

    #[test]
    fn test_pin_display_zero_padded() {
        assert_eq!(GamePin(0).to_string(), "000000");
        assert_eq!(GamePin(42).to_string(), "000042");
        assert_eq!(GamePin(999_999).to_string(), "999999");
    }

    #[test]
    fn test_pin_from_str_round_trip() {
        let pin = GamePin(7_001);
        let parsed = GamePin::from_str(&pin.to_string()).unwrap();
        assert_eq!(parsed, pin);
    }

    #[test]
    fn test_pin_from_str_rejects_wrong_length() {
        assert_eq!(GamePin::from_str("12345"), Err(ParsePinError::WrongLength));
        assert_eq!(GamePin::from_str("1234567"), Err(ParsePinError::WrongLength));
        assert_eq!(GamePin::from_str(""), Err(ParsePinError::WrongLength));
    }

    #[test]
    fn test_pin_from_str_rejects_non_numeric() {
        assert!(matches!(
            GamePin::from_str("12a456"),
            Err(ParsePinError::NotNumeric(_))
        ));
        assert!(matches!(
            GamePin::from_str("-12345"),
            Err(ParsePinError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_pin_serialization() {
        let pin = GamePin(123);
        let serialized = serde_json::to_string(&pin).unwrap();
        assert_eq!(serialized, "\"000123\"");

        let deserialized: GamePin = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, pin);
    }

    #[test]
    fn test_pin_deserialization_rejects_number() {
        let result: Result<GamePin, _> = serde_json::from_str("123456");
        assert!(result.is_err());
    }

    #[test]
    fn test_join_url() {
        let pin = GamePin(31_337);
        assert_eq!(
            join_url("https://quiz.example", pin),
            "https://quiz.example?pin=031337"
        );
    }
}
