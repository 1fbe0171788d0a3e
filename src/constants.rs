//! Configuration constants for the party quiz system
//!
//! This module contains the limits and defaults used throughout the
//! game core to keep quiz definitions, sessions, and scoring within
//! consistent boundaries.

/// Quiz definition constants
pub mod quiz {
    /// Maximum number of questions allowed in a single quiz
    pub const MAX_QUESTION_COUNT: usize = 100;
    /// Maximum length of a quiz title in characters
    pub const MAX_TITLE_LENGTH: usize = 200;
}

/// Question constants
pub mod question {
    /// Maximum length of the question text in characters
    pub const MAX_TEXT_LENGTH: usize = 200;
    /// Maximum length of a single answer text in characters
    pub const MAX_ANSWER_TEXT_LENGTH: usize = 200;
    /// Minimum time limit in seconds for answering a question
    pub const MIN_TIME_LIMIT: u32 = 5;
    /// Maximum time limit in seconds for answering a question
    pub const MAX_TIME_LIMIT: u32 = 240;
    /// Maximum number of answers (one per shape slot by convention)
    pub const MAX_ANSWER_COUNT: usize = 4;
    /// Maximum points a correct answer can be worth
    pub const MAX_POINTS: u32 = 10_000;
    /// Points a correct answer is worth when the quiz does not say otherwise
    pub const DEFAULT_POINTS: u32 = 100;
}

/// Session constants
pub mod session {
    /// Maximum number of players allowed in a single game session
    pub const MAX_PLAYER_COUNT: usize = 1000;
    /// Length of the pre-question countdown in seconds
    pub const COUNTDOWN_SECONDS: u32 = 5;
}

/// Scoring constants
pub mod scoring {
    /// Bonus points per consecutive correct answer beyond the first
    pub const STREAK_BONUS_STEP: u32 = 50;
    /// Upper bound on the streak bonus
    pub const STREAK_BONUS_CAP: u32 = 500;
}

/// Nickname constants
pub mod nickname {
    /// Maximum nickname length in characters
    pub const MAX_LENGTH: usize = 30;
}

/// Bonus mini-round constants
pub mod minigame {
    /// Minimum interval between accepted input vectors from one player
    pub const MIN_INPUT_INTERVAL_MS: u64 = 50;
}
