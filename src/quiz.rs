//! Quiz data model and validation
//!
//! A quiz is an ordered sequence of timed questions, each carrying a set
//! of shape-keyed answers. The shape set doubles as the UI layout and the
//! answer identifier, so each question uses each shape at most once per
//! visual slot. Once a game session starts the quiz is immutable.

use enum_map::Enum;
use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants;

/// The fixed set of answer slots shared by every question
///
/// Shapes identify answers on the wire and position them on screen at the
/// same time. The set is closed; there is no fifth slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    /// Top-left slot
    Triangle,
    /// Top-right slot
    Diamond,
    /// Bottom-left slot
    Circle,
    /// Bottom-right slot
    Square,
}

/// A single answer option keyed by its shape slot
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// The answer text shown in the shape's slot
    #[garde(length(max = constants::question::MAX_ANSWER_TEXT_LENGTH))]
    pub text: String,
    /// Whether selecting this answer scores points
    #[garde(skip)]
    pub correct: bool,
    /// The slot (and wire identifier) of this answer
    #[garde(skip)]
    pub shape: Shape,
}

fn default_points() -> u32 {
    constants::question::DEFAULT_POINTS
}

/// A single timed question
///
/// The data model does not enforce that at least one answer is correct; a
/// question without one is legal but every submission for it scores zero.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The question text displayed on the shared screen
    #[garde(length(max = constants::question::MAX_TEXT_LENGTH))]
    pub text: String,
    /// Seconds players have to answer once the question starts
    #[garde(range(min = constants::question::MIN_TIME_LIMIT, max = constants::question::MAX_TIME_LIMIT))]
    pub time_limit: u32,
    /// Optional image shown alongside the question
    #[garde(skip)]
    pub image_url: Option<String>,
    /// Maximum score for this question, before the streak bonus
    #[garde(range(min = 1, max = constants::question::MAX_POINTS))]
    #[serde(default = "default_points")]
    pub points: u32,
    /// The shape-keyed answer set (by convention one answer per shape)
    #[garde(length(max = constants::question::MAX_ANSWER_COUNT), dive)]
    pub answers: Vec<Answer>,
}

impl Question {
    /// Looks up the answer occupying a shape slot, if any
    pub fn answer_for(&self, shape: Shape) -> Option<&Answer> {
        self.answers.iter().find(|a| a.shape == shape)
    }

    /// Whether submitting the given shape is a correct answer
    ///
    /// A shape with no answer behind it is simply incorrect; transient
    /// races between phase transitions and in-flight submissions must
    /// never crash the host.
    pub fn is_correct(&self, shape: Shape) -> bool {
        self.answer_for(shape).is_some_and(|a| a.correct)
    }
}

/// A complete quiz: a title and an ordered list of questions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// The quiz title, shown in the lobby and persisted with the session
    #[garde(length(max = constants::quiz::MAX_TITLE_LENGTH))]
    pub title: String,
    /// The ordered question sequence
    #[garde(length(max = constants::quiz::MAX_QUESTION_COUNT), dive)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Returns the number of questions in this quiz
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Checks whether this quiz has no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Quiz fixtures shared by tests across the crate.

    use super::*;

    /// A four-answer question where [`Shape::Triangle`] is correct.
    pub(crate) fn sample_question(time_limit: u32, points: u32) -> Question {
        Question {
            text: "What is the capital of France?".to_string(),
            time_limit,
            image_url: None,
            points,
            answers: vec![
                Answer {
                    text: "Paris".to_string(),
                    correct: true,
                    shape: Shape::Triangle,
                },
                Answer {
                    text: "Lyon".to_string(),
                    correct: false,
                    shape: Shape::Diamond,
                },
                Answer {
                    text: "Marseille".to_string(),
                    correct: false,
                    shape: Shape::Circle,
                },
                Answer {
                    text: "Nice".to_string(),
                    correct: false,
                    shape: Shape::Square,
                },
            ],
        }
    }

    /// A two-question quiz with the default point value.
    pub(crate) fn sample_quiz() -> Quiz {
        Quiz {
            title: "Geography".to_string(),
            questions: vec![sample_question(20, 100), sample_question(20, 100)],
        }
    }
}
