use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a generated quiz document is rejected at ingest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("malformed quiz document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {question} has {count} choices, at least 2 are required")]
    TooFewChoices { question: usize, count: usize },

    #[error("question {question} has {count} correct choices, exactly 1 is required")]
    CorrectChoiceCount { question: usize, count: usize },
}

//
// ─── QUIZ TYPES ────────────────────────────────────────────────────────────────
//

/// One selectable answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
}

impl Choice {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A question with its choices in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub choices: Vec<Choice>,
}

impl Question {
    #[must_use]
    pub fn new(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.choices.iter().filter(|c| c.is_correct).count()
    }
}

/// A complete generated quiz document.
///
/// `difficulty` is whatever label the generator echoed back. The session uses
/// the level the player picked, so any string is accepted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizData {
    pub subject: String,
    #[serde(default)]
    pub difficulty: String,
    pub questions: Vec<Question>,
}

impl QuizData {
    /// Parse a serialized quiz document and check that it is playable.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Malformed` when the body does not match the document
    /// shape, and the structural variants when [`QuizData::validate`] fails.
    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let quiz: QuizData = serde_json::from_str(raw)?;
        quiz.validate()?;
        Ok(quiz)
    }

    /// Check the structural invariants a session relies on: at least one
    /// question, and every question has 2+ choices with exactly one correct.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in question order.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        for (index, question) in self.questions.iter().enumerate() {
            let count = question.choices.len();
            if count < 2 {
                return Err(QuizError::TooFewChoices {
                    question: index,
                    count,
                });
            }
            let correct = question.correct_count();
            if correct != 1 {
                return Err(QuizError::CorrectChoiceCount {
                    question: index,
                    count: correct,
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
