use quiz_core::{Difficulty, Outcome, QuizData};
use tracing::{debug, info, warn};

use super::state::{Phase, SessionSnapshot, Stage};
use crate::error::GenerationError;

pub const EMPTY_SUBJECT_MESSAGE: &str = "Please enter a subject!";

//
// ─── INTENTS AND EFFECTS ───────────────────────────────────────────────────────
//

/// Everything the presentation layer can ask of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    SetSubject(String),
    SetDifficulty(Difficulty),
    Start,
    SubmitAnswer(usize),
    Restart,
}

/// Work the caller must perform after an intent was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Generate(GenerationTicket),
}

/// A pending generation request, stamped with the epoch it was issued under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
    subject: String,
    difficulty: Difficulty,
}

impl GenerationTicket {
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// Archive request produced by a successful generation. Carries the raw
/// document text, not the parsed quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistRequest {
    pub epoch: u64,
    pub subject: String,
    pub document: String,
}

/// Result of answering the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerResult {
    pub correct: bool,
    pub is_complete: bool,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns the session state and every transition of the quiz flow.
///
/// The controller never awaits anything. Async work leaves as a
/// [`GenerationTicket`] or [`PersistRequest`] and comes back through
/// [`SessionController::finish_generation`]. Events that are not valid in the
/// current phase are no-ops.
#[derive(Debug, Clone)]
pub struct SessionController {
    subject: String,
    difficulty: Difficulty,
    stage: Stage,
    epoch: u64,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subject: String::new(),
            difficulty: Difficulty::default(),
            stage: Stage::Menu { error: None },
            epoch: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Epoch of the most recently issued generation request.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizData> {
        match &self.stage {
            Stage::Playing { quiz, .. } | Stage::Result { quiz, .. } => Some(quiz),
            Stage::Menu { .. } | Stage::Loading { .. } => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> usize {
        match &self.stage {
            Stage::Playing { score, .. } | Stage::Result { score, .. } => *score,
            Stage::Menu { .. } | Stage::Loading { .. } => 0,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        match &self.stage {
            Stage::Playing { index, .. } => *index,
            Stage::Result { quiz, .. } => quiz.len().saturating_sub(1),
            Stage::Menu { .. } | Stage::Loading { .. } => 0,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.stage {
            Stage::Menu { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Apply an intent. Only `Start` can produce an effect.
    pub fn dispatch(&mut self, intent: SessionIntent) -> Option<Effect> {
        match intent {
            SessionIntent::SetSubject(subject) => {
                self.set_subject(subject);
                None
            }
            SessionIntent::SetDifficulty(difficulty) => {
                self.set_difficulty(difficulty);
                None
            }
            SessionIntent::Start => self.start().map(Effect::Generate),
            SessionIntent::SubmitAnswer(choice) => {
                self.submit_answer(choice);
                None
            }
            SessionIntent::Restart => {
                self.restart();
                None
            }
        }
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        if matches!(self.stage, Stage::Menu { .. }) {
            self.subject = subject.into();
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if matches!(self.stage, Stage::Menu { .. }) {
            self.difficulty = difficulty;
        }
    }

    /// Leave the menu and request a quiz.
    ///
    /// Returns `None` (and sets the inline error) for a blank subject, or when
    /// not in `Menu`.
    pub fn start(&mut self) -> Option<GenerationTicket> {
        let Stage::Menu { error } = &mut self.stage else {
            return None;
        };

        let subject = self.subject.trim();
        if subject.is_empty() {
            *error = Some(EMPTY_SUBJECT_MESSAGE.to_string());
            return None;
        }
        let subject = subject.to_string();

        self.epoch += 1;
        self.stage = Stage::Loading { epoch: self.epoch };
        info!(
            epoch = self.epoch,
            %subject,
            difficulty = %self.difficulty,
            "quiz generation requested"
        );

        Some(GenerationTicket {
            epoch: self.epoch,
            subject,
            difficulty: self.difficulty,
        })
    }

    /// Feed back the outcome of the generation request issued under `epoch`.
    ///
    /// A completion for any other epoch, or outside `Loading`, is stale and
    /// ignored. On success the session enters `Playing` and the returned
    /// request should be archived without awaiting it.
    pub fn finish_generation(
        &mut self,
        epoch: u64,
        result: Result<String, GenerationError>,
    ) -> Option<PersistRequest> {
        match self.stage {
            Stage::Loading { epoch: pending } if pending == epoch => {}
            _ => {
                debug!(
                    epoch,
                    current = self.epoch,
                    phase = ?self.phase(),
                    "ignoring stale generation result"
                );
                return None;
            }
        }

        let parsed = result.and_then(|raw| {
            let quiz = QuizData::from_json(&raw)?;
            Ok((quiz, raw))
        });

        match parsed {
            Ok((quiz, raw)) => {
                info!(epoch, questions = quiz.len(), "quiz ready");
                self.stage = Stage::Playing {
                    quiz,
                    index: 0,
                    score: 0,
                };
                Some(PersistRequest {
                    epoch,
                    subject: self.subject.trim().to_string(),
                    document: raw,
                })
            }
            Err(err) => {
                warn!(epoch, error = %err, "quiz generation failed");
                self.stage = Stage::Menu {
                    error: Some(format!("Failed to generate quiz: {err}")),
                };
                None
            }
        }
    }

    /// Answer the current question with the choice at `choice_index`.
    ///
    /// Scores a correct choice, then advances or finishes in the same step.
    /// Returns `None` outside `Playing` or for an index the question lacks.
    pub fn submit_answer(&mut self, choice_index: usize) -> Option<AnswerResult> {
        let Stage::Playing { quiz, index, score } = &mut self.stage else {
            return None;
        };

        let correct = quiz.question(*index)?.choice(choice_index)?.is_correct;
        if correct {
            *score += 1;
        }

        let is_complete = *index + 1 >= quiz.len();
        if is_complete {
            let stage = std::mem::replace(&mut self.stage, Stage::Menu { error: None });
            if let Stage::Playing { quiz, score, .. } = stage {
                info!(score, total = quiz.len(), "quiz finished");
                self.stage = Stage::Result { quiz, score };
            }
        } else {
            *index += 1;
        }

        Some(AnswerResult {
            correct,
            is_complete,
        })
    }

    /// Return to a fresh menu from the result screen. Keeps the difficulty.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.stage, Stage::Result { .. }) {
            return false;
        }
        self.epoch += 1;
        self.subject.clear();
        self.stage = Stage::Menu { error: None };
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let (current_question, total_questions, outcome) = match &self.stage {
            Stage::Playing { quiz, index, .. } => {
                (quiz.question(*index).cloned(), quiz.len(), None)
            }
            Stage::Result { quiz, score } => (
                None,
                quiz.len(),
                Some(Outcome::classify(*score, quiz.len())),
            ),
            Stage::Menu { .. } | Stage::Loading { .. } => (None, 0, None),
        };

        SessionSnapshot {
            phase: self.phase(),
            subject: self.subject.clone(),
            difficulty: self.difficulty,
            current_question,
            current_question_index: self.current_index(),
            total_questions,
            score: self.score(),
            error_message: self.error_message().map(str::to_string),
            outcome,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
