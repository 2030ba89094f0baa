use quiz_core::{Difficulty, Outcome, Question, QuizData};

/// The session's current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Loading,
    Playing,
    Result,
}

/// Phase plus the data that only exists in that phase.
///
/// Holding the quiz inside `Playing`/`Result` and the error inside `Menu`
/// keeps the session invariants true by construction.
#[derive(Debug, Clone)]
pub(crate) enum Stage {
    Menu { error: Option<String> },
    Loading { epoch: u64 },
    Playing { quiz: QuizData, index: usize, score: usize },
    Result { quiz: QuizData, score: usize },
}

impl Stage {
    pub(crate) fn phase(&self) -> Phase {
        match self {
            Stage::Menu { .. } => Phase::Menu,
            Stage::Loading { .. } => Phase::Loading,
            Stage::Playing { .. } => Phase::Playing,
            Stage::Result { .. } => Phase::Result,
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub subject: String,
    pub difficulty: Difficulty,
    pub current_question: Option<Question>,
    /// Zero-based index of the question on screen.
    pub current_question_index: usize,
    pub total_questions: usize,
    pub score: usize,
    pub error_message: Option<String>,
    /// Only set in `Result`; recomputed from score and question count.
    pub outcome: Option<Outcome>,
}
