mod difficulty;
mod outcome;
mod quiz;

pub use difficulty::{Difficulty, DifficultyError};
pub use outcome::{Outcome, PASS_PERCENT};
pub use quiz::{Choice, Question, QuizData, QuizError};
