#![forbid(unsafe_code)]

pub mod model;
pub mod time;

pub use model::{Choice, Difficulty, Outcome, Question, QuizData, QuizError};
pub use time::Clock;
