#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod session;

pub use error::GenerationError;
pub use generator::{ChatQuizGenerator, GeneratorConfig, QuizGenerator};
pub use session::{
    AnswerResult, EMPTY_SUBJECT_MESSAGE, Effect, GenerationTicket, PersistRequest, Phase,
    QuizSessionService, SessionController, SessionIntent, SessionSnapshot,
};
