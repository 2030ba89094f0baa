mod controller;
mod service;
mod state;

#[cfg(test)]
mod proptests;

// Public API of the session subsystem.
pub use controller::{
    AnswerResult, EMPTY_SUBJECT_MESSAGE, Effect, GenerationTicket, PersistRequest,
    SessionController, SessionIntent,
};
pub use service::QuizSessionService;
pub use state::{Phase, SessionSnapshot};
