//! Shared error types for the services crate.

use quiz_core::QuizError;
use thiserror::Error;

/// Errors emitted while acquiring a quiz from the generator.
///
/// The session controller turns every variant into a user-facing message and
/// a return to the menu, so none of these reach the presentation layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("quiz generation is not configured (set GROQ_API_KEY)")]
    Disabled,
    #[error("generator returned status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("generator returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    InvalidDocument(#[from] QuizError),
    #[error("{0}")]
    Rejected(String),
}
