use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::Clock;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::fs::FsQuizArchive;
use crate::sqlite::{SqliteInitError, SqliteQuizArchive};

/// Errors surfaced by archive adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Receipt for a quiz document written to an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuiz {
    pub subject: String,
    pub location: String,
    pub saved_at: DateTime<Utc>,
}

/// Write-only store for generated quiz documents, keyed by subject.
///
/// The document is stored as the raw serialized text the generator produced.
#[async_trait]
pub trait QuizArchive: Send + Sync {
    /// Persist a quiz document under the given subject.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn save_quiz(&self, subject: &str, document: &str) -> Result<SavedQuiz, StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedQuiz {
    pub subject: String,
    pub document: String,
    pub saved_at: DateTime<Utc>,
}

/// Simple in-memory archive for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuizArchive {
    clock: Clock,
    entries: Arc<Mutex<Vec<ArchivedQuiz>>>,
}

impl InMemoryQuizArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Snapshot of everything saved so far, in save order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn saved(&self) -> Result<Vec<ArchivedQuiz>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl QuizArchive for InMemoryQuizArchive {
    async fn save_quiz(&self, subject: &str, document: &str) -> Result<SavedQuiz, StorageError> {
        let saved_at = self.clock.now();
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(ArchivedQuiz {
            subject: subject.to_string(),
            document: document.to_string(),
            saved_at,
        });
        Ok(SavedQuiz {
            subject: subject.to_string(),
            location: format!("memory:{}", guard.len()),
            saved_at,
        })
    }
}

/// Holds the configured archive behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizArchive>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            quizzes: Arc::new(InMemoryQuizArchive::new()),
        }
    }

    #[must_use]
    pub fn filesystem(root: impl Into<PathBuf>, clock: Clock) -> Self {
        Self {
            quizzes: Arc::new(FsQuizArchive::new(root, clock)),
        }
    }

    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str, clock: Clock) -> Result<Self, SqliteInitError> {
        let repo = SqliteQuizArchive::connect(database_url).await?.with_clock(clock);
        repo.migrate().await?;
        Ok(Self {
            quizzes: Arc::new(repo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::{fixed_clock, fixed_now};

    #[tokio::test]
    async fn in_memory_archive_keeps_raw_documents_in_order() {
        let archive = InMemoryQuizArchive::new().with_clock(fixed_clock());
        let first = archive.save_quiz("Space", "{\"a\":1}").await.unwrap();
        let second = archive.save_quiz("Rust", "{ \"b\" : 2 }").await.unwrap();

        assert_eq!(first.location, "memory:1");
        assert_eq!(second.location, "memory:2");
        assert_eq!(second.saved_at, fixed_now());

        let saved = archive.saved().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].subject, "Space");
        assert_eq!(saved[1].document, "{ \"b\" : 2 }");
    }

    #[tokio::test]
    async fn storage_in_memory_exposes_archive() {
        let storage = Storage::in_memory();
        let saved = storage.quizzes.save_quiz("Space", "{}").await.unwrap();
        assert_eq!(saved.subject, "Space");
    }
}
