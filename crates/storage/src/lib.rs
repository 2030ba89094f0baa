#![forbid(unsafe_code)]

pub mod fs;
pub mod repository;
pub mod sqlite;

pub use fs::FsQuizArchive;
pub use repository::{
    ArchivedQuiz, InMemoryQuizArchive, QuizArchive, SavedQuiz, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteQuizArchive};
