use super::SqliteQuizArchive;
use crate::repository::{QuizArchive, SavedQuiz, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuizArchive for SqliteQuizArchive {
    async fn save_quiz(&self, subject: &str, document: &str) -> Result<SavedQuiz, StorageError> {
        let saved_at = self.clock.now();
        let res = sqlx::query(
            r"
                INSERT INTO saved_quizzes (subject, document, saved_at)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(subject)
        .bind(document)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(SavedQuiz {
            subject: subject.to_string(),
            location: format!("sqlite:{}", res.last_insert_rowid()),
            saved_at,
        })
    }
}
