//! Directory-per-subject archive on the local filesystem.
//!
//! Quizzes land in `<root>/<group>/<subject>_<unix_ts>.json`. `group` is the
//! first existing directory whose name overlaps the subject (either contains
//! the other, ignoring case), so "Space" and "Space Exploration" share a
//! folder. A new directory named after the subject is created otherwise.

use async_trait::async_trait;
use quiz_core::Clock;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::repository::{QuizArchive, SavedQuiz, StorageError};

#[derive(Debug, Clone)]
pub struct FsQuizArchive {
    root: PathBuf,
    clock: Clock,
}

impl FsQuizArchive {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, clock: Clock) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Make a subject safe to use as a single path component.
pub(crate) fn sanitize_component(subject: &str) -> String {
    let cleaned: String = subject
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.replace("..", "_");
    if cleaned.trim_matches('.').trim().is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

fn overlaps(subject: &str, dir_name: &str) -> bool {
    let subject = subject.to_lowercase();
    let dir_name = dir_name.to_lowercase();
    subject.contains(&dir_name) || dir_name.contains(&subject)
}

fn find_group_dir(root: &Path, subject: &str) -> Result<Option<PathBuf>, StorageError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    Ok(dirs.into_iter().find(|path| {
        path.file_name()
            .is_some_and(|name| overlaps(subject, &name.to_string_lossy()))
    }))
}

fn write_document(
    root: &Path,
    subject: &str,
    timestamp: i64,
    document: &str,
) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(root)?;

    let component = sanitize_component(subject);
    let target_dir = match find_group_dir(root, &component)? {
        Some(existing) => existing,
        None => root.join(&component),
    };
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{component}_{timestamp}.json"));
    fs::write(&file_path, document)?;
    Ok(file_path)
}

#[async_trait]
impl QuizArchive for FsQuizArchive {
    async fn save_quiz(&self, subject: &str, document: &str) -> Result<SavedQuiz, StorageError> {
        let saved_at = self.clock.now();
        let root = self.root.clone();
        let owned_subject = subject.to_string();
        let owned_document = document.to_string();
        let timestamp = saved_at.timestamp();

        let path = tokio::task::spawn_blocking(move || {
            write_document(&root, &owned_subject, timestamp, &owned_document)
        })
        .await
        .map_err(|e| StorageError::Io(e.to_string()))??;

        debug!(path = %path.display(), "quiz document written");
        Ok(SavedQuiz {
            subject: subject.to_string(),
            location: path.display().to_string(),
            saved_at,
        })
    }
}
