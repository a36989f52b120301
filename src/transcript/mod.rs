//! Session transcript: the ordered log of chat entries.
//!
//! Owned by the chat controller and passed explicitly to whatever renders
//! or exports it. Append-only; grows for the lifetime of the session.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person typing messages.
    User,
    /// The paper assistant's answer.
    Assistant,
    /// A stream or request failure surfaced inline.
    Error,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Who produced the entry.
    pub role: Role,
    /// The entry's text, without speaker labels.
    pub content: String,
}

/// Error type for transcript export.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// Nothing to export.
    #[error("no chat history to export")]
    Empty,
    /// Failed to write the export file.
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only session transcript.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(Entry {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Append an assistant answer.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(Entry {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// Append an inline error entry.
    pub fn push_error(&mut self, content: impl Into<String>) {
        self.entries.push(Entry {
            role: Role::Error,
            content: content.into(),
        });
    }

    /// The transcript's visible text: what the chat log shows, and what an
    /// export file contains.
    pub fn visible_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| match e.role {
                Role::User => format!("**You**: {}", e.content),
                Role::Assistant => format!("**Paper assistant**:\n\n{}", e.content),
                Role::Error => format!("**Error**: {}", e.content),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Whether the visible text is blank (no entries, or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.visible_text().trim().is_empty()
    }

    /// Export the visible text to `chat_history_<date>.txt` under `dir`.
    ///
    /// A blank transcript produces no file and returns
    /// [`TranscriptError::Empty`].
    pub fn export_to(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, TranscriptError> {
        if self.is_blank() {
            return Err(TranscriptError::Empty);
        }
        let path = dir.join(export_file_name(date));
        fs::write(&path, self.visible_text())?;
        Ok(path)
    }
}

/// Export file name for a given date: `chat_history_YYYY-MM-DD.txt`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("chat_history_{}.txt", date.format("%Y-%m-%d"))
}
