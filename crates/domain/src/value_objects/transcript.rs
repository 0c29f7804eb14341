//! Conversation transcript value objects.

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Player,
    Ai,
}

/// A single line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Speaker,
    pub text: String,
    /// Unix epoch milliseconds
    pub timestamp_ms: i64,
}

impl TranscriptEntry {
    pub fn player(text: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            role: Speaker::Player,
            text: text.into(),
            timestamp_ms,
        }
    }

    pub fn ai(text: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            role: Speaker::Ai,
            text: text.into(),
            timestamp_ms,
        }
    }
}

/// Append-only, ordered conversation log.
///
/// Only the session aggregate can append; nothing can remove or reorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// True when the newest entry is a player message still waiting for
    /// the AI's answer.
    pub fn awaiting_reply(&self) -> bool {
        matches!(self.last(), Some(entry) if entry.role == Speaker::Player)
    }
}
