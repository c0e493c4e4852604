use crate::language::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat turn: the text as typed plus its translation into the partner's
/// language. Immutable once stored; the store only ever appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Strictly increasing within a store; assigned at append, never reused.
    pub id: i64,
    pub sender_id: String,
    pub original_text: String,
    pub original_language: Language,
    pub translated_text: String,
    pub created_at: DateTime<Utc>,
}

/// A message before the store has assigned it an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub sender_id: String,
    pub original_text: String,
    pub original_language: Language,
    pub translated_text: String,
    pub created_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(
        sender_id: impl Into<String>,
        original_text: impl Into<String>,
        original_language: Language,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            original_text: original_text.into(),
            original_language,
            translated_text: translated_text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn into_message(self, id: i64) -> Message {
        Message {
            id,
            sender_id: self.sender_id,
            original_text: self.original_text,
            original_language: self.original_language,
            translated_text: self.translated_text,
            created_at: self.created_at,
        }
    }
}
