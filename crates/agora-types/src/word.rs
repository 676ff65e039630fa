use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a word cloud entry, wrapping a UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordId(pub Uuid);

impl WordId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for WordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One entry in the word cloud.
///
/// Words are deduplicated case-insensitively: "Rust" and "rust" share a row.
/// `text` keeps the casing of the first submission; `value` counts every
/// submission since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub value: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of submitting a word: the stored entry plus whether this
/// submission created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSubmission {
    pub word: Word,
    pub is_new: bool,
}

/// One row of the stats leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopWord {
    pub text: String,
    pub value: i64,
}

/// Aggregate view of the word cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    /// Number of distinct words.
    pub total_words: u64,
    /// Sum of all values (every submission ever).
    pub total_submissions: i64,
    pub max_value: i64,
    pub min_value: i64,
    /// Up to ten words with the highest values, descending.
    pub top_words: Vec<TopWord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_id_display_roundtrip() {
        let id = WordId::new();
        let parsed: WordId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_word_serde_roundtrip() {
        let word = Word {
            id: WordId::new(),
            text: "Rust".to_string(),
            value: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&word).unwrap();
        let parsed: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, word);
    }

    #[test]
    fn test_word_stats_default_is_zeroed() {
        let stats = WordStats::default();
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.total_submissions, 0);
        assert!(stats.top_words.is_empty());
    }
}
