//! Word cloud service.
//!
//! Visitors submit single words; submissions of the same word (compared
//! case-insensitively) pile onto one entry whose value drives its size in
//! the rendered cloud.

use std::time::Duration;

use agora_types::error::EngagementError;
use agora_types::word::{Word, WordId, WordStats, WordSubmission};

use crate::repository::word::WordRepository;
use crate::service::guard::bounded;

/// Service for the word cloud.
pub struct WordCloudService<R: WordRepository> {
    repo: R,
    op_timeout: Duration,
}

impl<R: WordRepository> WordCloudService<R> {
    pub fn new(repo: R, op_timeout: Duration) -> Self {
        Self { repo, op_timeout }
    }

    /// All words, highest value first.
    pub async fn all_words(&self) -> Result<Vec<Word>, EngagementError> {
        bounded(self.op_timeout, "word list", self.repo.list_all()).await
    }

    /// Record a submission: increment the existing entry matching the text
    /// case-insensitively, or create a new one with value 1.
    pub async fn submit_word(&self, text: &str) -> Result<WordSubmission, EngagementError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngagementError::Validation(
                "word text cannot be empty".to_string(),
            ));
        }

        let submission = bounded(self.op_timeout, "word upsert", self.repo.upsert_word(text)).await?;
        tracing::debug!(
            word = %submission.word.text,
            value = submission.word.value,
            is_new = submission.is_new,
            "word recorded"
        );
        Ok(submission)
    }

    /// Aggregate stats including the top ten words.
    pub async fn word_stats(&self) -> Result<WordStats, EngagementError> {
        bounded(self.op_timeout, "word stats", self.repo.stats()).await
    }

    /// Remove one word. Returns false when the id matched nothing.
    pub async fn delete_word(&self, id: &WordId) -> Result<bool, EngagementError> {
        let removed = bounded(self.op_timeout, "word delete", self.repo.delete(id)).await?;
        if removed {
            tracing::info!(word_id = %id, "word deleted");
        }
        Ok(removed)
    }

    /// Wipe the cloud. Returns the number of words removed.
    pub async fn clear_words(&self) -> Result<u64, EngagementError> {
        let removed = bounded(self.op_timeout, "word clear", self.repo.clear()).await?;
        tracing::info!(removed, "word cloud cleared");
        Ok(removed)
    }
}
