//! Word cloud repository trait definition.

use agora_types::error::RepositoryError;
use agora_types::word::{Word, WordId, WordStats, WordSubmission};

/// Repository trait for word cloud persistence.
///
/// Implementations live in agora-infra (e.g., SqliteWordRepository).
pub trait WordRepository: Send + Sync {
    /// All words, highest value first.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Word>, RepositoryError>> + Send;

    /// Atomically increment the word matching `text` case-insensitively, or
    /// insert a fresh entry with value 1. The stored `text` keeps the casing
    /// of the first submission.
    fn upsert_word(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<WordSubmission, RepositoryError>> + Send;

    /// Aggregate stats including the top ten words by value.
    fn stats(
        &self,
    ) -> impl std::future::Future<Output = Result<WordStats, RepositoryError>> + Send;

    /// Delete one word. Returns true when a row was removed.
    fn delete(
        &self,
        id: &WordId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete every word. Returns the number of rows removed.
    fn clear(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
