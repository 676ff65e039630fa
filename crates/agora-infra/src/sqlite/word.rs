//! SQLite word cloud repository implementation.
//!
//! Implements `WordRepository` from `agora-core`. Case-insensitive dedup
//! rides on the UNIQUE `text_lower` column: a submission is one UPSERT, so
//! two racing submissions of "Rust" and "rust" still land on a single row.

use agora_core::repository::word::WordRepository;
use agora_types::error::RepositoryError;
use agora_types::word::{TopWord, Word, WordId, WordStats, WordSubmission};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `WordRepository`.
pub struct SqliteWordRepository {
    pool: DatabasePool,
}

impl SqliteWordRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Word.
struct WordRow {
    id: String,
    text: String,
    value: i64,
    created_at: String,
    updated_at: String,
}

impl WordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            value: row.try_get("value")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_word(self) -> Result<Word, RepositoryError> {
        let id = self
            .id
            .parse::<WordId>()
            .map_err(|e| RepositoryError::Query(format!("invalid word id: {e}")))?;

        Ok(Word {
            id,
            text: self.text,
            value: self.value,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl WordRepository for SqliteWordRepository {
    async fn list_all(&self) -> Result<Vec<Word>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM wordcloud ORDER BY value DESC, text_lower ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut words = Vec::with_capacity(rows.len());
        for row in &rows {
            let word_row =
                WordRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            words.push(word_row.into_word()?);
        }

        Ok(words)
    }

    async fn upsert_word(&self, text: &str) -> Result<WordSubmission, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let text_lower = text.to_lowercase();

        // Transaction keeps the UPSERT and the read-back on one writer
        // connection, so the value we report is the value we wrote.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO wordcloud (id, text, text_lower, value, created_at, updated_at)
             VALUES (?, ?, ?, 1, ?, ?)
             ON CONFLICT(text_lower) DO UPDATE SET value = value + 1, updated_at = excluded.updated_at",
        )
        .bind(WordId::new().to_string())
        .bind(text)
        .bind(&text_lower)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let row = sqlx::query("SELECT * FROM wordcloud WHERE text_lower = ?")
            .bind(&text_lower)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let word = WordRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_word()?;

        // Values only ever grow, so 1 means this call created the row.
        let is_new = word.value == 1;
        Ok(WordSubmission { word, is_new })
    }

    async fn stats(&self) -> Result<WordStats, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_words,
                    COALESCE(SUM(value), 0) AS total_submissions,
                    COALESCE(MAX(value), 0) AS max_value,
                    COALESCE(MIN(value), 0) AS min_value
             FROM wordcloud",
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let total_words: i64 = row
            .try_get("total_words")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let total_submissions: i64 = row
            .try_get("total_submissions")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let max_value: i64 = row
            .try_get("max_value")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let min_value: i64 = row
            .try_get("min_value")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let top_rows = sqlx::query(
            "SELECT text, value FROM wordcloud ORDER BY value DESC, text_lower ASC LIMIT 10",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut top_words = Vec::with_capacity(top_rows.len());
        for row in &top_rows {
            let text: String = row
                .try_get("text")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let value: i64 = row
                .try_get("value")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            top_words.push(TopWord { text, value });
        }

        Ok(WordStats {
            total_words: total_words as u64,
            total_submissions,
            max_value,
            min_value,
            top_words,
        })
    }

    async fn delete(&self, id: &WordId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM wordcloud WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM wordcloud")
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_new_word() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        let submission = repo.upsert_word("Community").await.unwrap();
        assert!(submission.is_new);
        assert_eq!(submission.word.text, "Community");
        assert_eq!(submission.word.value, 1);
    }

    #[tokio::test]
    async fn test_upsert_dedups_case_insensitively() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        repo.upsert_word("Rust").await.unwrap();
        let second = repo.upsert_word("rust").await.unwrap();
        assert!(!second.is_new);
        assert_eq!(second.word.value, 2);
        // First submission's casing wins.
        assert_eq!(second.word.text, "Rust");

        let third = repo.upsert_word("RUST").await.unwrap();
        assert_eq!(third.word.value, 3);

        let words = repo.list_all().await.unwrap();
        assert_eq!(words.len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_value() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        repo.upsert_word("alpha").await.unwrap();
        repo.upsert_word("beta").await.unwrap();
        repo.upsert_word("beta").await.unwrap();

        let words = repo.list_all().await.unwrap();
        assert_eq!(words[0].text, "beta");
        assert_eq!(words[0].value, 2);
        assert_eq!(words[1].text, "alpha");
    }

    #[tokio::test]
    async fn test_stats() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        for _ in 0..3 {
            repo.upsert_word("alpha").await.unwrap();
        }
        repo.upsert_word("beta").await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_words, 2);
        assert_eq!(stats.total_submissions, 4);
        assert_eq!(stats.max_value, 3);
        assert_eq!(stats.min_value, 1);
        assert_eq!(stats.top_words.len(), 2);
        assert_eq!(stats.top_words[0].text, "alpha");
    }

    #[tokio::test]
    async fn test_stats_empty_cloud() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.total_submissions, 0);
        assert!(stats.top_words.is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        let first = repo.upsert_word("alpha").await.unwrap();
        repo.upsert_word("beta").await.unwrap();

        assert!(repo.delete(&first.word.id).await.unwrap());
        assert!(!repo.delete(&WordId::new()).await.unwrap());

        assert_eq!(repo.clear().await.unwrap(), 1);
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_word_recreated_after_delete_is_new() {
        let pool = test_pool().await;
        let repo = SqliteWordRepository::new(pool);

        let first = repo.upsert_word("phoenix").await.unwrap();
        repo.upsert_word("phoenix").await.unwrap();
        repo.delete(&first.word.id).await.unwrap();

        let reborn = repo.upsert_word("phoenix").await.unwrap();
        assert!(reborn.is_new);
        assert_eq!(reborn.word.value, 1);
    }
}
