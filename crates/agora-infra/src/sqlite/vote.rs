//! SQLite vote repository implementation.
//!
//! Implements `VoteRepository` from `agora-core` using sqlx with split
//! read/write pools. The voter set lives in `vote_voters` with a composite
//! primary key, so adding a voter is `INSERT OR IGNORE`: the dedup check and
//! the insert are one statement, never a read-modify-write.

use std::collections::{HashMap, HashSet};

use agora_core::repository::vote::VoteRepository;
use agora_types::error::RepositoryError;
use agora_types::identity::{CallerIdentity, ResourceId};
use agora_types::vote::{VoteRecord, VoteStats};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `VoteRepository`.
pub struct SqliteVoteRepository {
    pool: DatabasePool,
}

impl SqliteVoteRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain VoteRecord.
struct VoteRecordRow {
    resource_id: String,
    created_at: String,
    updated_at: String,
}

impl VoteRecordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            resource_id: row.try_get("resource_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_record(self, voters: HashSet<CallerIdentity>) -> Result<VoteRecord, RepositoryError> {
        Ok(VoteRecord {
            resource_id: ResourceId::new(self.resource_id),
            voters,
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

impl VoteRepository for SqliteVoteRepository {
    async fn get_record(
        &self,
        resource_id: &ResourceId,
    ) -> Result<Option<VoteRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT resource_id, created_at, updated_at FROM vote_records WHERE resource_id = ?",
        )
        .bind(resource_id.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record_row =
            VoteRecordRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let voter_rows = sqlx::query("SELECT voter FROM vote_voters WHERE resource_id = ?")
            .bind(resource_id.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut voters = HashSet::with_capacity(voter_rows.len());
        for row in &voter_rows {
            let voter: String = row
                .try_get("voter")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            voters.insert(CallerIdentity::new(voter));
        }

        Ok(Some(record_row.into_record(voters)?))
    }

    async fn has_voted(
        &self,
        resource_id: &ResourceId,
        identity: &CallerIdentity,
    ) -> Result<bool, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS cnt FROM vote_voters WHERE resource_id = ? AND voter = ?",
        )
        .bind(resource_id.as_str())
        .bind(identity.as_str())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count > 0)
    }

    async fn add_voter(
        &self,
        resource_id: &ResourceId,
        identity: &CallerIdentity,
    ) -> Result<bool, RepositoryError> {
        let now = format_datetime(&Utc::now());

        // One transaction: ensure the record row, set-add the voter, and
        // stamp updated_at only when the voter was actually new. A duplicate
        // vote leaves the record byte-identical.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT OR IGNORE INTO vote_records (resource_id, created_at, updated_at)
             VALUES (?, ?, ?)",
        )
        .bind(resource_id.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO vote_voters (resource_id, voter, created_at)
             VALUES (?, ?, ?)",
        )
        .bind(resource_id.as_str())
        .bind(identity.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let newly_added = inserted.rows_affected() == 1;

        if newly_added {
            sqlx::query("UPDATE vote_records SET updated_at = ? WHERE resource_id = ?")
                .bind(&now)
                .bind(resource_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(newly_added)
    }

    async fn all_records(&self) -> Result<Vec<VoteRecord>, RepositoryError> {
        let record_rows =
            sqlx::query("SELECT resource_id, created_at, updated_at FROM vote_records")
                .fetch_all(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let voter_rows = sqlx::query("SELECT resource_id, voter FROM vote_voters")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut voters_by_resource: HashMap<String, HashSet<CallerIdentity>> = HashMap::new();
        for row in &voter_rows {
            let resource: String = row
                .try_get("resource_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let voter: String = row
                .try_get("voter")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            voters_by_resource
                .entry(resource)
                .or_default()
                .insert(CallerIdentity::new(voter));
        }

        let mut records = Vec::with_capacity(record_rows.len());
        for row in &record_rows {
            let record_row =
                VoteRecordRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let voters = voters_by_resource
                .remove(&record_row.resource_id)
                .unwrap_or_default();
            records.push(record_row.into_record(voters)?);
        }

        Ok(records)
    }

    async fn stats(&self) -> Result<VoteStats, RepositoryError> {
        let row = sqlx::query(
            "SELECT (SELECT COUNT(*) FROM vote_records) AS total_resources,
                    (SELECT COUNT(*) FROM vote_voters) AS total_votes",
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let total_resources: i64 = row
            .try_get("total_resources")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let total_votes: i64 = row
            .try_get("total_votes")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(VoteStats {
            total_resources: total_resources as u64,
            total_votes: total_votes as u64,
        })
    }
}
