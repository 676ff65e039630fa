//! SQLite comment repository implementation.
//!
//! Implements `CommentRepository` from `agora-core`. Like state is a join
//! table plus a denormalized `like_count` on the comment row; every flip
//! runs in one writer transaction so the two can never disagree.

use std::collections::{HashMap, HashSet};

use agora_core::repository::comment::CommentRepository;
use agora_types::comment::{Comment, CommentId, CommentStats, LikeAction, LikeToggle};
use agora_types::error::RepositoryError;
use agora_types::identity::{CallerIdentity, ResourceId};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CommentRepository`.
pub struct SqliteCommentRepository {
    pool: DatabasePool,
}

impl SqliteCommentRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Comment.
struct CommentRow {
    id: String,
    resource_id: String,
    body: String,
    author_name: String,
    author_identity: String,
    like_count: i64,
    created_at: String,
    updated_at: String,
}

impl CommentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            resource_id: row.try_get("resource_id")?,
            body: row.try_get("body")?,
            author_name: row.try_get("author_name")?,
            author_identity: row.try_get("author_identity")?,
            like_count: row.try_get("like_count")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_comment(self, liked_by: HashSet<CallerIdentity>) -> Result<Comment, RepositoryError> {
        let id = self
            .id
            .parse::<CommentId>()
            .map_err(|e| RepositoryError::Query(format!("invalid comment id: {e}")))?;

        Ok(Comment {
            id,
            resource_id: ResourceId::new(self.resource_id),
            body: self.body,
            author_name: self.author_name,
            author_identity: CallerIdentity::new(self.author_identity),
            like_count: self.like_count,
            liked_by,
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

impl CommentRepository for SqliteCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<Comment, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO comments (id, resource_id, body, author_name, author_identity, like_count, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(comment.id.to_string())
        .bind(comment.resource_id.as_str())
        .bind(&comment.body)
        .bind(&comment.author_name)
        .bind(comment.author_identity.as_str())
        .bind(comment.like_count)
        .bind(format_datetime(&comment.created_at))
        .bind(format_datetime(&comment.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(comment.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("comment '{}' already exists", comment.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get(&self, id: &CommentId) -> Result<Option<Comment>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let comment_row =
            CommentRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let like_rows = sqlx::query("SELECT identity FROM comment_likes WHERE comment_id = ?")
            .bind(id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut liked_by = HashSet::with_capacity(like_rows.len());
        for row in &like_rows {
            let identity: String = row
                .try_get("identity")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            liked_by.insert(CallerIdentity::new(identity));
        }

        Ok(Some(comment_row.into_comment(liked_by)?))
    }

    async fn list_for_resource(
        &self,
        resource_id: &ResourceId,
    ) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM comments WHERE resource_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(resource_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let like_rows = sqlx::query(
            "SELECT cl.comment_id, cl.identity FROM comment_likes cl
             JOIN comments c ON c.id = cl.comment_id
             WHERE c.resource_id = ?",
        )
        .bind(resource_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut likes_by_comment: HashMap<String, HashSet<CallerIdentity>> = HashMap::new();
        for row in &like_rows {
            let comment_id: String = row
                .try_get("comment_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let identity: String = row
                .try_get("identity")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            likes_by_comment
                .entry(comment_id)
                .or_default()
                .insert(CallerIdentity::new(identity));
        }

        let mut comments = Vec::with_capacity(rows.len());
        for row in &rows {
            let comment_row =
                CommentRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let liked_by = likes_by_comment
                .remove(&comment_row.id)
                .unwrap_or_default();
            comments.push(comment_row.into_comment(liked_by)?);
        }

        Ok(comments)
    }

    async fn toggle_like(
        &self,
        id: &CommentId,
        identity: &CallerIdentity,
    ) -> Result<Option<LikeToggle>, RepositoryError> {
        let now = format_datetime(&Utc::now());

        // One transaction: existence check, membership flip, counter update.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let current = sqlx::query("SELECT like_count FROM comments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(current) = current else {
            return Ok(None);
        };
        let like_count: i64 = current
            .try_get("like_count")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let removed = sqlx::query(
            "DELETE FROM comment_likes WHERE comment_id = ? AND identity = ?",
        )
        .bind(id.to_string())
        .bind(identity.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let (action, delta) = if removed.rows_affected() == 1 {
            (LikeAction::Unliked, -1)
        } else {
            sqlx::query(
                "INSERT INTO comment_likes (comment_id, identity, created_at) VALUES (?, ?, ?)",
            )
            .bind(id.to_string())
            .bind(identity.as_str())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
            (LikeAction::Liked, 1)
        };

        sqlx::query("UPDATE comments SET like_count = like_count + ?, updated_at = ? WHERE id = ?")
            .bind(delta)
            .bind(&now)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Some(LikeToggle {
            action,
            like_count: like_count + delta,
        }))
    }

    async fn stats_for_resource(
        &self,
        resource_id: &ResourceId,
    ) -> Result<CommentStats, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS cnt, MAX(created_at) AS latest FROM comments WHERE resource_id = ?",
        )
        .bind(resource_id.as_str())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let latest: Option<String> = row
            .try_get("latest")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(CommentStats {
            count: count as u64,
            latest_comment_at: latest.as_deref().map(parse_datetime).transpose()?,
        })
    }

    async fn all_stats(&self) -> Result<Vec<(ResourceId, CommentStats)>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT resource_id, COUNT(*) AS cnt, MAX(created_at) AS latest
             FROM comments GROUP BY resource_id",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut stats = Vec::with_capacity(rows.len());
        for row in &rows {
            let resource_id: String = row
                .try_get("resource_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let count: i64 = row
                .try_get("cnt")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let latest: Option<String> = row
                .try_get("latest")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            stats.push((
                ResourceId::new(resource_id),
                CommentStats {
                    count: count as u64,
                    latest_comment_at: latest.as_deref().map(parse_datetime).transpose()?,
                },
            ));
        }

        Ok(stats)
    }
}
