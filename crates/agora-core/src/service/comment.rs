//! Comment service.
//!
//! Append-only comments with a like toggle. Liking is a pure toggle per
//! (comment, identity): present means remove-and-decrement, absent means
//! add-and-increment, resolved atomically by the repository so the count and
//! the membership set can never drift apart.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use agora_types::comment::{
    Comment, CommentId, CommentStats, DEFAULT_AUTHOR_NAME, LikeToggle, MAX_COMMENT_LEN,
};
use agora_types::error::EngagementError;
use agora_types::identity::{CallerIdentity, ResourceId};
use agora_types::outcome::{Outcome, Rejection};

use crate::repository::comment::CommentRepository;
use crate::service::guard::bounded;

/// Service for submitting, listing, and liking comments.
pub struct CommentService<R: CommentRepository> {
    repo: R,
    op_timeout: Duration,
}

impl<R: CommentRepository> CommentService<R> {
    pub fn new(repo: R, op_timeout: Duration) -> Self {
        Self { repo, op_timeout }
    }

    /// All comments for a resource, newest first. A resource without
    /// comments yields an empty list.
    pub async fn list_comments(
        &self,
        resource_id: &ResourceId,
    ) -> Result<Vec<Comment>, EngagementError> {
        validate_resource(resource_id)?;
        bounded(
            self.op_timeout,
            "comment list",
            self.repo.list_for_resource(resource_id),
        )
        .await
    }

    /// Validate and store a new comment.
    ///
    /// The body is trimmed first; empty-after-trim or longer than
    /// [`MAX_COMMENT_LEN`] Unicode scalar values is a validation error. A
    /// blank or missing `author_name` falls back to the anonymous default.
    /// New comments start with zero likes.
    pub async fn add_comment(
        &self,
        resource_id: &ResourceId,
        body: &str,
        identity: &CallerIdentity,
        author_name: Option<&str>,
    ) -> Result<Comment, EngagementError> {
        validate_resource(resource_id)?;
        if identity.is_blank() {
            return Err(EngagementError::Validation(
                "caller identity cannot be empty".to_string(),
            ));
        }

        let body = body.trim();
        if body.is_empty() {
            return Err(EngagementError::Validation(
                "comment cannot be empty".to_string(),
            ));
        }
        if body.chars().count() > MAX_COMMENT_LEN {
            return Err(EngagementError::Validation(format!(
                "comment cannot exceed {MAX_COMMENT_LEN} characters"
            )));
        }

        let author_name = match author_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_AUTHOR_NAME.to_string(),
        };

        let now = chrono::Utc::now();
        let comment = Comment {
            id: CommentId::new(),
            resource_id: resource_id.clone(),
            body: body.to_string(),
            author_name,
            author_identity: identity.clone(),
            like_count: 0,
            liked_by: HashSet::new(),
            created_at: now,
            updated_at: now,
        };

        let comment = bounded(self.op_timeout, "comment insert", self.repo.insert(&comment)).await?;
        tracing::debug!(resource = %resource_id, comment = %comment.id, "comment added");
        Ok(comment)
    }

    /// Flip the caller's like on a comment.
    ///
    /// An unknown comment id is `Rejected(CommentNotFound)`; otherwise the
    /// accepted value reports which direction the toggle resolved to and the
    /// like count after it.
    pub async fn toggle_like(
        &self,
        id: &CommentId,
        identity: &CallerIdentity,
    ) -> Result<Outcome<LikeToggle>, EngagementError> {
        if identity.is_blank() {
            return Err(EngagementError::Validation(
                "caller identity cannot be empty".to_string(),
            ));
        }

        let toggled = bounded(
            self.op_timeout,
            "like toggle",
            self.repo.toggle_like(id, identity),
        )
        .await?;

        match toggled {
            Some(toggle) => {
                tracing::debug!(comment = %id, action = %toggle.action, "like toggled");
                Ok(Outcome::Accepted(toggle))
            }
            None => Ok(Outcome::Rejected(Rejection::CommentNotFound)),
        }
    }

    /// Aggregation for one resource.
    pub async fn comment_stats(
        &self,
        resource_id: &ResourceId,
    ) -> Result<CommentStats, EngagementError> {
        validate_resource(resource_id)?;
        bounded(
            self.op_timeout,
            "comment stats",
            self.repo.stats_for_resource(resource_id),
        )
        .await
    }

    /// Aggregation for every resource with comments, keyed by resource.
    pub async fn all_comment_stats(
        &self,
    ) -> Result<HashMap<ResourceId, CommentStats>, EngagementError> {
        let stats = bounded(
            self.op_timeout,
            "comment stats scan",
            self.repo.all_stats(),
        )
        .await?;
        Ok(stats.into_iter().collect())
    }
}

fn validate_resource(resource_id: &ResourceId) -> Result<(), EngagementError> {
    if resource_id.is_blank() {
        return Err(EngagementError::Validation(
            "resource id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
