//! Comment repository trait definition.

use agora_types::comment::{Comment, CommentId, CommentStats, LikeToggle};
use agora_types::error::RepositoryError;
use agora_types::identity::{CallerIdentity, ResourceId};

/// Repository trait for comment persistence.
///
/// Implementations live in agora-infra (e.g., SqliteCommentRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment. Returns the stored comment.
    fn insert(
        &self,
        comment: &Comment,
    ) -> impl std::future::Future<Output = Result<Comment, RepositoryError>> + Send;

    /// Get a comment by id, including its like state.
    fn get(
        &self,
        id: &CommentId,
    ) -> impl std::future::Future<Output = Result<Option<Comment>, RepositoryError>> + Send;

    /// All comments for a resource, newest first.
    fn list_for_resource(
        &self,
        resource_id: &ResourceId,
    ) -> impl std::future::Future<Output = Result<Vec<Comment>, RepositoryError>> + Send;

    /// Atomically flip the (comment, identity) like state: remove and
    /// decrement when the identity is present, add and increment when it is
    /// absent. Returns the resolved action with the new count, or `None`
    /// when the comment does not exist.
    fn toggle_like(
        &self,
        id: &CommentId,
        identity: &CallerIdentity,
    ) -> impl std::future::Future<Output = Result<Option<LikeToggle>, RepositoryError>> + Send;

    /// Aggregation for one resource (count + newest comment time).
    fn stats_for_resource(
        &self,
        resource_id: &ResourceId,
    ) -> impl std::future::Future<Output = Result<CommentStats, RepositoryError>> + Send;

    /// Aggregation for every resource that has at least one comment.
    fn all_stats(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<(ResourceId, CommentStats)>, RepositoryError>>
    + Send;
}
