//! Vote repository trait definition.

use agora_types::error::RepositoryError;
use agora_types::identity::{CallerIdentity, ResourceId};
use agora_types::vote::{VoteRecord, VoteStats};

/// Repository trait for vote persistence.
///
/// Implementations live in agora-infra (e.g., SqliteVoteRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait VoteRepository: Send + Sync {
    /// Get the vote record for a resource, if anyone has voted for it yet.
    fn get_record(
        &self,
        resource_id: &ResourceId,
    ) -> impl std::future::Future<Output = Result<Option<VoteRecord>, RepositoryError>> + Send;

    /// True when the identity is already in the resource's voter set.
    fn has_voted(
        &self,
        resource_id: &ResourceId,
        identity: &CallerIdentity,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Atomically ensure the record exists and add the identity to its voter
    /// set. Returns true when the identity was newly added, false when it was
    /// already present. This is the only write path for votes; the membership
    /// check and the insert must not be separable operations.
    fn add_voter(
        &self,
        resource_id: &ResourceId,
        identity: &CallerIdentity,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Every vote record in the store.
    fn all_records(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<VoteRecord>, RepositoryError>> + Send;

    /// Store-wide totals: resources with votes, and votes across all of them.
    fn stats(
        &self,
    ) -> impl std::future::Future<Output = Result<VoteStats, RepositoryError>> + Send;
}
