//! Vote service.
//!
//! One vote per caller identity per resource. A duplicate submission is a
//! business rejection, not an error; the membership check and the set insert
//! happen inside a single atomic repository operation, so concurrent submits
//! from the same identity can never double-count.

use std::collections::HashMap;
use std::time::Duration;

use agora_types::error::EngagementError;
use agora_types::identity::{CallerIdentity, ResourceId};
use agora_types::outcome::{Outcome, Rejection};
use agora_types::vote::{VoteStats, VoteTally};

use crate::repository::vote::VoteRepository;
use crate::service::guard::bounded;

/// Service for recording and tallying votes.
pub struct VoteService<R: VoteRepository> {
    repo: R,
    op_timeout: Duration,
}

impl<R: VoteRepository> VoteService<R> {
    /// Create a new VoteService.
    ///
    /// - `repo`: persistence for vote records
    /// - `op_timeout`: upper bound on any single repository call
    pub fn new(repo: R, op_timeout: Duration) -> Self {
        Self { repo, op_timeout }
    }

    /// True when the identity has already voted for the resource. A resource
    /// nobody has voted for answers false.
    pub async fn has_voted(
        &self,
        resource_id: &ResourceId,
        identity: &CallerIdentity,
    ) -> Result<bool, EngagementError> {
        validate_target(resource_id, identity)?;
        bounded(
            self.op_timeout,
            "vote lookup",
            self.repo.has_voted(resource_id, identity),
        )
        .await
    }

    /// Current tally for a resource; the zero tally when nobody has voted.
    pub async fn vote_count(&self, resource_id: &ResourceId) -> Result<VoteTally, EngagementError> {
        validate_resource(resource_id)?;
        let record = bounded(
            self.op_timeout,
            "vote record fetch",
            self.repo.get_record(resource_id),
        )
        .await?;
        Ok(record.map(|r| r.tally()).unwrap_or_else(VoteTally::empty))
    }

    /// Register a vote for the resource on behalf of the identity.
    ///
    /// First vote from an identity is accepted and returns the post-insert
    /// tally; every repeat is `Rejected(AlreadyVoted)` and leaves the store
    /// untouched.
    pub async fn submit_vote(
        &self,
        resource_id: &ResourceId,
        identity: &CallerIdentity,
    ) -> Result<Outcome<VoteTally>, EngagementError> {
        validate_target(resource_id, identity)?;

        let newly_added = bounded(
            self.op_timeout,
            "vote insert",
            self.repo.add_voter(resource_id, identity),
        )
        .await?;

        if !newly_added {
            tracing::debug!(resource = %resource_id, "duplicate vote rejected");
            return Ok(Outcome::Rejected(Rejection::AlreadyVoted));
        }

        tracing::debug!(resource = %resource_id, "vote accepted");
        let tally = self.vote_count(resource_id).await?;
        Ok(Outcome::Accepted(tally))
    }

    /// Tallies for every resource anyone has voted for, keyed by resource.
    pub async fn all_votes(&self) -> Result<HashMap<ResourceId, VoteTally>, EngagementError> {
        let records = bounded(self.op_timeout, "vote scan", self.repo.all_records()).await?;
        Ok(records
            .into_iter()
            .map(|r| {
                let tally = r.tally();
                (r.resource_id, tally)
            })
            .collect())
    }

    /// Store-wide totals.
    pub async fn vote_stats(&self) -> Result<VoteStats, EngagementError> {
        bounded(self.op_timeout, "vote stats", self.repo.stats()).await
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

fn validate_target(
    resource_id: &ResourceId,
    identity: &CallerIdentity,
) -> Result<(), EngagementError> {
    validate_resource(resource_id)?;
    if identity.is_blank() {
        return Err(EngagementError::Validation(
            "caller identity cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::error::RepositoryError;
    use agora_types::vote::VoteRecord;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// In-memory vote store. The mutex is held across the whole check+insert
    /// in `add_voter`, mirroring the atomicity the real store provides.
    #[derive(Default)]
    struct MockVoteRepository {
        records: Mutex<HashMap<ResourceId, VoteRecord>>,
    }

    impl MockVoteRepository {
        fn with_vote(self, resource: &str, identity: &str) -> Self {
            {
                let mut records = self.records.lock().unwrap();
                let record = records
                    .entry(ResourceId::new(resource))
                    .or_insert_with(|| VoteRecord {
                        resource_id: ResourceId::new(resource),
                        voters: HashSet::new(),
                        created_at: chrono::Utc::now(),
                        updated_at: chrono::Utc::now(),
                    });
                record.voters.insert(CallerIdentity::new(identity));
            }
            self
        }
    }

    impl VoteRepository for MockVoteRepository {
        async fn get_record(
            &self,
            resource_id: &ResourceId,
        ) -> Result<Option<VoteRecord>, RepositoryError> {
            Ok(self.records.lock().unwrap().get(resource_id).cloned())
        }

        async fn has_voted(
            &self,
            resource_id: &ResourceId,
            identity: &CallerIdentity,
        ) -> Result<bool, RepositoryError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(resource_id)
                .is_some_and(|r| r.voters.contains(identity)))
        }

        async fn add_voter(
            &self,
            resource_id: &ResourceId,
            identity: &CallerIdentity,
        ) -> Result<bool, RepositoryError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .entry(resource_id.clone())
                .or_insert_with(|| VoteRecord {
                    resource_id: resource_id.clone(),
                    voters: HashSet::new(),
                    created_at: chrono::Utc::now(),
                    updated_at: chrono::Utc::now(),
                });
            record.updated_at = chrono::Utc::now();
            Ok(record.voters.insert(identity.clone()))
        }

        async fn all_records(&self) -> Result<Vec<VoteRecord>, RepositoryError> {
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }

        async fn stats(&self) -> Result<VoteStats, RepositoryError> {
            let records = self.records.lock().unwrap();
            Ok(VoteStats {
                total_resources: records.len() as u64,
                total_votes: records.values().map(|r| r.voters.len() as u64).sum(),
            })
        }
    }

    /// Repository whose every call hangs forever.
    struct StalledVoteRepository;

    impl VoteRepository for StalledVoteRepository {
        async fn get_record(
            &self,
            _resource_id: &ResourceId,
        ) -> Result<Option<VoteRecord>, RepositoryError> {
            std::future::pending().await
        }

        async fn has_voted(
            &self,
            _resource_id: &ResourceId,
            _identity: &CallerIdentity,
        ) -> Result<bool, RepositoryError> {
            std::future::pending().await
        }

        async fn add_voter(
            &self,
            _resource_id: &ResourceId,
            _identity: &CallerIdentity,
        ) -> Result<bool, RepositoryError> {
            std::future::pending().await
        }

        async fn all_records(&self) -> Result<Vec<VoteRecord>, RepositoryError> {
            std::future::pending().await
        }

        async fn stats(&self) -> Result<VoteStats, RepositoryError> {
            std::future::pending().await
        }
    }

    fn service(repo: MockVoteRepository) -> VoteService<MockVoteRepository> {
        VoteService::new(repo, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_first_vote_accepted_repeat_rejected() {
        let svc = service(MockVoteRepository::default());
        let project = ResourceId::new("p1");
        let caller = CallerIdentity::new("203.0.113.7");

        let first = svc.submit_vote(&project, &caller).await.unwrap();
        match first {
            Outcome::Accepted(tally) => {
                assert_eq!(tally.count, 1);
                assert!(tally.contains(&caller));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }

        for _ in 0..3 {
            let repeat = svc.submit_vote(&project, &caller).await.unwrap();
            assert_eq!(repeat, Outcome::Rejected(Rejection::AlreadyVoted));
        }

        let tally = svc.vote_count(&project).await.unwrap();
        assert_eq!(tally.count, 1);
    }

    #[tokio::test]
    async fn test_already_voted_message() {
        let svc = service(MockVoteRepository::default().with_vote("p1", "a"));
        let outcome = svc
            .submit_vote(&ResourceId::new("p1"), &CallerIdentity::new("a"))
            .await
            .unwrap();
        match outcome {
            Outcome::Rejected(rejection) => {
                assert_eq!(
                    rejection.to_string(),
                    "You have already voted for this project"
                );
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_vote_count_unknown_resource_is_zero() {
        let svc = service(MockVoteRepository::default());
        let tally = svc.vote_count(&ResourceId::new("nobody-yet")).await.unwrap();
        assert_eq!(tally.count, 0);
        assert!(tally.voters.is_empty());
    }

    #[tokio::test]
    async fn test_has_voted_reflects_membership() {
        let svc = service(MockVoteRepository::default().with_vote("p1", "a"));
        assert!(
            svc.has_voted(&ResourceId::new("p1"), &CallerIdentity::new("a"))
                .await
                .unwrap()
        );
        assert!(
            !svc.has_voted(&ResourceId::new("p1"), &CallerIdentity::new("b"))
                .await
                .unwrap()
        );
        assert!(
            !svc.has_voted(&ResourceId::new("p2"), &CallerIdentity::new("a"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_count_always_matches_voter_set() {
        let svc = service(MockVoteRepository::default());
        let project = ResourceId::new("p1");
        for i in 0..5 {
            let caller = CallerIdentity::new(format!("caller-{i}"));
            svc.submit_vote(&project, &caller).await.unwrap();
            let tally = svc.vote_count(&project).await.unwrap();
            assert_eq!(tally.count, tally.voters.len() as u64);
        }
        let tally = svc.vote_count(&project).await.unwrap();
        assert_eq!(tally.count, 5);
    }

    #[tokio::test]
    async fn test_concurrent_submits_count_once() {
        let svc = Arc::new(service(MockVoteRepository::default()));
        let project = ResourceId::new("p1");
        let caller = CallerIdentity::new("203.0.113.7");

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let svc = Arc::clone(&svc);
                let project = project.clone();
                let caller = caller.clone();
                tokio::spawn(async move { svc.submit_vote(&project, &caller).await })
            })
            .collect();

        let results = futures_util::future::join_all(tasks).await;
        let mut accepted = 0;
        let mut rejected = 0;
        for result in results {
            match result.unwrap().unwrap() {
                Outcome::Accepted(_) => accepted += 1,
                Outcome::Rejected(Rejection::AlreadyVoted) => rejected += 1,
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(rejected, 15);

        let tally = svc.vote_count(&project).await.unwrap();
        assert_eq!(tally.count, 1);
        assert!(tally.contains(&caller));
    }

    #[tokio::test]
    async fn test_all_votes_maps_every_resource() {
        let svc = service(
            MockVoteRepository::default()
                .with_vote("p1", "a")
                .with_vote("p1", "b")
                .with_vote("p2", "a"),
        );
        let all = svc.all_votes().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&ResourceId::new("p1")].count, 2);
        assert_eq!(all[&ResourceId::new("p2")].count, 1);
    }

    #[tokio::test]
    async fn test_vote_stats_totals() {
        let svc = service(
            MockVoteRepository::default()
                .with_vote("p1", "a")
                .with_vote("p1", "b")
                .with_vote("p2", "c"),
        );
        let stats = svc.vote_stats().await.unwrap();
        assert_eq!(stats.total_resources, 2);
        assert_eq!(stats.total_votes, 3);
    }

    #[tokio::test]
    async fn test_blank_inputs_rejected() {
        let svc = service(MockVoteRepository::default());
        let err = svc
            .submit_vote(&ResourceId::new("  "), &CallerIdentity::new("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::Validation(_)));

        let err = svc
            .submit_vote(&ResourceId::new("p1"), &CallerIdentity::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, EngagementError::Validation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_surfaces_storage_error() {
        let svc = VoteService::new(StalledVoteRepository, Duration::from_millis(50));
        let err = svc
            .submit_vote(&ResourceId::new("p1"), &CallerIdentity::new("a"))
            .await
            .unwrap_err();
        match err {
            EngagementError::Storage(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
