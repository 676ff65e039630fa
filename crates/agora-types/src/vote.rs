use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::HashSet;

use crate::identity::{CallerIdentity, ResourceId};

/// Per-resource vote aggregate.
///
/// Created lazily the first time anyone votes for the resource, never
/// deleted. `voters` is a set: the same identity can appear at most once,
/// and `voters.len()` is the authoritative vote count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub resource_id: ResourceId,
    /// Deduplicated identities that have voted for this resource. Kept for
    /// membership checks, not for public disclosure.
    pub voters: HashSet<CallerIdentity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VoteRecord {
    pub fn count(&self) -> u64 {
        self.voters.len() as u64
    }

    pub fn has_voted(&self, identity: &CallerIdentity) -> bool {
        self.voters.contains(identity)
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::new(self.voters.clone())
    }
}

/// Snapshot of a resource's votes: the count plus the membership set behind
/// it. A resource nobody has voted for yields the zero tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub count: u64,
    pub voters: HashSet<CallerIdentity>,
}

impl VoteTally {
    /// Build a tally from a voter set; the count is always derived, never
    /// supplied independently.
    pub fn new(voters: HashSet<CallerIdentity>) -> Self {
        Self {
            count: voters.len() as u64,
            voters,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &CallerIdentity) -> bool {
        self.voters.contains(identity)
    }
}

/// Store-wide vote aggregation: how many resources have at least one vote,
/// and the total votes across all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStats {
    pub total_resources: u64,
    pub total_votes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voters(ids: &[&str]) -> HashSet<CallerIdentity> {
        ids.iter().map(|s| CallerIdentity::new(*s)).collect()
    }

    #[test]
    fn test_tally_count_matches_voters() {
        let tally = VoteTally::new(voters(&["a", "b", "c"]));
        assert_eq!(tally.count, 3);
        assert_eq!(tally.count, tally.voters.len() as u64);
    }

    #[test]
    fn test_empty_tally() {
        let tally = VoteTally::empty();
        assert_eq!(tally.count, 0);
        assert!(tally.voters.is_empty());
    }

    #[test]
    fn test_record_membership() {
        let record = VoteRecord {
            resource_id: ResourceId::new("p1"),
            voters: voters(&["a", "b"]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(record.has_voted(&CallerIdentity::new("a")));
        assert!(!record.has_voted(&CallerIdentity::new("z")));
        assert_eq!(record.count(), 2);
        assert_eq!(record.tally().count, 2);
    }

    #[test]
    fn test_voter_set_dedups() {
        // HashSet semantics: inserting the same identity twice keeps one.
        let mut set = voters(&["a"]);
        set.insert(CallerIdentity::new("a"));
        assert_eq!(VoteTally::new(set).count, 1);
    }
}
