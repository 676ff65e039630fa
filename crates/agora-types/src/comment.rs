use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::identity::{CallerIdentity, ResourceId};

/// Longest accepted comment body, counted in Unicode scalar values after
/// trimming.
pub const MAX_COMMENT_LEN: usize = 500;

/// Display name used when the submitter leaves the name field blank.
pub const DEFAULT_AUTHOR_NAME: &str = "Anonymous User";

/// Unique identifier for a comment, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    /// Create a new CommentId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a CommentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A visitor comment on a resource.
///
/// Comments are append-only (no edit or delete) and carry their own like
/// state: `liked_by` is the set of identities currently liking the comment,
/// and `like_count` always equals `liked_by.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub resource_id: ResourceId,
    /// Trimmed body text, 1..=500 Unicode scalar values.
    pub body: String,
    /// Display name shown next to the comment.
    pub author_name: String,
    /// Identity that submitted the comment. Never exposed over HTTP.
    pub author_identity: CallerIdentity,
    /// Denormalized count of `liked_by`; kept in lockstep by the store.
    pub like_count: i64,
    pub liked_by: HashSet<CallerIdentity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn liked_by_contains(&self, identity: &CallerIdentity) -> bool {
        self.liked_by.contains(identity)
    }
}

/// Direction a like toggle resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Unliked,
}

impl fmt::Display for LikeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeAction::Liked => write!(f, "liked"),
            LikeAction::Unliked => write!(f, "unliked"),
        }
    }
}

impl FromStr for LikeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "liked" => Ok(LikeAction::Liked),
            "unliked" => Ok(LikeAction::Unliked),
            other => Err(format!("invalid like action: '{other}'")),
        }
    }
}

/// Result of an accepted like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    pub action: LikeAction,
    /// Like count after the toggle was applied.
    pub like_count: i64,
}

/// Per-resource comment aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStats {
    pub count: u64,
    /// `created_at` of the newest comment, if any exist.
    pub latest_comment_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_id_display_roundtrip() {
        let id = CommentId::new();
        let s = id.to_string();
        let parsed: CommentId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_comment_ids_are_time_sortable() {
        let a = CommentId::new();
        let b = CommentId::new();
        // UUID v7 embeds a timestamp prefix, so creation order is string order.
        assert!(a.to_string() <= b.to_string());
    }

    #[test]
    fn test_like_action_roundtrip() {
        for action in [LikeAction::Liked, LikeAction::Unliked] {
            let s = action.to_string();
            let parsed: LikeAction = s.parse().unwrap();
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn test_like_action_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&LikeAction::Liked).unwrap(),
            "\"liked\""
        );
        assert_eq!(
            serde_json::to_string(&LikeAction::Unliked).unwrap(),
            "\"unliked\""
        );
    }

    #[test]
    fn test_liked_by_membership() {
        let mut liked_by = HashSet::new();
        liked_by.insert(CallerIdentity::new("a"));
        let comment = Comment {
            id: CommentId::new(),
            resource_id: ResourceId::new("p1"),
            body: "great work".to_string(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_identity: CallerIdentity::new("a"),
            like_count: 1,
            liked_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(comment.liked_by_contains(&CallerIdentity::new("a")));
        assert!(!comment.liked_by_contains(&CallerIdentity::new("b")));
        assert_eq!(comment.like_count as usize, comment.liked_by.len());
    }
}
