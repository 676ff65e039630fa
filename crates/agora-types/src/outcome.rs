use serde::{Deserialize, Serialize};

use std::fmt;

/// Result of a business operation that can succeed at the call level while
/// being declined by the rules of the domain.
///
/// A duplicate vote or a like on a missing comment is an expected outcome,
/// not a failure: callers branch on the variant instead of catching errors,
/// and transport/storage problems stay in the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// The accepted value, if any.
    pub fn accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }
}

/// Why an operation was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The identity is already in the resource's voter set.
    AlreadyVoted,
    /// The referenced comment does not exist.
    CommentNotFound,
}

impl Rejection {
    /// Human-readable message, byte-compatible with what existing frontends
    /// display.
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::AlreadyVoted => "You have already voted for this project",
            Rejection::CommentNotFound => "Comment not found",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::AlreadyVoted.to_string(),
            "You have already voted for this project"
        );
        assert_eq!(Rejection::CommentNotFound.to_string(), "Comment not found");
    }

    #[test]
    fn test_outcome_accessors() {
        let accepted: Outcome<u32> = Outcome::Accepted(7);
        assert!(accepted.is_accepted());
        assert_eq!(accepted.accepted(), Some(7));

        let rejected: Outcome<u32> = Outcome::Rejected(Rejection::AlreadyVoted);
        assert!(rejected.is_rejected());
        assert_eq!(rejected.accepted(), None);
    }
}
