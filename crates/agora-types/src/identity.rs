use serde::{Deserialize, Serialize};

use std::fmt;

/// Identifier of a voteable/commentable resource (a project page, in practice).
///
/// Opaque to the engine: any non-empty string a frontend cares to use. The
/// service never enumerates resources -- a resource exists the moment someone
/// engages with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or whitespace-only (rejected by validation).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque deduplication key for the caller of an engagement operation.
///
/// In the deployed system this is the request IP (proxy headers first), but
/// nothing below the HTTP layer knows or cares -- it is compared for equality
/// and stored, never parsed. One identity gets one vote per resource and one
/// like per comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(pub String);

impl CallerIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identity is empty or whitespace-only (rejected by validation).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallerIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_blank() {
        assert!(ResourceId::new("").is_blank());
        assert!(ResourceId::new("   ").is_blank());
        assert!(!ResourceId::new("project-1").is_blank());
    }

    #[test]
    fn test_caller_identity_blank() {
        assert!(CallerIdentity::new("").is_blank());
        assert!(!CallerIdentity::new("203.0.113.7").is_blank());
    }

    #[test]
    fn test_identity_equality_is_exact() {
        // Identities are opaque: no normalization, not even case folding.
        assert_ne!(CallerIdentity::new("ABC"), CallerIdentity::new("abc"));
        assert_eq!(
            CallerIdentity::new("203.0.113.7"),
            CallerIdentity::new("203.0.113.7")
        );
    }

    #[test]
    fn test_serde_transparent() {
        let id = ResourceId::new("project-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"project-1\"");
        let parsed: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
