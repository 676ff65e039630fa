use thiserror::Error;

/// Errors surfaced by the engagement services.
///
/// Business rejections (duplicate vote, missing comment) are NOT errors --
/// they travel as [`crate::outcome::Outcome::Rejected`]. This enum is for
/// genuinely failed calls only.
#[derive(Debug, Error)]
pub enum EngagementError {
    /// Caller-supplied input failed validation (empty or oversized).
    #[error("validation error: {0}")]
    Validation(String),

    /// The engagement store failed, was unreachable, or exceeded the
    /// per-operation time bound.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in agora-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_error_display() {
        let err = EngagementError::Validation("comment too long".to_string());
        assert_eq!(err.to_string(), "validation error: comment too long");

        let err = EngagementError::Storage("operation timed out".to_string());
        assert_eq!(err.to_string(), "storage error: operation timed out");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
