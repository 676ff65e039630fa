//! Engagement services (use cases).
//!
//! Services own input validation, the per-operation time bound on storage
//! calls, and the mapping from repository errors into the engagement error
//! taxonomy. They depend on traits (ports) -- never on concrete
//! infrastructure implementations.

pub mod comment;
mod guard;
pub mod vote;
pub mod word;
