//! Shared domain types for Agora.
//!
//! This crate contains the core domain types used across the Agora engagement
//! service: votes, comments, word cloud entries, and their associated outcome
//! and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod comment;
pub mod config;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod vote;
pub mod word;
