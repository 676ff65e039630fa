//! Infrastructure layer for Agora.
//!
//! Contains implementations of the repository traits defined in `agora-core`:
//! SQLite storage for votes, comments, and the word cloud, plus data
//! directory resolution and configuration loading.

pub mod config;
pub mod sqlite;
