//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod comment;
pub mod pool;
pub mod vote;
pub mod word;
