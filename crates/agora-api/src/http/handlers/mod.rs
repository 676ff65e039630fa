//! HTTP request handlers for the REST API.

pub mod comment;
pub mod vote;
pub mod word;
