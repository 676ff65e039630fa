//! HTTP/REST API layer for Agora.
//!
//! Axum-based API on the website's `/api/` paths, with per-caller
//! identity extraction, permissive CORS, and request tracing.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
