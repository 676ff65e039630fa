//! Observability layer for Agora.
//!
//! Structured logging via `tracing-subscriber` plus an optional
//! OpenTelemetry bridge for span export during local development.

pub mod tracing_setup;
