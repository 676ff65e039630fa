//! Business logic and repository trait definitions for Agora.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `agora-types` -- never on
//! `agora-infra` or any database/IO crate.

pub mod repository;
pub mod service;
