//! Caller identity extractor.
//!
//! Votes and likes are deduplicated per caller address. The address is
//! resolved from, in order:
//! - first entry of `X-Forwarded-For` (reverse proxy deployments)
//! - `X-Real-Ip`
//! - the socket peer address (`ConnectInfo`)
//!
//! Headers are spoofable; address-based dedup accepts that tradeoff.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use agora_types::identity::CallerIdentity;

use crate::http::error::AppError;

/// Caller address resolved for dedup. Extracting this never hits storage.
pub struct CallerIp(pub CallerIdentity);

impl<S> FromRequestParts<S> for CallerIp
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ip) = forwarded_for(parts) {
            return Ok(CallerIp(CallerIdentity::new(ip)));
        }

        if let Some(ip) = real_ip(parts) {
            return Ok(CallerIp(CallerIdentity::new(ip)));
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(CallerIp(CallerIdentity::new(addr.ip().to_string())));
        }

        Err(AppError::Validation(
            "unable to determine caller address".to_string(),
        ))
    }
}

/// First entry of the `X-Forwarded-For` list, the client closest to the edge.
fn forwarded_for(parts: &Parts) -> Option<String> {
    let value = parts.headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some(first.to_string())
}

fn real_ip(parts: &Parts) -> Option<String> {
    let value = parts.headers.get("x-real-ip")?.to_str().ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
