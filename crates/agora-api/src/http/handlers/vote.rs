//! Vote endpoints: per-resource tallies and deduplicated vote submission.

use axum::extract::{Path, State};
use axum::Json;

use agora_types::identity::ResourceId;
use agora_types::outcome::Outcome;

use crate::http::error::AppError;
use crate::http::extractors::identity::CallerIp;
use crate::state::AppState;

/// GET /api/projects/:id/votes - Vote count and the caller's voted flag.
pub async fn get_votes(
    State(state): State<AppState>,
    CallerIp(caller): CallerIp,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let resource = ResourceId::new(project_id);

    let tally = state.vote_service.vote_count(&resource).await?;
    let has_voted = state.vote_service.has_voted(&resource, &caller).await?;

    Ok(Json(serde_json::json!({
        "votes": tally.count,
        "hasVoted": has_voted,
    })))
}

/// POST /api/projects/:id/vote - Record one vote per caller per resource.
///
/// A repeat vote is a business rejection, not an error: 200 with
/// `"success": false` and the rejection message.
pub async fn submit_vote(
    State(state): State<AppState>,
    CallerIp(caller): CallerIp,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let resource = ResourceId::new(project_id);

    let outcome = state.vote_service.submit_vote(&resource, &caller).await?;

    let body = match outcome {
        Outcome::Accepted(tally) => serde_json::json!({
            "success": true,
            "votes": tally.count,
            "hasVoted": true,
            "message": "Vote submitted successfully",
        }),
        Outcome::Rejected(rejection) => serde_json::json!({
            "success": false,
            "message": rejection.message(),
        }),
    };

    Ok(Json(body))
}

/// GET /api/projects/votes/all - Counts for every resource plus the list of
/// resources the caller voted for. Voter identities are never disclosed.
pub async fn all_votes(
    State(state): State<AppState>,
    CallerIp(caller): CallerIp,
) -> Result<Json<serde_json::Value>, AppError> {
    let tallies = state.vote_service.all_votes().await?;

    let mut votes = serde_json::Map::new();
    let mut user_votes = Vec::new();

    for (resource, tally) in &tallies {
        votes.insert(resource.to_string(), serde_json::json!(tally.count));
        if tally.contains(&caller) {
            user_votes.push(resource.to_string());
        }
    }

    Ok(Json(serde_json::json!({
        "votes": votes,
        "userVotes": user_votes,
    })))
}
