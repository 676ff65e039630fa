//! Comment endpoints: listing, creation, like toggling, and aggregation.
//!
//! Responses expose a view shape that never discloses caller identities --
//! the caller only learns `likedByMe` about themselves.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use agora_types::comment::{Comment, CommentId, LikeAction};
use agora_types::identity::{CallerIdentity, ResourceId};
use agora_types::outcome::{Outcome, Rejection};

use crate::http::error::AppError;
use crate::http::extractors::identity::CallerIp;
use crate::state::AppState;

/// Public shape of a comment. `likedByMe` is computed against the caller;
/// the author's address and the liker set stay server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentView {
    id: String,
    project_id: String,
    comment: String,
    user_name: String,
    likes: i64,
    liked_by_me: bool,
    created_at: String,
    updated_at: String,
}

impl CommentView {
    fn new(comment: &Comment, caller: &CallerIdentity) -> Self {
        Self {
            id: comment.id.to_string(),
            project_id: comment.resource_id.to_string(),
            comment: comment.body.clone(),
            user_name: comment.author_name.clone(),
            likes: comment.like_count,
            liked_by_me: comment.liked_by_contains(caller),
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    comment: String,
    user_name: Option<String>,
}

/// GET /api/projects/:id/comments - All comments for a resource, newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    CallerIp(caller): CallerIp,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let resource = ResourceId::new(project_id);

    let comments = state.comment_service.list_comments(&resource).await?;
    let views: Vec<CommentView> = comments
        .iter()
        .map(|c| CommentView::new(c, &caller))
        .collect();

    Ok(Json(serde_json::json!({
        "comments": views,
        "count": views.len(),
    })))
}

/// POST /api/projects/:id/comments - Add a comment.
///
/// Body: `{"comment": "...", "userName": "..."?}`. A blank or missing
/// `userName` gets the anonymous default.
pub async fn create_comment(
    State(state): State<AppState>,
    CallerIp(caller): CallerIp,
    Path(project_id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let resource = ResourceId::new(project_id);

    let comment = state
        .comment_service
        .add_comment(&resource, &body.comment, &caller, body.user_name.as_deref())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Comment added successfully",
        "comment": CommentView::new(&comment, &caller),
    })))
}

/// POST /api/comments/:id/like - Toggle the caller's like on a comment.
///
/// An unknown (or unparseable) comment id is a business rejection rendered
/// as 200 with `"success": false`.
pub async fn toggle_like(
    State(state): State<AppState>,
    CallerIp(caller): CallerIp,
    Path(comment_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Ok(id) = comment_id.parse::<CommentId>() else {
        return Ok(Json(rejection_body(&Rejection::CommentNotFound)));
    };

    let outcome = state.comment_service.toggle_like(&id, &caller).await?;

    let body = match outcome {
        Outcome::Accepted(toggle) => {
            let message = match toggle.action {
                LikeAction::Liked => "Comment liked",
                LikeAction::Unliked => "Comment unliked",
            };
            serde_json::json!({
                "success": true,
                "message": message,
                "action": toggle.action,
                "likes": toggle.like_count,
            })
        }
        Outcome::Rejected(rejection) => rejection_body(&rejection),
    };

    Ok(Json(body))
}

/// GET /api/projects/comments/stats - Per-resource comment count and latest
/// timestamp, for bulk dashboard rendering.
pub async fn all_comment_stats(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stats = state.comment_service.all_comment_stats().await?;

    let mut map = serde_json::Map::new();
    for (resource, s) in &stats {
        map.insert(
            resource.to_string(),
            serde_json::json!({
                "count": s.count,
                "latestCommentAt": s.latest_comment_at.map(|t| t.to_rfc3339()),
            }),
        );
    }

    Ok(Json(serde_json::json!({ "stats": map })))
}

fn rejection_body(rejection: &Rejection) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "message": rejection.message(),
    })
}
