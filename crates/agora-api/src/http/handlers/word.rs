//! Word cloud endpoints.
//!
//! The GET shape mirrors the Strapi envelope the website frontend consumes
//! (`data[].attributes` plus a pagination block), so existing clients keep
//! working unchanged. There is no actual pagination; the cloud is small.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use agora_types::word::{Word, WordStats};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WordAttributes {
    text: String,
    value: i64,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct WordItem {
    id: String,
    attributes: WordAttributes,
}

impl WordItem {
    fn new(word: &Word) -> Self {
        Self {
            id: word.id.to_string(),
            attributes: WordAttributes {
                text: word.text.clone(),
                value: word.value,
                created_at: word.created_at.to_rfc3339(),
                updated_at: word.updated_at.to_rfc3339(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitWordRequest {
    text: String,
}

/// GET /api/wordclouds - Every word, highest value first.
pub async fn list_words(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let words = state.word_service.all_words().await?;

    let data: Vec<WordItem> = words.iter().map(WordItem::new).collect();
    let total = data.len();

    Ok(Json(serde_json::json!({
        "data": data,
        "meta": {
            "pagination": {
                "page": 1,
                "pageSize": total,
                "pageCount": 1,
                "total": total,
            },
        },
    })))
}

/// POST /api/wordclouds - Submit a word; repeats increment the existing
/// entry case-insensitively. Returns the stored word and refreshed stats.
pub async fn submit_word(
    State(state): State<AppState>,
    Json(body): Json<SubmitWordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let submission = state.word_service.submit_word(&body.text).await?;
    let stats = state.word_service.word_stats().await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Word submitted successfully",
        "data": {
            "word": {
                "id": submission.word.id.to_string(),
                "text": submission.word.text,
                "value": submission.word.value,
                "isNew": submission.is_new,
                "createdAt": submission.word.created_at.to_rfc3339(),
                "updatedAt": submission.word.updated_at.to_rfc3339(),
            },
            "stats": stats_json(&stats),
        },
    })))
}

fn stats_json(stats: &WordStats) -> serde_json::Value {
    let top_words: Vec<serde_json::Value> = stats
        .top_words
        .iter()
        .map(|w| serde_json::json!({ "text": w.text, "value": w.value }))
        .collect();

    serde_json::json!({
        "totalWords": stats.total_words,
        "totalSubmissions": stats.total_submissions,
        "maxValue": stats.max_value,
        "minValue": stats.min_value,
        "topWords": top_words,
    })
}
