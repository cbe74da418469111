//! Conversation views: per-buyer threads and per-store activity windows.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use sellerdesk_core::QuestionId;

use crate::db::{QuestionRepository, UserRepository};
use crate::error::ApiError;
use crate::middleware::{AuthOrApiSecret, RequireStaff};
use crate::models::{Question, QuestionMessage};
use crate::services::{ConversationSummary, summarize_store_conversations};
use crate::state::AppState;

/// Query parameters for the conversation lookup.
#[derive(Debug, Deserialize)]
pub struct ConversationParams {
    #[serde(default)]
    pub external_id: Option<String>,
}

/// One question with its thread, messages in send order.
#[derive(Debug, Serialize)]
pub struct QuestionThread {
    #[serde(flatten)]
    pub question: Question,
    pub messages: Vec<QuestionMessage>,
}

/// Fetch every question of one external buyer with its ordered messages.
///
/// `GET /api/conversations?external_id=...`
///
/// Serves the automation relay (via `X-API-SECRET`) and the staff
/// dashboard; a buyer session gets a 403 since external accounts never
/// hold sessions anyway.
pub async fn index(
    State(state): State<AppState>,
    AuthOrApiSecret(identity): AuthOrApiSecret,
    Query(params): Query<ConversationParams>,
) -> Result<Json<Vec<QuestionThread>>, ApiError> {
    if let Some(user) = &identity
        && !user.role.is_staff()
    {
        return Err(ApiError::PermissionDenied(
            "Staff access required".to_string(),
        ));
    }

    let external_id = params
        .external_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("external_id query parameter is required".to_string())
        })?;

    let buyer = UserRepository::new(state.pool())
        .get_by_external_id(external_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let repo = QuestionRepository::new(state.pool());
    let questions = repo.list_for_user(buyer.id).await?;
    let question_ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
    let messages = repo.list_messages_for_questions(&question_ids).await?;

    let mut by_question: HashMap<QuestionId, Vec<QuestionMessage>> = HashMap::new();
    for message in messages {
        by_question.entry(message.question_id).or_default().push(message);
    }

    let threads = questions
        .into_iter()
        .map(|question| QuestionThread {
            messages: by_question.remove(&question.id).unwrap_or_default(),
            question,
        })
        .collect();
    Ok(Json(threads))
}

/// Aggregate buyer conversation windows for the caller's store.
///
/// `GET /api/shop_users`
///
/// Returns one row per buyer who has messages under the store's
/// products, ordered by first contact.
pub async fn shop_users(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let store = super::resolve_store(&state, &current).await?;
    let rows = QuestionRepository::new(state.pool())
        .conversation_rows(store.id)
        .await?;
    Ok(Json(summarize_store_conversations(&rows)))
}
