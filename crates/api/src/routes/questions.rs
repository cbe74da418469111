//! Buyer question, thread message, and answer routes.
//!
//! Visibility is role-filtered rather than store-filtered: buyers see
//! their own questions, staff see everything. The message and external
//! ingestion endpoints also accept the pre-shared `X-API-SECRET` header
//! in place of a session, which stamps writes as automation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use sellerdesk_core::{Marketplace, MessageId, ProductId, QuestionId, SenderRole, UserId};

use crate::db::{ProductRepository, QuestionRepository, UserRepository};
use crate::error::ApiError;
use crate::middleware::{AuthOrApiSecret, RequireAuth, RequireStaff};
use crate::models::{Question, QuestionAnswer, QuestionMessage};
use crate::state::AppState;

// =============================================================================
// Questions
// =============================================================================

/// List questions: buyers get their own, staff get all of them.
///
/// `GET /api/questions`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = QuestionRepository::new(state.pool());
    let list = if current.role.is_staff() {
        questions.list_all().await?
    } else {
        questions.list_for_user(current.id).await?
    };
    Ok(Json(list))
}

/// Request body for asking a question.
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub product: ProductId,
    pub text: String,
    #[serde(default)]
    pub marketplace: Option<String>,
}

/// Ask a question about a product.
///
/// `POST /api/questions`
///
/// The optional marketplace tag is parsed strictly here; the lenient
/// spelling-tolerant path is external ingestion only.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("Text must not be empty".to_string()));
    }
    let marketplace = req
        .marketplace
        .as_deref()
        .map(str::parse::<Marketplace>)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    ProductRepository::new(state.pool())
        .get_unscoped(req.product)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let question = QuestionRepository::new(state.pool())
        .create(req.product, Some(current.id), &req.text, marketplace)
        .await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Get one question.
///
/// `GET /api/questions/{id}`
///
/// A buyer asking for someone else's question gets a 404, not a 403;
/// question IDs are global and must not be probeable.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<QuestionId>,
) -> Result<Json<Question>, ApiError> {
    let question = QuestionRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if !current.role.is_staff() && question.user_id != Some(current.id) {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }
    Ok(Json(question))
}

// =============================================================================
// Messages
// =============================================================================

/// List thread messages. Staff only; everyone else gets an empty list.
///
/// `GET /api/messages`
pub async fn list_messages(
    State(state): State<AppState>,
    AuthOrApiSecret(identity): AuthOrApiSecret,
) -> Result<Json<Vec<QuestionMessage>>, ApiError> {
    let is_staff = identity.as_ref().is_some_and(|u| u.role.is_staff());
    if !is_staff {
        return Ok(Json(Vec::new()));
    }

    let messages = QuestionRepository::new(state.pool()).list_messages().await?;
    Ok(Json(messages))
}

/// Request body for appending a thread message.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub question: QuestionId,
    pub text: String,
    #[serde(default)]
    pub parent: Option<MessageId>,
}

/// Append a message to a question thread.
///
/// `POST /api/messages`
///
/// Sender and role are stamped from the session identity; an
/// `X-API-SECRET` caller writes as `ai` with no sender. The message's
/// marketplace is copied from the question, never taken from the body.
pub async fn create_message(
    State(state): State<AppState>,
    AuthOrApiSecret(identity): AuthOrApiSecret,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<QuestionMessage>), ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("Text must not be empty".to_string()));
    }

    let (sender_id, role) = identity.as_ref().map_or((None, SenderRole::Ai), |user| {
        (Some(user.id), SenderRole::from(user.role))
    });

    let questions = QuestionRepository::new(state.pool());

    if let Some(parent) = req.parent {
        let parent_message = questions
            .get_message(parent)
            .await?
            .ok_or_else(|| ApiError::Validation("Parent message not found".to_string()))?;
        if parent_message.question_id != req.question {
            return Err(ApiError::Validation(
                "Parent message belongs to another question".to_string(),
            ));
        }
    }

    let message = questions
        .create_message(req.question, sender_id, role, &req.text, req.parent)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Question not found".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(message)))
}

// =============================================================================
// Answers
// =============================================================================

/// List all answers.
///
/// `GET /api/answers`
pub async fn list_answers(
    State(state): State<AppState>,
    RequireStaff(_current): RequireStaff,
) -> Result<Json<Vec<QuestionAnswer>>, ApiError> {
    let answers = QuestionRepository::new(state.pool()).list_answers().await?;
    Ok(Json(answers))
}

/// Request body for answering a question.
#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    pub question: QuestionId,
    pub text: String,
}

/// Answer a question as staff.
///
/// `POST /api/answers`
pub async fn create_answer(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
    Json(req): Json<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<QuestionAnswer>), ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("Text must not be empty".to_string()));
    }

    let answer = QuestionRepository::new(state.pool())
        .create_answer(
            req.question,
            Some(current.id),
            SenderRole::from(current.role),
            &req.text,
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Question not found".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(answer)))
}

/// List the answers attached to one buyer's questions.
///
/// `GET /api/answers/by-user/{user_id}`
pub async fn answers_by_user(
    State(state): State<AppState>,
    RequireStaff(_current): RequireStaff,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<QuestionAnswer>>, ApiError> {
    let users = UserRepository::new(state.pool());
    users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let answers = QuestionRepository::new(state.pool())
        .list_answers_for_user(user_id)
        .await?;
    Ok(Json(answers))
}

// =============================================================================
// External ingestion
// =============================================================================

/// Request body for external question ingestion. Everything is optional
/// at the serde layer so missing fields surface as 400s, not a decoder
/// rejection.
#[derive(Debug, Deserialize)]
pub struct ExternalQuestionRequest {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub marketplace: Option<String>,
}

/// Response body for external question ingestion.
#[derive(Debug, Serialize)]
pub struct ExternalQuestionResponse {
    pub message: String,
    pub question_id: QuestionId,
}

/// Ingest a buyer question relayed from a marketplace.
///
/// `POST /api/external/questions`
///
/// Accepts a session or the `X-API-SECRET` header. The buyer account is
/// materialized from `external_id` on first sight and reused afterwards.
/// Marketplace provenance is best-effort on this path: unknown names
/// degrade to null instead of rejecting the question.
pub async fn ingest_external(
    State(state): State<AppState>,
    AuthOrApiSecret(_identity): AuthOrApiSecret,
    Json(req): Json<ExternalQuestionRequest>,
) -> Result<(StatusCode, Json<ExternalQuestionResponse>), ApiError> {
    let external_id = req
        .external_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("external_id is required".to_string()))?;
    let product_id = req
        .product
        .ok_or_else(|| ApiError::Validation("product is required".to_string()))?;
    let text = req
        .text
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("text is required".to_string()))?;

    let marketplace = req.marketplace.as_deref().and_then(Marketplace::parse_lenient);

    ProductRepository::new(state.pool())
        .get_unscoped(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let buyer = UserRepository::new(state.pool())
        .ensure_external(external_id)
        .await?;
    let question = QuestionRepository::new(state.pool())
        .create(product_id, Some(buyer.id), text, marketplace)
        .await?;

    tracing::info!(
        question_id = question.id.as_i32(),
        product_id = product_id.as_i32(),
        "External question ingested"
    );

    Ok((
        StatusCode::CREATED,
        Json(ExternalQuestionResponse {
            message: "Question created".to_string(),
            question_id: question.id,
        }),
    ))
}
