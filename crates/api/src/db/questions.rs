//! Question, message, and answer repository for database operations.
//!
//! A question belongs to a product and optionally to the asking user.
//! Messages and answers hang off the question; their `marketplace`
//! column is provenance copied from the question inside the insert
//! statement, so callers never supply it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sellerdesk_core::{
    AnswerId, Marketplace, MessageId, ProductId, QuestionId, SenderRole, StoreId, UserId,
};

use super::RepositoryError;
use crate::models::{Question, QuestionAnswer, QuestionMessage};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: i32,
    product_id: i32,
    user_id: Option<i32>,
    text: String,
    marketplace: Option<Marketplace>,
    is_resolved: bool,
    created_at: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: QuestionId::new(row.id),
            product_id: ProductId::new(row.product_id),
            user_id: row.user_id.map(UserId::new),
            text: row.text,
            marketplace: row.marketplace,
            is_resolved: row.is_resolved,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i32,
    question_id: i32,
    sender_id: Option<i32>,
    text: String,
    role: SenderRole,
    parent_id: Option<i32>,
    marketplace: Option<Marketplace>,
    sent_at: DateTime<Utc>,
}

impl From<MessageRow> for QuestionMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::new(row.id),
            question_id: QuestionId::new(row.question_id),
            sender_id: row.sender_id.map(UserId::new),
            text: row.text,
            role: row.role,
            parent_id: row.parent_id.map(MessageId::new),
            marketplace: row.marketplace,
            sent_at: row.sent_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AnswerRow {
    id: i32,
    question_id: i32,
    responder_id: Option<i32>,
    text: String,
    role: SenderRole,
    marketplace: Option<Marketplace>,
    sent_at: DateTime<Utc>,
}

impl From<AnswerRow> for QuestionAnswer {
    fn from(row: AnswerRow) -> Self {
        Self {
            id: AnswerId::new(row.id),
            question_id: QuestionId::new(row.question_id),
            responder_id: row.responder_id.map(UserId::new),
            text: row.text,
            role: row.role,
            marketplace: row.marketplace,
            sent_at: row.sent_at,
        }
    }
}

/// One message occurrence inside a store's buyer conversations.
///
/// Input rows for the conversation aggregation; one row per message,
/// carrying the asking user's identity and the message timestamp.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRow {
    pub user_id: UserId,
    pub external_id: Option<String>,
    pub sent_at: DateTime<Utc>,
}

const QUESTION_COLUMNS: &str =
    "id, product_id, user_id, text, marketplace, is_resolved, created_at";
const MESSAGE_COLUMNS: &str =
    "id, question_id, sender_id, text, role, parent_id, marketplace, sent_at";
const ANSWER_COLUMNS: &str = "id, question_id, responder_id, text, role, marketplace, sent_at";

/// Repository for question, message, and answer database operations.
pub struct QuestionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionRepository<'a> {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // ============================================================================
    // Questions
    // ============================================================================

    /// List every question.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Question>, RepositoryError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            r"
            SELECT {QUESTION_COLUMNS}
            FROM questions
            ORDER BY id
            "
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the questions asked by one user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Question>, RepositoryError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            r"
            SELECT {QUESTION_COLUMNS}
            FROM questions
            WHERE user_id = $1
            ORDER BY id
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a question by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r"
            SELECT {QUESTION_COLUMNS}
            FROM questions
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a question against a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: Option<UserId>,
        text: &str,
        marketplace: Option<Marketplace>,
    ) -> Result<Question, RepositoryError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r"
            INSERT INTO questions (product_id, user_id, text, marketplace)
            VALUES ($1, $2, $3, $4)
            RETURNING {QUESTION_COLUMNS}
            "
        ))
        .bind(product_id)
        .bind(user_id)
        .bind(text)
        .bind(marketplace)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    // ============================================================================
    // Messages
    // ============================================================================

    /// List every message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_messages(&self) -> Result<Vec<QuestionMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM question_messages
            ORDER BY id
            "
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a message by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_message(
        &self,
        id: MessageId,
    ) -> Result<Option<QuestionMessage>, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM question_messages
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Append a message to a question's thread.
    ///
    /// The marketplace tag is copied from the question in the same
    /// statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the question does not
    /// exist, or `RepositoryError::Database` if the query fails.
    pub async fn create_message(
        &self,
        question_id: QuestionId,
        sender_id: Option<UserId>,
        role: SenderRole,
        text: &str,
        parent_id: Option<MessageId>,
    ) -> Result<QuestionMessage, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            r"
            INSERT INTO question_messages (question_id, sender_id, text, role,
                                           parent_id, marketplace)
            SELECT q.id, $2, $3, $4, $5, q.marketplace
            FROM questions q
            WHERE q.id = $1
            RETURNING {MESSAGE_COLUMNS}
            "
        ))
        .bind(question_id)
        .bind(sender_id)
        .bind(text)
        .bind(role)
        .bind(parent_id)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| Ok(r.into()))
    }

    /// List the messages of a set of questions, oldest first per thread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_messages_for_questions(
        &self,
        question_ids: &[QuestionId],
    ) -> Result<Vec<QuestionMessage>, RepositoryError> {
        let ids: Vec<i32> = question_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM question_messages
            WHERE question_id = ANY($1)
            ORDER BY question_id, sent_at, id
            "
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ============================================================================
    // Answers
    // ============================================================================

    /// List every answer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_answers(&self) -> Result<Vec<QuestionAnswer>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnswerRow>(&format!(
            r"
            SELECT {ANSWER_COLUMNS}
            FROM question_answers
            ORDER BY id
            "
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Record an answer to a question.
    ///
    /// The marketplace tag is copied from the question in the same
    /// statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the question does not
    /// exist, or `RepositoryError::Database` if the query fails.
    pub async fn create_answer(
        &self,
        question_id: QuestionId,
        responder_id: Option<UserId>,
        role: SenderRole,
        text: &str,
    ) -> Result<QuestionAnswer, RepositoryError> {
        let row = sqlx::query_as::<_, AnswerRow>(&format!(
            r"
            INSERT INTO question_answers (question_id, responder_id, text, role, marketplace)
            SELECT q.id, $2, $3, $4, q.marketplace
            FROM questions q
            WHERE q.id = $1
            RETURNING {ANSWER_COLUMNS}
            "
        ))
        .bind(question_id)
        .bind(responder_id)
        .bind(text)
        .bind(role)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| Ok(r.into()))
    }

    /// List the answers to one user's questions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_answers_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<QuestionAnswer>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r"
            SELECT a.id, a.question_id, a.responder_id, a.text, a.role,
                   a.marketplace, a.sent_at
            FROM question_answers a
            JOIN questions q ON q.id = a.question_id
            WHERE q.user_id = $1
            ORDER BY a.sent_at, a.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ============================================================================
    // Conversation aggregation
    // ============================================================================

    /// Fetch the raw message rows behind a store's buyer conversations.
    ///
    /// One row per message across every question asked against the
    /// store's products by a known user. The grouping itself is pure and
    /// lives in the conversations service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn conversation_rows(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<ConversationRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            r"
            SELECT u.id AS user_id, u.external_id, m.sent_at
            FROM question_messages m
            JOIN questions q ON q.id = m.question_id
            JOIN users u ON u.id = q.user_id
            JOIN products p ON p.id = q.product_id
            WHERE p.store_id = $1
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
