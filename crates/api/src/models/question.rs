//! Buyer question, message, and answer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sellerdesk_core::{AnswerId, Marketplace, MessageId, ProductId, QuestionId, SenderRole, UserId};

/// A buyer question about a product.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    /// Unique question ID.
    pub id: QuestionId,
    /// Product the question is about.
    pub product_id: ProductId,
    /// The asking buyer. `None` once the account is deleted.
    pub user_id: Option<UserId>,
    /// Question text.
    pub text: String,
    /// Marketplace the question arrived from, when known.
    pub marketplace: Option<Marketplace>,
    /// Whether staff marked the thread resolved.
    pub is_resolved: bool,
    /// When the question was asked.
    pub created_at: DateTime<Utc>,
}

/// One message in a question thread.
///
/// `marketplace` is provenance copied from the owning question at write
/// time; clients cannot set it directly.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionMessage {
    /// Unique message ID.
    pub id: MessageId,
    /// Thread this message belongs to.
    pub question_id: QuestionId,
    /// Sending account, `None` for automation or deleted accounts.
    pub sender_id: Option<UserId>,
    /// Message text.
    pub text: String,
    /// Role the sender held when the message was written.
    pub role: SenderRole,
    /// The message this one replies to, if any.
    pub parent_id: Option<MessageId>,
    /// Provenance inherited from the question.
    pub marketplace: Option<Marketplace>,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
}

/// A staff or automated answer attached to a question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnswer {
    /// Unique answer ID.
    pub id: AnswerId,
    /// Question being answered.
    pub question_id: QuestionId,
    /// Responding account, `None` for automation or deleted accounts.
    pub responder_id: Option<UserId>,
    /// Answer text.
    pub text: String,
    /// Role the responder held when answering.
    pub role: SenderRole,
    /// Provenance inherited from the question.
    pub marketplace: Option<Marketplace>,
    /// When the answer was sent.
    pub sent_at: DateTime<Utc>,
}
