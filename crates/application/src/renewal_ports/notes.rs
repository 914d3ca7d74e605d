use async_trait::async_trait;
use renewal_guard_core::{AppResult, NonEmptyString, SubscriptionId};
use renewal_guard_domain::MessageContext;
use serde::{Deserialize, Serialize};

/// Audit note recorded against a subscription when its renewal is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionNote {
    /// Subscription the note is attributed to.
    pub subscription_id: SubscriptionId,
    /// Renewal stage that was aborted.
    pub context: MessageContext,
    /// Early renewal order that triggered the abort.
    pub order_number: NonEmptyString,
    /// Human-readable note body.
    pub message: String,
}

/// Port for persisting subscription audit notes.
#[async_trait]
pub trait SubscriptionNoteRepository: Send + Sync {
    /// Appends one note to the subscription history.
    async fn append_note(&self, note: SubscriptionNote) -> AppResult<()>;
}
