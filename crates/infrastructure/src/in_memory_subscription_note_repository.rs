use async_trait::async_trait;
use chrono::{DateTime, Utc};
use renewal_guard_application::{SubscriptionNote, SubscriptionNoteRepository};
use renewal_guard_core::{AppResult, SubscriptionId};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Subscription note together with its storage metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubscriptionNote {
    /// Stable note identifier.
    pub note_id: Uuid,
    /// Time the note was appended.
    pub created_at: DateTime<Utc>,
    /// Note payload.
    pub note: SubscriptionNote,
}

/// Append-only in-memory subscription note store.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionNoteRepository {
    notes: RwLock<Vec<StoredSubscriptionNote>>,
}

impl InMemorySubscriptionNoteRepository {
    /// Creates an empty note store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists notes for one subscription, oldest first.
    pub async fn list_notes(&self, subscription_id: SubscriptionId) -> Vec<StoredSubscriptionNote> {
        self.notes
            .read()
            .await
            .iter()
            .filter(|stored| stored.note.subscription_id == subscription_id)
            .cloned()
            .collect()
    }

    /// Lists every stored note, oldest first.
    pub async fn list_all_notes(&self) -> Vec<StoredSubscriptionNote> {
        self.notes.read().await.clone()
    }
}

#[async_trait]
impl SubscriptionNoteRepository for InMemorySubscriptionNoteRepository {
    async fn append_note(&self, note: SubscriptionNote) -> AppResult<()> {
        self.notes.write().await.push(StoredSubscriptionNote {
            note_id: Uuid::new_v4(),
            created_at: Utc::now(),
            note,
        });

        Ok(())
    }
}
