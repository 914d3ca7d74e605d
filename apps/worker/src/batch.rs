use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use renewal_guard_core::{AppError, AppResult, SubscriptionId};
use renewal_guard_domain::{EarlyRenewalFlag, OrderSnapshot, OrderSnapshotInput, OrderStatus};
use renewal_guard_infrastructure::InMemoryRenewalOrderRepository;
use serde::Deserialize;

/// Subscriptions due for a scheduled renewal, with their renewal orders.
#[derive(Debug, Deserialize)]
pub struct RenewalBatch {
    subscriptions: Vec<BatchSubscription>,
}

#[derive(Debug, Deserialize)]
struct BatchSubscription {
    subscription_id: SubscriptionId,
    #[serde(default)]
    renewal_orders: Vec<BatchRenewalOrder>,
}

#[derive(Debug, Deserialize)]
struct BatchRenewalOrder {
    order_number: String,
    status: String,
    #[serde(default)]
    early_renewal_meta: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl RenewalBatch {
    /// Reads and parses a batch file.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read renewal batch '{}': {error}",
                path.display()
            ))
        })?;

        Self::parse(contents.as_str())
    }

    /// Parses a batch from its JSON representation.
    pub fn parse(contents: &str) -> AppResult<Self> {
        serde_json::from_str(contents).map_err(|error| {
            AppError::Validation(format!("invalid renewal batch payload: {error}"))
        })
    }

    /// Loads every renewal order into the repository.
    ///
    /// Returns the subscriptions to guard, first occurrence order, without duplicates.
    pub async fn seed(
        self,
        repository: &InMemoryRenewalOrderRepository,
    ) -> AppResult<Vec<SubscriptionId>> {
        let mut subscription_ids = Vec::with_capacity(self.subscriptions.len());
        let mut seen = HashSet::with_capacity(self.subscriptions.len());

        for subscription in self.subscriptions {
            if seen.insert(subscription.subscription_id) {
                subscription_ids.push(subscription.subscription_id);
            }

            for order in subscription.renewal_orders {
                let snapshot = order.try_into_snapshot().map_err(|error| {
                    AppError::Validation(format!(
                        "invalid renewal order for subscription '{}': {error}",
                        subscription.subscription_id
                    ))
                })?;
                repository
                    .add_renewal_order(subscription.subscription_id, snapshot)
                    .await?;
            }
        }

        Ok(subscription_ids)
    }
}

impl BatchRenewalOrder {
    fn try_into_snapshot(self) -> AppResult<OrderSnapshot> {
        OrderSnapshot::new(OrderSnapshotInput {
            status: self.status.parse::<OrderStatus>()?,
            early_renewal: EarlyRenewalFlag::from_meta_value(self.early_renewal_meta.as_deref()),
            created_at: self.created_at,
            order_number: self.order_number,
        })
    }
}
