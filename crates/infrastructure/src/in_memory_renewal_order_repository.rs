use std::collections::HashMap;

use async_trait::async_trait;
use renewal_guard_application::RenewalOrderRepository;
use renewal_guard_core::{AppError, AppResult, SubscriptionId};
use renewal_guard_domain::OrderSnapshot;
use tokio::sync::RwLock;

/// In-memory renewal order repository keyed by subscription.
#[derive(Debug, Default)]
pub struct InMemoryRenewalOrderRepository {
    orders: RwLock<HashMap<SubscriptionId, Vec<OrderSnapshot>>>,
}

impl InMemoryRenewalOrderRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches one renewal order to a subscription.
    pub async fn add_renewal_order(
        &self,
        subscription_id: SubscriptionId,
        order: OrderSnapshot,
    ) -> AppResult<()> {
        let mut orders = self.orders.write().await;
        let subscription_orders = orders.entry(subscription_id).or_default();

        if subscription_orders
            .iter()
            .any(|existing| existing.order_number() == order.order_number())
        {
            return Err(AppError::Conflict(format!(
                "renewal order '{}' already exists for subscription '{}'",
                order.order_number(),
                subscription_id
            )));
        }

        subscription_orders.push(order);
        Ok(())
    }
}

#[async_trait]
impl RenewalOrderRepository for InMemoryRenewalOrderRepository {
    async fn list_renewal_orders(
        &self,
        subscription_id: SubscriptionId,
    ) -> AppResult<Vec<OrderSnapshot>> {
        Ok(self
            .orders
            .read()
            .await
            .get(&subscription_id)
            .cloned()
            .unwrap_or_default())
    }
}
