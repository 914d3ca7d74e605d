use async_trait::async_trait;
use renewal_guard_core::{AppResult, SubscriptionId};
use renewal_guard_domain::OrderSnapshot;

/// Repository port for the renewal orders attached to a subscription.
#[async_trait]
pub trait RenewalOrderRepository: Send + Sync {
    /// Lists fresh snapshots of every renewal order for one subscription.
    ///
    /// Order is unspecified; an unknown subscription yields an empty list.
    async fn list_renewal_orders(
        &self,
        subscription_id: SubscriptionId,
    ) -> AppResult<Vec<OrderSnapshot>>;
}
