use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use renewal_guard_application::{RenewalStep, RenewalStepSuppressor};
use renewal_guard_core::{AppResult, SubscriptionId};
use tokio::sync::RwLock;
use tracing::info;

/// Tracks suppressed renewal steps for the host workflow to consult.
#[derive(Debug, Default)]
pub struct InMemoryRenewalStepSuppressor {
    suppressed: RwLock<HashMap<SubscriptionId, HashSet<RenewalStep>>>,
}

impl InMemoryRenewalStepSuppressor {
    /// Creates a suppressor with nothing suppressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a step is suppressed for one subscription.
    pub async fn is_suppressed(&self, subscription_id: SubscriptionId, step: RenewalStep) -> bool {
        self.suppressed
            .read()
            .await
            .get(&subscription_id)
            .is_some_and(|steps| steps.contains(&step))
    }

    /// Returns the suppressed steps for one subscription in workflow order.
    pub async fn suppressed_steps(&self, subscription_id: SubscriptionId) -> Vec<RenewalStep> {
        let suppressed = self.suppressed.read().await;
        let Some(steps) = suppressed.get(&subscription_id) else {
            return Vec::new();
        };

        [
            RenewalStep::PrepareRenewal,
            RenewalStep::GatewayCharge,
            RenewalStep::CustomerNotification,
        ]
        .into_iter()
        .filter(|step| steps.contains(step))
        .collect()
    }
}

#[async_trait]
impl RenewalStepSuppressor for InMemoryRenewalStepSuppressor {
    async fn suppress_step(
        &self,
        subscription_id: SubscriptionId,
        step: RenewalStep,
    ) -> AppResult<()> {
        let newly_suppressed = self
            .suppressed
            .write()
            .await
            .entry(subscription_id)
            .or_default()
            .insert(step);

        if newly_suppressed {
            info!(
                subscription_id = %subscription_id,
                step = %step,
                "renewal step suppressed"
            );
        }

        Ok(())
    }
}
