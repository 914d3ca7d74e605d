use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use renewal_guard_core::{AppResult, SubscriptionId};
use renewal_guard_domain::MessageContext;
use serde::{Deserialize, Serialize};

/// Downstream stage of the scheduled renewal workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStep {
    /// Creates the renewal order for the due payment.
    PrepareRenewal,
    /// Charges the payment gateway for the renewal order.
    GatewayCharge,
    /// Sends the upcoming renewal notice to the customer.
    CustomerNotification,
}

impl RenewalStep {
    /// Returns the steps an abort in the given context suppresses.
    #[must_use]
    pub fn for_context(context: MessageContext) -> &'static [Self] {
        match context {
            MessageContext::Payment => &[Self::PrepareRenewal, Self::GatewayCharge],
            MessageContext::Notification => &[Self::CustomerNotification],
        }
    }

    /// Returns a stable label for this step.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrepareRenewal => "prepare_renewal",
            Self::GatewayCharge => "gateway_charge",
            Self::CustomerNotification => "customer_notification",
        }
    }
}

impl Display for RenewalStep {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Port that cancels host workflow steps for one subscription instance.
#[async_trait]
pub trait RenewalStepSuppressor: Send + Sync {
    /// Suppresses one step of the pending renewal for a subscription.
    async fn suppress_step(
        &self,
        subscription_id: SubscriptionId,
        step: RenewalStep,
    ) -> AppResult<()>;
}
