use renewal_guard_core::{NonEmptyString, SubscriptionId};
use renewal_guard_domain::MessageContext;

use crate::renewal_ports::RenewalStep;

/// Result of checking one subscription, threaded from decision to application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortDecision {
    /// The scheduled renewal runs as planned.
    Proceed,
    /// The scheduled renewal must be aborted.
    Abort {
        /// Subscription whose renewal is aborted.
        subscription_id: SubscriptionId,
        /// Renewal stage being aborted.
        context: MessageContext,
        /// Early renewal order that pre-empts the schedule.
        order_number: NonEmptyString,
        /// Audit note to record against the subscription.
        audit_message: String,
    },
}

impl AbortDecision {
    /// Returns whether the renewal must be aborted.
    #[must_use]
    pub fn should_abort(&self) -> bool {
        matches!(self, Self::Abort { .. })
    }

    /// Returns the order number that triggered an abort.
    #[must_use]
    pub fn order_number(&self) -> Option<&NonEmptyString> {
        match self {
            Self::Proceed => None,
            Self::Abort { order_number, .. } => Some(order_number),
        }
    }

    /// Returns the audit note for an abort.
    #[must_use]
    pub fn audit_message(&self) -> Option<&str> {
        match self {
            Self::Proceed => None,
            Self::Abort { audit_message, .. } => Some(audit_message.as_str()),
        }
    }
}

/// Decision plus the steps that were suppressed because of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    /// Decision reached for the subscription.
    pub decision: AbortDecision,
    /// Renewal steps suppressed; empty when proceeding.
    pub suppressed_steps: Vec<RenewalStep>,
}
