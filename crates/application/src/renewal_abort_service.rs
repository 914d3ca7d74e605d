use std::sync::Arc;

use chrono::{DateTime, Utc};
use renewal_guard_core::{AppResult, SubscriptionId};
use renewal_guard_domain::{AgeWindow, MessageContext, find_first_abort_with};
use tracing::{debug, info};

use crate::renewal_ports::{
    RenewalOrderRepository, RenewalStep, RenewalStepSuppressor, SubscriptionNote,
    SubscriptionNoteRepository,
};

mod decision;

pub use decision::{AbortDecision, GuardOutcome};

/// Aborts scheduled renewals that an on-hold early renewal already covers.
#[derive(Clone)]
pub struct RenewalAbortService {
    order_repository: Arc<dyn RenewalOrderRepository>,
    note_repository: Arc<dyn SubscriptionNoteRepository>,
    step_suppressor: Arc<dyn RenewalStepSuppressor>,
    age_window: AgeWindow,
}

impl RenewalAbortService {
    /// Creates a renewal abort service with the default age window.
    #[must_use]
    pub fn new(
        order_repository: Arc<dyn RenewalOrderRepository>,
        note_repository: Arc<dyn SubscriptionNoteRepository>,
        step_suppressor: Arc<dyn RenewalStepSuppressor>,
    ) -> Self {
        Self {
            order_repository,
            note_repository,
            step_suppressor,
            age_window: AgeWindow::default(),
        }
    }

    /// Overrides how recent an early renewal must be to pre-empt the schedule.
    #[must_use]
    pub fn with_age_window(mut self, age_window: AgeWindow) -> Self {
        self.age_window = age_window;
        self
    }

    /// Returns the configured age window.
    #[must_use]
    pub fn age_window(&self) -> AgeWindow {
        self.age_window
    }

    /// Decides whether the scheduled renewal of one subscription must be aborted.
    ///
    /// Only reads renewal orders; the returned decision is handed to [`Self::apply`].
    pub async fn decide(
        &self,
        subscription_id: SubscriptionId,
        context: MessageContext,
        now: DateTime<Utc>,
    ) -> AppResult<AbortDecision> {
        let orders = self
            .order_repository
            .list_renewal_orders(subscription_id)
            .await?;

        let matched =
            find_first_abort_with(&orders, now, self.age_window, context, |snapshot, eligibility| {
                debug!(
                    subscription_id = %subscription_id,
                    order_number = %snapshot.order_number(),
                    status = %snapshot.status(),
                    reason = eligibility.as_str(),
                    "renewal order does not pre-empt scheduled renewal"
                );
            });

        let Some(matched) = matched else {
            debug!(
                subscription_id = %subscription_id,
                context = %context,
                candidate_count = orders.len(),
                "no early renewal pre-empts scheduled renewal"
            );
            return Ok(AbortDecision::Proceed);
        };

        Ok(AbortDecision::Abort {
            subscription_id,
            context,
            order_number: matched.order_number,
            audit_message: matched.audit_message,
        })
    }

    /// Suppresses the context's renewal steps, then records the audit note.
    ///
    /// The note is written only once every step is suppressed, so a failed
    /// suppression leaves no "aborted" note behind and the call can be retried.
    pub async fn apply(&self, decision: &AbortDecision) -> AppResult<Vec<RenewalStep>> {
        let AbortDecision::Abort {
            subscription_id,
            context,
            order_number,
            audit_message,
        } = decision
        else {
            return Ok(Vec::new());
        };

        let steps = RenewalStep::for_context(*context);
        for step in steps {
            self.step_suppressor
                .suppress_step(*subscription_id, *step)
                .await?;
        }

        self.note_repository
            .append_note(SubscriptionNote {
                subscription_id: *subscription_id,
                context: *context,
                order_number: order_number.clone(),
                message: audit_message.clone(),
            })
            .await?;

        info!(
            subscription_id = %subscription_id,
            order_number = %order_number,
            context = %context,
            suppressed_steps = steps.len(),
            "scheduled renewal aborted"
        );

        Ok(steps.to_vec())
    }

    /// Decides and applies the abort for one subscription in a single call.
    pub async fn guard_scheduled_renewal(
        &self,
        subscription_id: SubscriptionId,
        context: MessageContext,
        now: DateTime<Utc>,
    ) -> AppResult<GuardOutcome> {
        let decision = self.decide(subscription_id, context, now).await?;
        let suppressed_steps = self.apply(&decision).await?;

        Ok(GuardOutcome {
            decision,
            suppressed_steps,
        })
    }
}
