use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use renewal_guard_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{AgeWindow, OrderSnapshot};

/// Renewal stage the audit message is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContext {
    /// Gateway charge for the scheduled renewal.
    #[default]
    Payment,
    /// Customer notification ahead of the scheduled renewal.
    Notification,
}

impl MessageContext {
    /// Returns a stable transport value for this context.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Notification => "notification",
        }
    }

    /// Renders the audit note left on the subscription when a renewal is aborted.
    #[must_use]
    pub fn audit_message(&self, order_number: &str, window: AgeWindow) -> String {
        let stage = self.as_str();
        format!(
            "Scheduled renewal {stage} aborted: found early renewal order #{order_number} on hold, created within past {window}."
        )
    }
}

impl FromStr for MessageContext {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "payment" => Ok(Self::Payment),
            "notification" => Ok(Self::Notification),
            _ => Err(AppError::Validation(format!(
                "unknown message context '{value}'"
            ))),
        }
    }
}

impl Display for MessageContext {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Outcome of the eligibility check, naming the first criterion that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eligibility {
    /// Every criterion holds; the scheduled renewal should be aborted.
    Eligible,
    /// Order status is not on-hold.
    NotOnHold,
    /// Order carries no early renewal marker.
    NotEarlyRenewal,
    /// Order creation time is unknown.
    CreationTimeUnknown,
    /// Order was created before the age window.
    OutsideWindow,
}

impl Eligibility {
    /// Returns a stable label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eligible => "eligible",
            Self::NotOnHold => "not_on_hold",
            Self::NotEarlyRenewal => "not_early_renewal",
            Self::CreationTimeUnknown => "creation_time_unknown",
            Self::OutsideWindow => "outside_window",
        }
    }

    /// Returns whether every criterion holds.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Abort decision for one order snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    audit_message: Option<String>,
}

impl EvaluationResult {
    fn proceed() -> Self {
        Self {
            audit_message: None,
        }
    }

    fn abort(audit_message: String) -> Self {
        Self {
            audit_message: Some(audit_message),
        }
    }

    /// Returns whether the scheduled renewal should be aborted.
    #[must_use]
    pub fn should_abort(&self) -> bool {
        self.audit_message.is_some()
    }

    /// Returns the audit message; present only when aborting.
    #[must_use]
    pub fn audit_message(&self) -> Option<&str> {
        self.audit_message.as_deref()
    }

    /// Consumes the result and returns the audit message, if any.
    #[must_use]
    pub fn into_audit_message(self) -> Option<String> {
        self.audit_message
    }
}

/// Checks one snapshot against the abort criteria, cheapest first.
#[must_use]
pub fn check(snapshot: &OrderSnapshot, now: DateTime<Utc>, window: AgeWindow) -> Eligibility {
    if !snapshot.status().is_on_hold() {
        return Eligibility::NotOnHold;
    }

    if !snapshot.early_renewal().is_set() {
        return Eligibility::NotEarlyRenewal;
    }

    let Some(created_at) = snapshot.created_at() else {
        return Eligibility::CreationTimeUnknown;
    };

    // Inclusive: an order exactly `window` old still counts.
    if now.signed_duration_since(created_at) > window.as_time_delta() {
        return Eligibility::OutsideWindow;
    }

    Eligibility::Eligible
}

/// Decides whether the scheduled renewal should be aborted because of this order.
#[must_use]
pub fn evaluate(
    snapshot: &OrderSnapshot,
    now: DateTime<Utc>,
    window: AgeWindow,
    context: MessageContext,
) -> EvaluationResult {
    if check(snapshot, now, window).is_eligible() {
        EvaluationResult::abort(context.audit_message(snapshot.order_number().as_str(), window))
    } else {
        EvaluationResult::proceed()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::{Eligibility, MessageContext, check, evaluate};
    use crate::{AgeWindow, EarlyRenewalFlag, OrderSnapshot, OrderSnapshotInput, OrderStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn window_days(days: i64) -> AgeWindow {
        AgeWindow::from_days(days).unwrap_or_default()
    }

    fn snapshot(
        status: OrderStatus,
        meta: Option<&str>,
        age: Option<TimeDelta>,
    ) -> Option<OrderSnapshot> {
        OrderSnapshot::new(OrderSnapshotInput {
            status,
            early_renewal: EarlyRenewalFlag::from_meta_value(meta),
            created_at: age.map(|age| now() - age),
            order_number: "5120".to_owned(),
        })
        .ok()
    }

    #[test]
    fn recent_on_hold_early_renewal_aborts() {
        let Some(order) = snapshot(OrderStatus::OnHold, Some("1"), Some(TimeDelta::days(10)))
        else {
            panic!("snapshot should be valid");
        };

        let result = evaluate(&order, now(), window_days(21), MessageContext::Payment);

        assert!(result.should_abort());
        assert_eq!(
            result.audit_message(),
            Some(
                "Scheduled renewal payment aborted: found early renewal order #5120 on hold, created within past 3 weeks."
            )
        );
    }

    #[test]
    fn order_older_than_window_does_not_abort() {
        let Some(order) = snapshot(OrderStatus::OnHold, Some("1"), Some(TimeDelta::days(25)))
        else {
            panic!("snapshot should be valid");
        };

        let result = evaluate(&order, now(), window_days(21), MessageContext::Payment);

        assert!(!result.should_abort());
        assert_eq!(result.audit_message(), None);
        assert_eq!(
            check(&order, now(), window_days(21)),
            Eligibility::OutsideWindow
        );
    }

    #[test]
    fn processing_order_does_not_abort() {
        let Some(order) = snapshot(OrderStatus::Processing, Some("1"), Some(TimeDelta::days(1)))
        else {
            panic!("snapshot should be valid");
        };

        assert_eq!(
            check(&order, now(), AgeWindow::default()),
            Eligibility::NotOnHold
        );
        assert!(
            !evaluate(&order, now(), AgeWindow::default(), MessageContext::Payment).should_abort()
        );
    }

    #[test]
    fn empty_flag_does_not_abort() {
        let Some(order) = snapshot(OrderStatus::OnHold, Some(""), Some(TimeDelta::days(1))) else {
            panic!("snapshot should be valid");
        };

        assert_eq!(
            check(&order, now(), AgeWindow::default()),
            Eligibility::NotEarlyRenewal
        );
    }

    #[test]
    fn unknown_creation_time_fails_closed() {
        let Some(order) = snapshot(OrderStatus::OnHold, Some("1"), None) else {
            panic!("snapshot should be valid");
        };

        assert_eq!(
            check(&order, now(), AgeWindow::default()),
            Eligibility::CreationTimeUnknown
        );
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let window = window_days(21);
        let at_boundary = snapshot(OrderStatus::OnHold, Some("1"), Some(TimeDelta::days(21)));
        let past_boundary = snapshot(
            OrderStatus::OnHold,
            Some("1"),
            Some(TimeDelta::days(21) + TimeDelta::seconds(1)),
        );

        let (Some(at_boundary), Some(past_boundary)) = (at_boundary, past_boundary) else {
            panic!("snapshots should be valid");
        };

        assert_eq!(check(&at_boundary, now(), window), Eligibility::Eligible);
        assert_eq!(
            check(&past_boundary, now(), window),
            Eligibility::OutsideWindow
        );
    }

    #[test]
    fn future_creation_time_counts_as_recent() {
        let Some(order) = snapshot(OrderStatus::OnHold, Some("1"), Some(TimeDelta::hours(-2)))
        else {
            panic!("snapshot should be valid");
        };

        assert_eq!(
            check(&order, now(), AgeWindow::default()),
            Eligibility::Eligible
        );
    }

    #[test]
    fn notification_context_selects_notification_wording() {
        let Some(order) = snapshot(OrderStatus::OnHold, Some("1"), Some(TimeDelta::days(3))) else {
            panic!("snapshot should be valid");
        };

        let window = AgeWindow::from_weeks(2).unwrap_or_default();
        let result = evaluate(&order, now(), window, MessageContext::Notification);

        assert_eq!(
            result.into_audit_message(),
            Some(
                "Scheduled renewal notification aborted: found early renewal order #5120 on hold, created within past 2 weeks."
                    .to_owned()
            )
        );
    }

    #[test]
    fn message_context_parses_transport_values() {
        assert_eq!(
            MessageContext::from_str("notification").ok(),
            Some(MessageContext::Notification)
        );
        assert_eq!(
            MessageContext::from_str(MessageContext::Payment.as_str()).ok(),
            Some(MessageContext::Payment)
        );
        assert!(MessageContext::from_str("email").is_err());
    }
}
