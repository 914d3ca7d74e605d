use chrono::{DateTime, Utc};
use renewal_guard_core::NonEmptyString;

use crate::{AgeWindow, Eligibility, MessageContext, OrderSnapshot, check};

/// First renewal order found to pre-empt the scheduled renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortMatch {
    /// Zero-based position of the order among the scanned candidates.
    pub position: usize,
    /// Display number of the matching order.
    pub order_number: NonEmptyString,
    /// Audit note to record against the subscription.
    pub audit_message: String,
}

/// Scans candidates in iteration order and stops at the first one that aborts.
///
/// Candidates after the match are never evaluated. An empty input yields `None`.
pub fn find_first_abort<'a, I>(
    snapshots: I,
    now: DateTime<Utc>,
    window: AgeWindow,
    context: MessageContext,
) -> Option<AbortMatch>
where
    I: IntoIterator<Item = &'a OrderSnapshot>,
{
    find_first_abort_with(snapshots, now, window, context, |_, _| {})
}

/// Same scan as [`find_first_abort`], reporting each candidate it rejects.
///
/// `on_rejected` sees only the candidates evaluated before the match.
pub fn find_first_abort_with<'a, I, F>(
    snapshots: I,
    now: DateTime<Utc>,
    window: AgeWindow,
    context: MessageContext,
    mut on_rejected: F,
) -> Option<AbortMatch>
where
    I: IntoIterator<Item = &'a OrderSnapshot>,
    F: FnMut(&OrderSnapshot, Eligibility),
{
    for (position, snapshot) in snapshots.into_iter().enumerate() {
        let eligibility = check(snapshot, now, window);
        if eligibility.is_eligible() {
            let order_number = snapshot.order_number().clone();
            let audit_message = context.audit_message(order_number.as_str(), window);
            return Some(AbortMatch {
                position,
                order_number,
                audit_message,
            });
        }

        on_rejected(snapshot, eligibility);
    }

    None
}
