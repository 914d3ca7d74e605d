//! End-to-end guard flow over the in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use renewal_guard_application::{RenewalAbortService, RenewalStep};
use renewal_guard_core::SubscriptionId;
use renewal_guard_domain::{
    AgeWindow, EarlyRenewalFlag, MessageContext, OrderSnapshot, OrderSnapshotInput, OrderStatus,
};
use renewal_guard_infrastructure::{
    InMemoryRenewalOrderRepository, InMemoryRenewalStepSuppressor,
    InMemorySubscriptionNoteRepository,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0)
        .single()
        .unwrap_or_default()
}

async fn seed(
    repository: &InMemoryRenewalOrderRepository,
    subscription_id: u64,
    order_number: &str,
    status: &str,
    meta: Option<&str>,
    age_days: i64,
) {
    let status = status.parse::<OrderStatus>();
    let snapshot = status.and_then(|status| {
        OrderSnapshot::new(OrderSnapshotInput {
            status,
            early_renewal: EarlyRenewalFlag::from_meta_value(meta),
            created_at: Some(now() - TimeDelta::days(age_days)),
            order_number: order_number.to_owned(),
        })
    });

    let inserted = match snapshot {
        Ok(snapshot) => {
            repository
                .add_renewal_order(SubscriptionId::new(subscription_id), snapshot)
                .await
        }
        Err(error) => Err(error),
    };
    assert!(inserted.is_ok());
}

#[tokio::test]
async fn payment_and_notification_stages_share_one_decision_flow() {
    let orders = Arc::new(InMemoryRenewalOrderRepository::new());
    let notes = Arc::new(InMemorySubscriptionNoteRepository::new());
    let suppressor = Arc::new(InMemoryRenewalStepSuppressor::new());

    seed(&orders, 1, "7001", "wc-completed", Some("1"), 2).await;
    seed(&orders, 1, "7002", "wc-on-hold", Some("1"), 6).await;
    seed(&orders, 2, "7003", "wc-on-hold", Some("1"), 30).await;
    seed(&orders, 3, "7004", "wc-on-hold", None, 1).await;

    let service = RenewalAbortService::new(orders.clone(), notes.clone(), suppressor.clone())
        .with_age_window(AgeWindow::default());

    for subscription_id in [1, 2, 3, 4] {
        let outcome = service
            .guard_scheduled_renewal(
                SubscriptionId::new(subscription_id),
                MessageContext::Payment,
                now(),
            )
            .await;
        assert!(outcome.is_ok());
    }

    let decision = service
        .decide(SubscriptionId::new(1), MessageContext::Notification, now())
        .await;
    let steps = match decision {
        Ok(decision) => service.apply(&decision).await,
        Err(error) => Err(error),
    };
    assert!(steps.is_ok_and(|steps| steps == vec![RenewalStep::CustomerNotification]));

    assert_eq!(
        suppressor.suppressed_steps(SubscriptionId::new(1)).await,
        vec![
            RenewalStep::PrepareRenewal,
            RenewalStep::GatewayCharge,
            RenewalStep::CustomerNotification,
        ]
    );
    assert!(suppressor.suppressed_steps(SubscriptionId::new(2)).await.is_empty());
    assert!(suppressor.suppressed_steps(SubscriptionId::new(3)).await.is_empty());

    let messages = notes
        .list_notes(SubscriptionId::new(1))
        .await
        .into_iter()
        .map(|stored| stored.note.message)
        .collect::<Vec<_>>();
    assert_eq!(
        messages,
        vec![
            "Scheduled renewal payment aborted: found early renewal order #7002 on hold, created within past 3 weeks.".to_owned(),
            "Scheduled renewal notification aborted: found early renewal order #7002 on hold, created within past 3 weeks.".to_owned(),
        ]
    );
    assert_eq!(notes.list_all_notes().await.len(), 2);
}
