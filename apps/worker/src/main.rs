//! Renewal guard batch worker.

#![forbid(unsafe_code)]

mod batch;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use renewal_guard_application::RenewalAbortService;
use renewal_guard_core::{AppError, AppResult};
use renewal_guard_domain::{AgeWindow, MessageContext};
use renewal_guard_infrastructure::{
    InMemoryRenewalOrderRepository, InMemoryRenewalStepSuppressor,
    InMemorySubscriptionNoteRepository,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::batch::RenewalBatch;

#[derive(Debug, Clone)]
struct WorkerConfig {
    batch_path: PathBuf,
    age_window: AgeWindow,
    message_context: MessageContext,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let order_repository = Arc::new(InMemoryRenewalOrderRepository::new());
    let subscription_ids = RenewalBatch::load(config.batch_path.as_path())
        .await?
        .seed(&order_repository)
        .await?;

    let note_repository = Arc::new(InMemorySubscriptionNoteRepository::new());
    let step_suppressor = Arc::new(InMemoryRenewalStepSuppressor::new());
    let service = RenewalAbortService::new(
        order_repository.clone(),
        note_repository.clone(),
        step_suppressor,
    )
    .with_age_window(config.age_window);

    info!(
        batch_path = %config.batch_path.display(),
        age_window = %config.age_window,
        message_context = %config.message_context,
        subscription_count = subscription_ids.len(),
        "renewal-guard-worker started"
    );

    let now = Utc::now();
    let mut aborted = 0_u32;
    let mut proceeded = 0_u32;
    let mut failed = 0_u32;

    for subscription_id in subscription_ids {
        match service
            .guard_scheduled_renewal(subscription_id, config.message_context, now)
            .await
        {
            Ok(outcome) if outcome.decision.should_abort() => {
                aborted = aborted.saturating_add(1);
                info!(
                    subscription_id = %subscription_id,
                    audit_message = outcome.decision.audit_message().unwrap_or_default(),
                    suppressed_steps = ?outcome.suppressed_steps,
                    "scheduled renewal will not run"
                );
            }
            Ok(_) => {
                proceeded = proceeded.saturating_add(1);
            }
            Err(error) => {
                failed = failed.saturating_add(1);
                warn!(
                    subscription_id = %subscription_id,
                    error = %error,
                    "failed to guard scheduled renewal"
                );
            }
        }
    }

    info!(
        aborted,
        proceeded,
        failed,
        notes_recorded = note_repository.list_all_notes().await.len(),
        "renewal-guard-worker finished"
    );

    if failed > 0 {
        return Err(AppError::Internal(format!(
            "{failed} subscription(s) could not be guarded"
        )));
    }

    Ok(())
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let batch_path = PathBuf::from(required_env("RENEWAL_BATCH_PATH")?);
        let age_window_days = parse_env_u32("RENEWAL_AGE_WINDOW_DAYS", 21)?;
        let message_context = match env::var("RENEWAL_MESSAGE_CONTEXT") {
            Ok(value) => value.parse::<MessageContext>().map_err(|_| {
                AppError::Validation(format!(
                    "invalid RENEWAL_MESSAGE_CONTEXT value '{value}': expected 'payment' or 'notification'"
                ))
            })?,
            Err(_) => MessageContext::default(),
        };

        Ok(Self {
            batch_path,
            age_window: age_window_from_days(age_window_days)?,
            message_context,
        })
    }
}

fn age_window_from_days(days: u32) -> AppResult<AgeWindow> {
    AgeWindow::from_days(i64::from(days)).map_err(|error| {
        AppError::Validation(format!(
            "invalid RENEWAL_AGE_WINDOW_DAYS value '{days}': {error}"
        ))
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
