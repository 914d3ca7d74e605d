//! Application services and ports.

#![forbid(unsafe_code)]

mod renewal_abort_service;
mod renewal_ports;

pub use renewal_abort_service::{AbortDecision, GuardOutcome, RenewalAbortService};
pub use renewal_ports::{
    RenewalOrderRepository, RenewalStep, RenewalStepSuppressor, SubscriptionNote,
    SubscriptionNoteRepository,
};
