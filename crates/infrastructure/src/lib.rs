//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_renewal_order_repository;
mod in_memory_renewal_step_suppressor;
mod in_memory_subscription_note_repository;

pub use in_memory_renewal_order_repository::InMemoryRenewalOrderRepository;
pub use in_memory_renewal_step_suppressor::InMemoryRenewalStepSuppressor;
pub use in_memory_subscription_note_repository::{
    InMemorySubscriptionNoteRepository, StoredSubscriptionNote,
};
