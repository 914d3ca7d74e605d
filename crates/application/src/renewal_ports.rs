mod notes;
mod repository;
mod steps;

pub use notes::{SubscriptionNote, SubscriptionNoteRepository};
pub use repository::RenewalOrderRepository;
pub use steps::{RenewalStep, RenewalStepSuppressor};
