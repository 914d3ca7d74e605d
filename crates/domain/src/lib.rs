//! Domain entities and the early renewal abort decision rule.

#![forbid(unsafe_code)]

mod evaluator;
mod order;
mod scan;
mod window;

pub use evaluator::{Eligibility, EvaluationResult, MessageContext, check, evaluate};
pub use order::{EarlyRenewalFlag, OrderSnapshot, OrderSnapshotInput, OrderStatus};
pub use scan::{AbortMatch, find_first_abort, find_first_abort_with};
pub use window::AgeWindow;
