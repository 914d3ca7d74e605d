use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use renewal_guard_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Storage prefix the host store puts in front of order status values.
const STATUS_STORAGE_PREFIX: &str = "wc-";

/// Order status as reported by the host store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    /// Awaiting payment.
    Pending,
    /// Payment received, order being fulfilled.
    Processing,
    /// Payment unconfirmed; order held for manual confirmation.
    OnHold,
    /// Order fulfilled.
    Completed,
    /// Order cancelled by an admin or the customer.
    Cancelled,
    /// Order refunded.
    Refunded,
    /// Payment failed or was declined.
    Failed,
    /// Any status registered by extensions.
    Other(String),
}

impl OrderStatus {
    /// Returns a stable storage value for this status, without prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Returns whether the order is held awaiting payment confirmation.
    #[must_use]
    pub fn is_on_hold(&self) -> bool {
        matches!(self, Self::OnHold)
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix(STATUS_STORAGE_PREFIX)
            .unwrap_or(normalized.as_str());

        match normalized {
            "" => Err(AppError::Validation(
                "order status must not be empty".to_owned(),
            )),
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "on-hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            "failed" => Ok(Self::Failed),
            other => Ok(Self::Other(other.to_owned())),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Marker left on orders created by a manual early renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EarlyRenewalFlag {
    /// The order was created ahead of the renewal schedule.
    Set,
    /// No early renewal marker is present.
    #[default]
    Unset,
}

impl EarlyRenewalFlag {
    /// Derives the flag from the raw order metadata value.
    ///
    /// Absent, blank and `"0"` values leave the flag unset, matching how the
    /// host store evaluates metadata truthiness.
    #[must_use]
    pub fn from_meta_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() && value != "0" => Self::Set,
            _ => Self::Unset,
        }
    }

    /// Returns whether the flag is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set)
    }
}

impl From<bool> for EarlyRenewalFlag {
    fn from(value: bool) -> Self {
        if value { Self::Set } else { Self::Unset }
    }
}

/// Point-in-time view of one renewal order, built per evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    status: OrderStatus,
    early_renewal: EarlyRenewalFlag,
    created_at: Option<DateTime<Utc>>,
    order_number: NonEmptyString,
}

/// Input payload used to construct a validated order snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshotInput {
    /// Current order status.
    pub status: OrderStatus,
    /// Early renewal marker derived from order metadata.
    pub early_renewal: EarlyRenewalFlag,
    /// Order creation time, when known.
    pub created_at: Option<DateTime<Utc>>,
    /// Display order number used in audit text.
    pub order_number: String,
}

impl OrderSnapshot {
    /// Creates a validated order snapshot.
    pub fn new(input: OrderSnapshotInput) -> AppResult<Self> {
        let OrderSnapshotInput {
            status,
            early_renewal,
            created_at,
            order_number,
        } = input;

        let order_number = NonEmptyString::new(order_number.trim()).map_err(|_| {
            AppError::Validation("order_number must not be empty or whitespace".to_owned())
        })?;

        Ok(Self {
            status,
            early_renewal,
            created_at,
            order_number,
        })
    }

    /// Returns the order status.
    #[must_use]
    pub fn status(&self) -> &OrderStatus {
        &self.status
    }

    /// Returns the early renewal marker.
    #[must_use]
    pub fn early_renewal(&self) -> EarlyRenewalFlag {
        self.early_renewal
    }

    /// Returns the creation time, if known.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the display order number.
    #[must_use]
    pub fn order_number(&self) -> &NonEmptyString {
        &self.order_number
    }
}
