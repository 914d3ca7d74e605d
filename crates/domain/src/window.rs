use std::fmt::{Display, Formatter};

use chrono::TimeDelta;
use renewal_guard_core::{AppError, AppResult};

const DEFAULT_WINDOW_WEEKS: i64 = 3;

const DISPLAY_UNITS: &[(i64, &str)] = &[
    (7 * 24 * 60 * 60, "week"),
    (24 * 60 * 60, "day"),
    (60 * 60, "hour"),
    (60, "minute"),
    (1, "second"),
];

/// How far back an early renewal order may have been created and still
/// pre-empt the scheduled renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeWindow(TimeDelta);

impl AgeWindow {
    /// Creates a validated window from a positive whole-second duration.
    pub fn new(duration: TimeDelta) -> AppResult<Self> {
        if duration <= TimeDelta::zero() {
            return Err(AppError::Validation(
                "age window must be greater than zero".to_owned(),
            ));
        }

        if duration.subsec_nanos() != 0 {
            return Err(AppError::Validation(
                "age window must be a whole number of seconds".to_owned(),
            ));
        }

        Ok(Self(duration))
    }

    /// Creates a window spanning the given number of days.
    pub fn from_days(days: i64) -> AppResult<Self> {
        let duration = TimeDelta::try_days(days).ok_or_else(|| {
            AppError::Validation(format!("age window of {days} days is out of range"))
        })?;

        Self::new(duration)
    }

    /// Creates a window spanning the given number of weeks.
    pub fn from_weeks(weeks: i64) -> AppResult<Self> {
        let duration = TimeDelta::try_weeks(weeks).ok_or_else(|| {
            AppError::Validation(format!("age window of {weeks} weeks is out of range"))
        })?;

        Self::new(duration)
    }

    /// Returns the window as a duration.
    #[must_use]
    pub fn as_time_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Default for AgeWindow {
    fn default() -> Self {
        Self(TimeDelta::weeks(DEFAULT_WINDOW_WEEKS))
    }
}

impl Display for AgeWindow {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let seconds = self.0.num_seconds();
        let (unit_seconds, unit) = DISPLAY_UNITS
            .iter()
            .copied()
            .find(|(unit_seconds, _)| seconds % unit_seconds == 0)
            .unwrap_or((1, "second"));
        let count = seconds / unit_seconds;

        if count == 1 {
            write!(formatter, "1 {unit}")
        } else {
            write!(formatter, "{count} {unit}s")
        }
    }
}
