//! Human-readable decomposition of time amounts.

use chrono::{DateTime, Utc};

/// Units understood by [`humanize_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    /// Length of one unit in seconds. Months are 4 weeks, years 48 weeks.
    fn interval(self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3600,
            TimeUnit::Days => 86400,
            TimeUnit::Weeks => 604800,
            TimeUnit::Months => 2419200,
            TimeUnit::Years => 29030400,
        }
    }

    fn names(self) -> (&'static str, &'static str) {
        match self {
            TimeUnit::Seconds => ("second", "seconds"),
            TimeUnit::Minutes => ("minute", "minutes"),
            TimeUnit::Hours => ("hour", "hours"),
            TimeUnit::Days => ("day", "days"),
            TimeUnit::Weeks => ("week", "weeks"),
            TimeUnit::Months => ("month", "months"),
            TimeUnit::Years => ("year", "years"),
        }
    }
}

const DESCENDING: [TimeUnit; 7] = [
    TimeUnit::Years,
    TimeUnit::Months,
    TimeUnit::Weeks,
    TimeUnit::Days,
    TimeUnit::Hours,
    TimeUnit::Minutes,
    TimeUnit::Seconds,
];

/// Divide an amount of time into descending (value, unit-name) periods.
///
/// ```rust
/// use vireo_common::{humanize_time, TimeUnit};
///
/// assert_eq!(
///     humanize_time(173, TimeUnit::Hours),
///     vec![(1, "week"), (5, "hours")]
/// );
/// ```
pub fn humanize_time(amount: u64, unit: TimeUnit) -> Vec<(u64, &'static str)> {
    let mut remaining = amount.saturating_mul(unit.interval());
    let mut result = Vec::new();

    for period in DESCENDING {
        let value = remaining / period.interval();
        if value > 0 {
            let (singular, plural) = period.names();
            result.push((value, if value == 1 { singular } else { plural }));
            remaining -= value * period.interval();
        }
    }
    result
}

/// Comma-joined string form of [`humanize_time`].
pub fn humanize_time_str(amount: u64, unit: TimeUnit) -> String {
    humanize_time(amount, unit)
        .into_iter()
        .map(|(value, name)| format!("{} {}", value, name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fractional epoch seconds for a datetime, microsecond precision.
pub fn timestamp(date: &DateTime<Utc>) -> f64 {
    date.timestamp() as f64 + f64::from(date.timestamp_subsec_micros()) / 1e6
}
