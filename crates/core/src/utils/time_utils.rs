use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for valuation and trade dates.
/// Ledger timestamps are UTC instants; the business calendar is Buenos Aires.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::America::Argentina::Buenos_Aires;

/// Converts a UTC instant to a valuation date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default valuation timezone.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

/// Signed number of calendar days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Days elapsed from `start` to `end`, clamped to `[0, cap]`.
pub fn clamped_days_elapsed(start: NaiveDate, end: NaiveDate, cap: i64) -> i64 {
    days_between(start, end).clamp(0, cap.max(0))
}
