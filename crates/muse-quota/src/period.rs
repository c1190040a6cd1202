use jiff::{Timestamp, tz::TimeZone};

/// Key for the current billing period (calendar month, UTC)
///
/// Counters are keyed by period: a new month starts a fresh key and prior
/// periods are never mutated, which is what makes the rollover "logical"
/// rather than a destructive reset.
pub fn current_period() -> String {
    period_for(Timestamp::now())
}

pub(crate) fn period_for(at: Timestamp) -> String {
    at.to_zoned(TimeZone::UTC).strftime("%Y-%m").to_string()
}
