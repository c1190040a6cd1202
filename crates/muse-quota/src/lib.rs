#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Per-user, per-metric usage quotas scoped to a billing period
//!
//! Limits are resolved from the caller's subscription tier at check time,
//! so a mid-period upgrade or downgrade takes effect on the next call.
//! Admission is a single compare-and-increment, idempotency-keyed by
//! generation record id: concurrent requests cannot overfill a limit and
//! retrying the same attempt never double-counts.

mod error;
mod ledger;
mod period;
mod store;

pub use error::QuotaError;
pub use ledger::{QuotaLedger, TierLimits, UsageCheck};
pub use period::current_period;
pub use store::{MemoryUsageStore, Reservation, UsageStore};
