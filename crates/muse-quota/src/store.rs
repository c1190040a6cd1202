use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use muse_core::MetricType;

use crate::error::QuotaError;

/// Outcome of an atomic admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Slot reserved; `used` includes this reservation
    Admitted {
        /// Counter value after reserving
        used: u64,
    },
    /// Over the limit; nothing was recorded
    Rejected {
        /// Counter value at rejection time
        used: u64,
    },
}

/// Storage backend for usage counters
///
/// Admission is compare-and-increment in a single guarded step: two
/// concurrent reservations for the same counter cannot both pass when a
/// single slot remains.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Current count for `(user, metric, period)`
    async fn get(&self, user_id: &str, metric: MetricType, period: &str) -> Result<u64, QuotaError>;

    /// Atomically admit one attempt against the counter
    ///
    /// Rejects when the counter has reached `limit` (positive limits
    /// only; 0 or below never rejects). A replayed `idempotency_key` is
    /// admitted without advancing the counter, so retrying the same
    /// attempt never double-counts.
    async fn check_and_reserve(
        &self,
        user_id: &str,
        metric: MetricType,
        period: &str,
        limit: i64,
        idempotency_key: &str,
    ) -> Result<Reservation, QuotaError>;
}

/// In-memory usage store for tests and single-instance deployments
#[derive(Default)]
pub struct MemoryUsageStore {
    counters: DashMap<String, u64>,
    applied_keys: DashSet<String>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter_key(user_id: &str, metric: MetricType, period: &str) -> String {
        format!("{user_id}:{metric}:{period}")
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn get(&self, user_id: &str, metric: MetricType, period: &str) -> Result<u64, QuotaError> {
        let key = Self::counter_key(user_id, metric, period);
        Ok(self.counters.get(&key).map_or(0, |count| *count))
    }

    async fn check_and_reserve(
        &self,
        user_id: &str,
        metric: MetricType,
        period: &str,
        limit: i64,
        idempotency_key: &str,
    ) -> Result<Reservation, QuotaError> {
        let key = Self::counter_key(user_id, metric, period);

        // The entry guard holds the shard lock for this counter, so the
        // compare and the increment happen as one step
        let mut count = self.counters.entry(key).or_insert(0);

        if self.applied_keys.contains(&format!("{period}:{idempotency_key}")) {
            tracing::debug!(user_id, idempotency_key, "replayed reservation ignored");
            return Ok(Reservation::Admitted { used: *count });
        }

        #[allow(clippy::cast_sign_loss)]
        if limit > 0 && *count >= limit as u64 {
            return Ok(Reservation::Rejected { used: *count });
        }

        *count += 1;
        self.applied_keys.insert(format!("{period}:{idempotency_key}"));
        Ok(Reservation::Admitted { used: *count })
    }
}
