use std::sync::Arc;

use muse_config::QuotaConfig;
use muse_core::{Identity, MetricType, SubscriptionTier};
use serde::Serialize;

use crate::{
    error::QuotaError,
    period::current_period,
    store::{Reservation, UsageStore},
};

/// Resolves tier limits for a metric
///
/// Seam to the subscription service. Resolved at every check so a
/// mid-period tier change applies immediately. A limit of 0 or below is
/// the "unlimited" sentinel.
pub trait TierLimits: Send + Sync {
    /// Limit for `(tier, metric)` per billing period
    fn limit(&self, tier: SubscriptionTier, metric: MetricType) -> i64;
}

impl TierLimits for QuotaConfig {
    fn limit(&self, tier: SubscriptionTier, metric: MetricType) -> i64 {
        self.tiers
            .get(&tier)
            .and_then(|metrics| metrics.get(&metric))
            .copied()
            .unwrap_or(0)
    }
}

/// Result of a usage check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCheck {
    /// Usage consumed this period
    pub used: u64,
    /// Tier limit (0 or below: unlimited)
    pub limit: i64,
    /// Remaining allowance; `None` when unlimited
    pub remaining: Option<u64>,
}

impl UsageCheck {
    fn new(used: u64, limit: i64) -> Self {
        let remaining = if limit > 0 {
            // limit > 0 guarantees the cast is lossless
            #[allow(clippy::cast_sign_loss)]
            Some((limit as u64).saturating_sub(used))
        } else {
            None
        };

        Self { used, limit, remaining }
    }
}

/// Per-user usage ledger enforcing tier limits
pub struct QuotaLedger {
    limits: Arc<dyn TierLimits>,
    store: Arc<dyn UsageStore>,
}

impl QuotaLedger {
    pub fn new(limits: Arc<dyn TierLimits>, store: Arc<dyn UsageStore>) -> Self {
        Self { limits, store }
    }

    /// Current usage against the tier limit, read-only
    pub async fn check(&self, user: &Identity, metric: MetricType) -> Result<UsageCheck, QuotaError> {
        let used = self.store.get(&user.user_id, metric, &current_period()).await?;
        let limit = self.limits.limit(user.tier, metric);

        Ok(UsageCheck::new(used, limit))
    }

    /// Atomically admit one attempt, consuming a slot
    ///
    /// The compare and the increment are one store operation, so two
    /// concurrent requests cannot both pass when a single slot remains.
    /// The generation record id is the idempotency key: retrying the same
    /// attempt consumes at most one slot. Reservations are never refunded,
    /// whatever the attempt's outcome.
    ///
    /// # Errors
    ///
    /// `QuotaError::Exceeded` when the limit is positive and already
    /// reached. Non-positive limits never reject (unlimited sentinel).
    pub async fn reserve(
        &self,
        user: &Identity,
        metric: MetricType,
        idempotency_key: &str,
    ) -> Result<UsageCheck, QuotaError> {
        let limit = self.limits.limit(user.tier, metric);

        let outcome = self
            .store
            .check_and_reserve(&user.user_id, metric, &current_period(), limit, idempotency_key)
            .await?;

        match outcome {
            Reservation::Admitted { used } => {
                tracing::debug!(user_id = %user.user_id, metric = %metric, used, "usage slot reserved");
                Ok(UsageCheck::new(used, limit))
            }
            Reservation::Rejected { used } => {
                tracing::debug!(
                    user_id = %user.user_id,
                    metric = %metric,
                    used,
                    limit,
                    "quota exceeded"
                );
                Err(QuotaError::Exceeded { used, limit })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use muse_core::SubscriptionTier;

    use super::*;
    use crate::store::MemoryUsageStore;

    struct FixedLimits(i64);

    impl TierLimits for FixedLimits {
        fn limit(&self, _tier: SubscriptionTier, _metric: MetricType) -> i64 {
            self.0
        }
    }

    fn ledger(limit: i64) -> QuotaLedger {
        QuotaLedger::new(Arc::new(FixedLimits(limit)), Arc::new(MemoryUsageStore::new()))
    }

    fn free_user() -> Identity {
        Identity::new("usr_1", SubscriptionTier::Free)
    }

    #[tokio::test]
    async fn reserve_rejects_at_limit() {
        let ledger = ledger(2);
        let user = free_user();

        ledger.reserve(&user, MetricType::AiGenerations, "rec_1").await.unwrap();
        ledger.reserve(&user, MetricType::AiGenerations, "rec_2").await.unwrap();

        let err = ledger.reserve(&user, MetricType::AiGenerations, "rec_3").await.unwrap_err();
        assert!(matches!(err, QuotaError::Exceeded { used: 2, limit: 2 }));

        // The rejected attempt consumed nothing
        let check = ledger.check(&user, MetricType::AiGenerations).await.unwrap();
        assert_eq!(check.used, 2);
    }

    #[tokio::test]
    async fn zero_limit_is_unlimited() {
        let ledger = ledger(0);
        let user = free_user();

        for i in 0..50 {
            ledger
                .reserve(&user, MetricType::AiGenerations, &format!("rec_{i}"))
                .await
                .unwrap();
        }

        let check = ledger.check(&user, MetricType::AiGenerations).await.unwrap();
        assert_eq!(check.used, 50);
        assert_eq!(check.remaining, None);
    }

    #[tokio::test]
    async fn remaining_counts_down() {
        let ledger = ledger(10);
        let user = free_user();

        let check = ledger.reserve(&user, MetricType::AiGenerations, "rec_1").await.unwrap();
        assert_eq!(check.used, 1);
        assert_eq!(check.remaining, Some(9));
    }

    #[tokio::test]
    async fn replayed_reservation_consumes_one_slot() {
        let ledger = ledger(10);
        let user = free_user();

        ledger.reserve(&user, MetricType::AiGenerations, "rec_1").await.unwrap();
        ledger.reserve(&user, MetricType::AiGenerations, "rec_1").await.unwrap();

        let check = ledger.check(&user, MetricType::AiGenerations).await.unwrap();
        assert_eq!(check.used, 1);
    }
}
