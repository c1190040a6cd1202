use std::collections::HashMap;

use muse_core::{MetricType, SubscriptionTier};
use serde::Deserialize;

/// Per-tier quota limits per billing period
///
/// A limit of 0 or below is the "unlimited" sentinel: the quota ledger
/// never rejects on it. Metrics absent from a tier's table fall back to
/// unlimited, so unlimited tiers need no entries at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaConfig {
    /// `tier -> metric -> limit`
    #[serde(default = "default_tier_limits")]
    pub tiers: HashMap<SubscriptionTier, HashMap<MetricType, i64>>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            tiers: default_tier_limits(),
        }
    }
}

impl QuotaConfig {
    /// Resolve the limit for a tier and metric
    pub fn limit(&self, tier: SubscriptionTier, metric: MetricType) -> i64 {
        self.tiers
            .get(&tier)
            .and_then(|metrics| metrics.get(&metric))
            .copied()
            .unwrap_or(0)
    }
}

fn default_tier_limits() -> HashMap<SubscriptionTier, HashMap<MetricType, i64>> {
    let mut tiers = HashMap::new();
    tiers.insert(
        SubscriptionTier::Free,
        HashMap::from([(MetricType::AiGenerations, 10), (MetricType::TrackUploads, 25)]),
    );
    tiers.insert(
        SubscriptionTier::Pro,
        HashMap::from([(MetricType::AiGenerations, 100), (MetricType::TrackUploads, 500)]),
    );
    // Creator and enterprise are unlimited: no entries
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_free_tier() {
        let config = QuotaConfig::default();
        assert_eq!(config.limit(SubscriptionTier::Free, MetricType::AiGenerations), 10);
        assert_eq!(config.limit(SubscriptionTier::Pro, MetricType::AiGenerations), 100);
    }

    #[test]
    fn absent_tier_is_unlimited_sentinel() {
        let config = QuotaConfig::default();
        assert_eq!(config.limit(SubscriptionTier::Creator, MetricType::AiGenerations), 0);
        assert_eq!(config.limit(SubscriptionTier::Enterprise, MetricType::TrackUploads), 0);
    }

    #[test]
    fn toml_tier_table_parses() {
        let config: QuotaConfig = toml::from_str(
            "[tiers.free]\nai_generations = 3\n\n[tiers.pro]\nai_generations = 50",
        )
        .unwrap();
        assert_eq!(config.limit(SubscriptionTier::Free, MetricType::AiGenerations), 3);
        // Metric not listed for the tier: unlimited
        assert_eq!(config.limit(SubscriptionTier::Free, MetricType::TrackUploads), 0);
    }
}
