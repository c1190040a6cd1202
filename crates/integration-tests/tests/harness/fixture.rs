//! Orchestrator assembly for tests

use std::sync::Arc;

use muse_cache::ResultCache;
use muse_config::{ClassRateLimit, Config, OperationRouting};
use muse_core::{MetricType, Operation, SubscriptionTier};
use muse_history::MemoryHistoryStore;
use muse_orchestrator::Orchestrator;
use muse_providers::{GenerationProvider, ProviderRegistry};
use muse_quota::{MemoryUsageStore, QuotaLedger};
use muse_ratelimit::OperationLimiter;

use super::providers::MockProvider;

/// Builds an orchestrator over in-memory components and scripted adapters
pub struct Fixture {
    config: Config,
    adapters: Vec<Arc<dyn GenerationProvider>>,
}

/// The assembled stack, with the history store kept reachable for
/// assertions
pub struct TestStack {
    pub orchestrator: Orchestrator,
    pub history: Arc<MemoryHistoryStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            adapters: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: &Arc<MockProvider>) -> Self {
        self.adapters.push(provider.clone());
        self
    }

    /// Route an operation through the named providers with a 5s timeout
    pub fn route(self, operation: Operation, providers: &[&str]) -> Self {
        self.route_with_timeout(operation, providers, 5)
    }

    pub fn route_with_timeout(mut self, operation: Operation, providers: &[&str], timeout_secs: u64) -> Self {
        self.config.operations.insert(operation, OperationRouting {
            providers: providers.iter().map(|&name| name.to_owned()).collect(),
            timeout_secs: Some(timeout_secs),
            cache_ttl_secs: Some(3600),
            user_scoped: false,
        });
        self
    }

    pub fn user_scoped(mut self, operation: Operation) -> Self {
        if let Some(routing) = self.config.operations.get_mut(&operation) {
            routing.user_scoped = true;
        }
        self
    }

    pub fn tier_limit(mut self, tier: SubscriptionTier, metric: MetricType, limit: i64) -> Self {
        self.config.quota.tiers.entry(tier).or_default().insert(metric, limit);
        self
    }

    pub fn class_limit(mut self, class: &str, requests: u32, window: &str) -> Self {
        self.config.rate_limit.classes.insert(class.to_owned(), ClassRateLimit {
            requests,
            window: window.to_owned(),
        });
        self
    }

    pub fn cache_disabled(mut self) -> Self {
        self.config.cache.enabled = false;
        self
    }

    pub fn build(self) -> TestStack {
        let config = Arc::new(self.config);
        let history = Arc::new(MemoryHistoryStore::new());
        let limiter = OperationLimiter::new(&config.rate_limit).unwrap();
        let quota = QuotaLedger::new(Arc::new(config.quota.clone()), Arc::new(MemoryUsageStore::new()));

        let orchestrator = Orchestrator::new(
            config.clone(),
            ProviderRegistry::from_adapters(self.adapters),
            ResultCache::new(&config.cache),
            limiter,
            quota,
            history.clone(),
        );

        TestStack { orchestrator, history }
    }
}
