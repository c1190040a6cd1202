use std::{sync::Arc, time::Instant};

use dashmap::DashMap;
use jiff::Timestamp;
use muse_cache::{CacheStats, CachedArtifact, ResultCache, fingerprint};
use muse_config::Config;
use muse_core::{GenerationRequest, GenerationResult, Identity, MetricType};
use muse_history::{
    GenerationRecord, HistoryFilter, HistoryStore, Pagination, ProviderAttempt, RecordPatch, RecordStatus,
};
use muse_providers::{ProviderError, ProviderRegistry, ProviderRequest, template};
use muse_quota::{MemoryUsageStore, QuotaLedger, UsageCheck};
use muse_ratelimit::OperationLimiter;
use strum::IntoEnumIterator;
use tokio::sync::OnceCell;

use crate::{
    admin::{OperationAvailability, ServiceAvailability},
    error::GenerateError,
    validate,
};

/// The generation orchestrator
///
/// Owns the decision sequence; the cache, limiter, ledger, and history
/// store are each owned by their component and reached only through
/// their interfaces.
pub struct Orchestrator {
    config: Arc<Config>,
    registry: ProviderRegistry,
    cache: ResultCache,
    limiter: OperationLimiter,
    quota: QuotaLedger,
    history: Arc<dyn HistoryStore>,
    /// At most one in-flight generation per fingerprint; late arrivals
    /// await the leader's cell instead of invoking a provider themselves
    inflight: DashMap<String, Arc<OnceCell<GenerationResult>>>,
}

impl Orchestrator {
    /// Assemble from pre-built components
    pub fn new(
        config: Arc<Config>,
        registry: ProviderRegistry,
        cache: ResultCache,
        limiter: OperationLimiter,
        quota: QuotaLedger,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            config,
            registry,
            cache,
            limiter,
            quota,
            history,
            inflight: DashMap::new(),
        }
    }

    /// Build everything from configuration with in-memory usage counters
    ///
    /// Production deployments that need shared counters construct the
    /// components themselves and use [`Orchestrator::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if a provider or rate-limit section is invalid
    pub fn from_config(config: Arc<Config>, history: Arc<dyn HistoryStore>) -> anyhow::Result<Self> {
        let registry = ProviderRegistry::from_config(&config)
            .map_err(|e| anyhow::anyhow!("failed to initialize provider registry: {e}"))?;
        let cache = ResultCache::new(&config.cache);
        let limiter = muse_ratelimit::create_limiter(&config.rate_limit)
            .map_err(|e| anyhow::anyhow!("failed to initialize rate limiter: {e}"))?;
        let quota = QuotaLedger::new(Arc::new(config.quota.clone()), Arc::new(MemoryUsageStore::new()));

        Ok(Self::new(config, registry, cache, limiter, quota, history))
    }

    /// Run one generation request through the full decision sequence
    ///
    /// Cache hits are free: no rate-limit, quota, or history side effects.
    /// Real attempts consume quota whether or not a provider succeeded:
    /// the degraded fallback still occupies a generation slot, and nothing
    /// refunds it afterwards.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, GenerateError> {
        validate::validate(&request)?;

        let routing = self.config.routing_for(request.operation);
        let fp = fingerprint(&request, routing.user_scoped);

        if let Some(hit) = self.cache.get(&fp) {
            return Ok(GenerationResult {
                output: hit.value,
                provider: hit.provider,
                from_cache: true,
                degraded: false,
                record_id: None,
            });
        }

        // Clone the cell out of the entry guard before awaiting anything
        let cell = self
            .inflight
            .entry(fp.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_try_init(|| self.generate_uncoalesced(&request, &routing, &fp))
            .await
            .cloned();

        self.inflight.remove(&fp);
        result
    }

    /// The post-cache, post-coalescing path: gates, provider loop,
    /// persistence, cache/quota updates
    async fn generate_uncoalesced(
        &self,
        request: &GenerationRequest,
        routing: &muse_config::OperationRouting,
        fp: &str,
    ) -> Result<GenerationResult, GenerateError> {
        let user_id = &request.user.user_id;
        let metric = request.operation.metric_type();

        self.limiter.check(user_id, request.operation.operation_class()).await?;

        let snapshot = serde_json::json!({
            "payload": request.payload,
            "options": request.options,
            "preferred_providers": request.preferred_providers,
        });
        let record = GenerationRecord::pending(user_id.clone(), request.operation, snapshot);
        let record_id = record.id;

        // Admission and billing are one atomic compare-and-increment,
        // keyed by the record id: concurrent requests cannot overfill the
        // limit, and a retry of this attempt cannot double-count. The
        // slot is never refunded, whatever happens below.
        self.quota.reserve(&request.user, metric, &record_id.to_string()).await?;

        let started = Instant::now();

        // Failing to open the record is surfaced: with no record there is
        // no audit trail for the attempt
        self.history.save(record).await?;
        self.history
            .update(record_id, RecordPatch {
                status: Some(RecordStatus::Processing),
                ..RecordPatch::default()
            })
            .await?;

        let provider_request = ProviderRequest {
            operation: request.operation,
            payload: &request.payload,
            options: &request.options,
        };
        let timeout = routing.timeout(request.operation);

        let mut attempts: Vec<ProviderAttempt> = Vec::new();
        let mut outcome = None;

        for provider in self
            .registry
            .candidates(request.operation, &request.preferred_providers, &routing.providers)
        {
            match tokio::time::timeout(timeout, provider.invoke(provider_request)).await {
                Ok(Ok(output)) => {
                    outcome = Some((output, provider.name().to_owned()));
                    break;
                }
                Ok(Err(error)) => {
                    tracing::warn!(
                        provider = provider.name(),
                        operation = %request.operation,
                        error = %error,
                        "provider attempt failed, trying next candidate"
                    );
                    attempts.push(ProviderAttempt {
                        provider: provider.name().to_owned(),
                        error: error.to_string(),
                    });
                }
                Err(_elapsed) => {
                    tracing::warn!(
                        provider = provider.name(),
                        operation = %request.operation,
                        timeout_secs = timeout.as_secs(),
                        "provider attempt timed out, trying next candidate"
                    );
                    attempts.push(ProviderAttempt {
                        provider: provider.name().to_owned(),
                        error: ProviderError::Timeout.to_string(),
                    });
                }
            }
        }

        let (output, provider_name, degraded) = match outcome {
            Some((output, name)) => (output, name, false),
            None => {
                tracing::warn!(
                    operation = %request.operation,
                    attempted = attempts.len(),
                    "all providers failed, synthesizing local fallback"
                );
                let output = template::synthesize(request.operation, &request.payload, &request.options);
                (output, template::PROVIDER_NAME.to_owned(), true)
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let patch = RecordPatch {
            status: Some(RecordStatus::Completed),
            refined_output: Some(output.clone()),
            provider_used: Some(provider_name.clone()),
            attempts: Some(attempts),
            degraded: Some(degraded),
            error_message: None,
            processing_time_ms: Some(elapsed_ms),
            completed_at: Some(Timestamp::now()),
        };

        // The artifact exists at this point; a failed history write is
        // logged, not returned
        if let Err(error) = self.history.update(record_id, patch).await {
            tracing::error!(
                user_id = %user_id,
                record_id = %record_id,
                error = %error,
                "generation succeeded but history update failed"
            );
        }

        // Template filler must never be served as if a provider made it
        if !degraded {
            self.cache.put(
                fp,
                CachedArtifact {
                    value: output.clone(),
                    provider: provider_name.clone(),
                },
                routing.cache_ttl(),
            );
        }

        Ok(GenerationResult {
            output,
            provider: provider_name,
            from_cache: false,
            degraded,
            record_id: Some(record_id),
        })
    }

    /// A user's generation history, newest first
    pub async fn history(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
        page: Pagination,
    ) -> Result<Vec<GenerationRecord>, GenerateError> {
        Ok(self.history.list(user_id, filter, page).await?)
    }

    /// Result cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached artifact
    pub fn clear_caches(&self) {
        self.cache.invalidate_all();
    }

    /// Per-metric usage standing for a user
    pub async fn service_quotas(&self, user: &Identity) -> Result<Vec<(MetricType, UsageCheck)>, GenerateError> {
        let mut quotas = Vec::new();
        for metric in MetricType::iter() {
            quotas.push((metric, self.quota.check(user, metric).await?));
        }
        Ok(quotas)
    }

    /// Which operations currently have provider coverage
    ///
    /// Inspects the registry and routing tables only; no provider is
    /// called.
    pub fn check_availability(&self) -> ServiceAvailability {
        let operations = muse_core::Operation::iter()
            .map(|operation| {
                let routing = self.config.routing_for(operation);
                let providers: Vec<String> = self
                    .registry
                    .candidates(operation, &[], &routing.providers)
                    .iter()
                    .map(|provider| provider.name().to_owned())
                    .collect();
                (operation, OperationAvailability {
                    available: !providers.is_empty(),
                    providers,
                })
            })
            .collect();

        ServiceAvailability { operations }
    }
}
