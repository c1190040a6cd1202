use async_trait::async_trait;
use dashmap::DashMap;
use http::StatusCode;
use muse_core::Operation;
use thiserror::Error;
use uuid::Uuid;

use crate::record::{GenerationRecord, RecordPatch, RecordStatus};

/// History persistence errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Backend write/read failure
    #[error("history backend: {0}")]
    Backend(String),

    /// No record with the given id
    #[error("generation record {0} not found")]
    NotFound(Uuid),

    /// Patch would violate status monotonicity
    #[error("invalid status transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// Status before the patch
        from: RecordStatus,
        /// Requested status
        to: RecordStatus,
    },
}

impl muse_core::HttpError for PersistenceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Backend(_) | Self::InvalidTransition { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Backend(_) | Self::InvalidTransition { .. } => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::NotFound(_) => self.to_string(),
            Self::Backend(_) | Self::InvalidTransition { .. } => "internal server error".to_owned(),
        }
    }
}

/// Filters for history listing
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Restrict to one operation
    pub operation: Option<Operation>,
    /// Restrict to one status
    pub status: Option<RecordStatus>,
}

/// Offset/limit pagination
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Records to skip
    pub offset: usize,
    /// Maximum records to return
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { offset: 0, limit: 50 }
    }
}

/// Persistence facade for generation records
///
/// The production backend lives with the rest of the platform's storage;
/// the core only needs these three calls.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a new record
    async fn save(&self, record: GenerationRecord) -> Result<(), PersistenceError>;

    /// Apply a partial update, enforcing monotonic status transitions
    async fn update(&self, id: Uuid, patch: RecordPatch) -> Result<(), PersistenceError>;

    /// A user's records, newest first
    async fn list(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
        page: Pagination,
    ) -> Result<Vec<GenerationRecord>, PersistenceError>;
}

/// In-memory history store for tests and single-instance deployments
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: DashMap<Uuid, GenerationRecord>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct record lookup, used by tests and the admin surface
    pub fn get(&self, id: Uuid) -> Option<GenerationRecord> {
        self.records.get(&id).map(|record| record.clone())
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save(&self, record: GenerationRecord) -> Result<(), PersistenceError> {
        self.records.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: RecordPatch) -> Result<(), PersistenceError> {
        let mut record = self.records.get_mut(&id).ok_or(PersistenceError::NotFound(id))?;

        if let Some(next) = patch.status {
            if !record.status.can_transition_to(next) {
                return Err(PersistenceError::InvalidTransition {
                    from: record.status,
                    to: next,
                });
            }
            record.status = next;
        }

        if let Some(output) = patch.refined_output {
            record.refined_output = Some(output);
        }
        if let Some(provider) = patch.provider_used {
            record.provider_used = Some(provider);
        }
        if let Some(attempts) = patch.attempts {
            record.attempts = attempts;
        }
        if let Some(degraded) = patch.degraded {
            record.degraded = degraded;
        }
        if let Some(message) = patch.error_message {
            record.error_message = Some(message);
        }
        if let Some(elapsed) = patch.processing_time_ms {
            record.processing_time_ms = elapsed;
        }
        if let Some(at) = patch.completed_at {
            record.completed_at = Some(at);
        }

        Ok(())
    }

    async fn list(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
        page: Pagination,
    ) -> Result<Vec<GenerationRecord>, PersistenceError> {
        let mut records: Vec<GenerationRecord> = self
            .records
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .filter(|entry| filter.operation.is_none_or(|op| entry.operation == op))
            .filter(|entry| filter.status.is_none_or(|status| entry.status == status))
            .map(|entry| entry.clone())
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records.into_iter().skip(page.offset).take(page.limit).collect())
    }
}
