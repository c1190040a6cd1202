use jiff::Timestamp;
use muse_core::Operation;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Lifecycle of a generation record
///
/// `Pending -> Processing -> {Completed | Failed}`; terminal states
/// absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Accepted, not yet dispatched to a provider
    Pending,
    /// A provider attempt is in flight
    Processing,
    /// Finished with an artifact (possibly degraded)
    Completed,
    /// No artifact could be produced
    ///
    /// The in-process flow always closes a record as `Completed`, since
    /// the template fallback cannot fail; this state is reserved for
    /// flows without that fallback, such as external worker backends.
    Failed,
}

impl RecordStatus {
    /// Whether this status accepts no further transitions
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether moving to `next` preserves monotonicity
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing) | (Self::Processing, Self::Completed | Self::Failed)
        )
    }
}

/// One provider attempt and why it failed
#[derive(Debug, Clone, Serialize)]
pub struct ProviderAttempt {
    /// Provider name
    pub provider: String,
    /// Failure reason from the adapter
    pub error: String,
}

/// Persisted record of a generation attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// Record identifier, also the quota idempotency key
    pub id: Uuid,
    /// Requesting user
    pub user_id: String,
    /// Artist the artifact belongs to, when the payload names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    /// Requested operation
    pub operation: Operation,
    /// Request payload + options as submitted
    pub input_snapshot: Value,
    /// Final artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refined_output: Option<Value>,
    /// Provider that produced the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_used: Option<String>,
    /// Lifecycle status
    pub status: RecordStatus,
    /// Failed provider attempts, in the order they were tried
    pub attempts: Vec<ProviderAttempt>,
    /// Whether the output came from the local template fallback
    pub degraded: bool,
    /// Terminal error, when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Wall time spent on the attempt
    pub processing_time_ms: u64,
    /// When the request was accepted
    pub created_at: Timestamp,
    /// When the record reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl GenerationRecord {
    /// New pending record for an accepted request
    pub fn pending(user_id: impl Into<String>, operation: Operation, input_snapshot: Value) -> Self {
        let artist_id = input_snapshot
            .get("payload")
            .and_then(|payload| payload.get("artist_id"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            artist_id,
            operation,
            input_snapshot,
            refined_output: None,
            provider_used: None,
            status: RecordStatus::Pending,
            attempts: Vec::new(),
            degraded: false,
            error_message: None,
            processing_time_ms: 0,
            created_at: Timestamp::now(),
            completed_at: None,
        }
    }
}

/// Partial update applied to a record
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    /// New status; validated against the current one
    pub status: Option<RecordStatus>,
    /// Final artifact
    pub refined_output: Option<Value>,
    /// Provider that produced the output
    pub provider_used: Option<String>,
    /// Failed attempts accumulated so far
    pub attempts: Option<Vec<ProviderAttempt>>,
    /// Degraded-fallback flag
    pub degraded: Option<bool>,
    /// Terminal error message
    pub error_message: Option<String>,
    /// Wall time spent
    pub processing_time_ms: Option<u64>,
    /// Terminal timestamp
    pub completed_at: Option<Timestamp>,
}
