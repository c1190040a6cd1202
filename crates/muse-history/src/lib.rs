#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Durable generation history
//!
//! One record per logical generation request, updated in place as the
//! attempt progresses. Status transitions are monotonic: terminal states
//! absorb, and the store rejects any transition that would move a record
//! out of `Completed` or `Failed`.

mod record;
mod store;

pub use record::{GenerationRecord, ProviderAttempt, RecordPatch, RecordStatus};
pub use store::{HistoryFilter, HistoryStore, MemoryHistoryStore, Pagination, PersistenceError};
