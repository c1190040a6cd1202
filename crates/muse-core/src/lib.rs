#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Shared domain types for the muse generation core
//!
//! Feature crates (cache, quota, providers, orchestrator) depend on this
//! crate for the operation taxonomy, request/result value types, and the
//! `HttpError` seam that keeps domain errors decoupled from whatever web
//! framework the route layer uses.

mod error;
mod identity;
mod operation;
mod request;

pub use error::HttpError;
pub use identity::{Identity, SubscriptionTier};
pub use operation::{MetricType, Operation, OperationClass};
pub use request::{GenerationOptions, GenerationRequest, GenerationResult};
