#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Generation orchestration
//!
//! The [`Orchestrator`] owns the decision sequence for every generation
//! request: validate, consult the result cache, coalesce identical
//! in-flight requests, enforce rate and quota limits, walk the provider
//! fallback chain, persist history, and update cache and usage state.
//! Route handlers call [`Orchestrator::generate`] and serialize whatever
//! comes back; nothing else reaches into the components directly.

mod admin;
mod error;
mod orchestrator;
mod validate;

pub use admin::{OperationAvailability, ServiceAvailability};
pub use error::GenerateError;
pub use orchestrator::Orchestrator;
