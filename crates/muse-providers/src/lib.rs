#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn
)]

//! Generation provider adapters
//!
//! Every external service sits behind the [`GenerationProvider`] trait and
//! maps its failures into the small [`ProviderError`] taxonomy, so the
//! orchestrator never branches on which provider it is talking to. The
//! registry resolves configured adapters at startup; unknown names fail
//! the build, not the request.

mod error;
mod prompts;
mod provider;
mod registry;
pub mod template;

pub use error::ProviderError;
pub use provider::{GenerationProvider, ProviderRequest};
pub use registry::ProviderRegistry;
