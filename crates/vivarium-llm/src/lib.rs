//! Remote LLM decisions for Vivarium entities.
//!
//! This crate plugs a hosted language model into the decision seam: a
//! [`RemoteProvider`] renders each request into a prompt, calls the
//! configured endpoint from a spawned Tokio task, parses the JSON answer,
//! and queues the reply for the engine's next drain. Remote decisions are
//! opt-in via `VIVARIUM_AI_*` environment variables, and every failure
//! path degrades to the local rule ladder, so the simulation never stalls
//! or misbehaves because of the network.
//!
//! # Modules
//!
//! - [`config`] -- Provider settings from environment variables
//! - [`error`] -- Typed errors for the remote pipeline
//! - [`llm`] -- HTTP backends for the two supported wire formats
//! - [`parse`] -- Response text to typed decision, with recovery
//! - [`prompt`] -- Template loading and prompt rendering
//! - [`provider`] -- The [`DecisionProvider`] implementation
//!
//! [`DecisionProvider`]: vivarium_ai::DecisionProvider

pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod provider;

pub use config::{ProviderConfig, ProviderKind};
pub use error::ProviderError;
pub use llm::{LlmBackend, create_backend};
pub use parse::parse_decision;
pub use prompt::{PromptEngine, RenderedPrompt};
pub use provider::RemoteProvider;
