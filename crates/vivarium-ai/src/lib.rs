//! Decision making for Vivarium entities.
//!
//! This crate owns everything between "an entity has an empty task slot"
//! and "the entity is doing something": the provider seam with its local
//! rule ladder, the scored fallback picker, task translation and completion
//! effects, and the per-entity update cycle the simulation drives each tick.
//!
//! Decisions are fire-and-forget. The engine assigns a locally chosen task
//! immediately, submits a [`DecisionRequest`](vivarium_types::DecisionRequest)
//! to whichever [`DecisionProvider`] was injected, and applies the reply on
//! a later tick only if it still matches the entity's decision serial.
//!
//! # Modules
//!
//! - [`config`] -- Tuning knobs for decisions and metabolism
//! - [`context`] -- Snapshot and world context assembly
//! - [`engine`] -- The per-entity update cycle and reply application
//! - [`provider`] -- The provider trait and the local rule provider
//! - [`rules`] -- The deterministic priority ladder
//! - [`scoring`] -- Needs-based candidate scoring
//! - [`task`] -- Action-to-task translation and completion effects

pub mod config;
pub mod context;
pub mod engine;
pub mod provider;
pub mod rules;
pub mod scoring;
pub mod task;

pub use config::EngineConfig;
pub use engine::{EntityOutcome, ReplyOutcome, apply_replies, update_entity};
pub use provider::{DecisionProvider, RuleProvider};
pub use rules::decide;
