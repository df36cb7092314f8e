//! The decision provider seam.
//!
//! Providers answer [`DecisionRequest`]s fire-and-forget: `submit` queues
//! work and returns immediately, replies surface through a later `drain`.
//! The engine never learns which provider answered beyond its name, so a
//! remote model and the local ladder are interchangeable at this boundary.

use vivarium_types::{DecisionReply, DecisionRequest};

use crate::rules;

/// A source of decisions for entities.
///
/// Implementations must never block in `submit` and must never panic or
/// surface errors through this boundary. A provider that cannot produce an
/// answer replies with `decision: None` (or falls back internally) so every
/// request is eventually accounted for.
pub trait DecisionProvider {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Queue a request. Must return without waiting on anything.
    fn submit(&mut self, request: DecisionRequest);

    /// Take every reply that has arrived since the last drain.
    fn drain(&mut self) -> Vec<DecisionReply>;
}

/// The always-available local provider.
///
/// Answers every request from the deterministic rule ladder, queueing the
/// reply for the next drain. Zero latency and zero dependencies, which makes
/// it the provider of choice for tests and reproducible runs.
#[derive(Debug, Default)]
pub struct RuleProvider {
    pending: Vec<DecisionReply>,
}

impl RuleProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecisionProvider for RuleProvider {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn submit(&mut self, request: DecisionRequest) {
        let decision = rules::decide(&request.snapshot, &request.context);
        self.pending.push(DecisionReply {
            entity: request.entity,
            serial: request.serial,
            decision: Some(decision),
        });
    }

    fn drain(&mut self) -> Vec<DecisionReply> {
        std::mem::take(&mut self.pending)
    }
}
