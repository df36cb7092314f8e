//! The remote decision provider.
//!
//! `submit` renders the prompt, then hands the HTTP call to a spawned Tokio
//! task; the task's reply travels back over an unbounded channel and
//! surfaces on the next `drain`. A failed call (timeout, transport error,
//! unusable body) is answered by the rule ladder instead, so every
//! submitted request produces a usable reply and the engine never sees an
//! error from this boundary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use vivarium_ai::{DecisionProvider, rules};
use vivarium_types::{Decision, DecisionReply, DecisionRequest};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::llm::{LlmBackend, create_backend};
use crate::parse::parse_decision;
use crate::prompt::{PromptEngine, RenderedPrompt};

/// Decision provider backed by a remote LLM endpoint.
///
/// Requests run concurrently as spawned tasks; replies are collected in
/// submission-completion order, not submission order. The engine's serial
/// check makes that safe.
pub struct RemoteProvider {
    backend: Arc<LlmBackend>,
    prompts: PromptEngine,
    timeout: Duration,
    runtime: tokio::runtime::Handle,
    tx: mpsc::UnboundedSender<DecisionReply>,
    rx: mpsc::UnboundedReceiver<DecisionReply>,
}

impl RemoteProvider {
    /// Build a provider from configuration, loading prompt templates from
    /// `templates_dir`.
    ///
    /// Must be called from within a Tokio runtime; submitted requests are
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the config fails validation, the
    /// endpoint cannot be resolved, the templates do not load, or there is
    /// no ambient runtime.
    pub fn new(config: &ProviderConfig, templates_dir: &str) -> Result<Self, ProviderError> {
        config.validate()?;
        let backend = Arc::new(create_backend(config)?);
        let prompts = PromptEngine::new(templates_dir)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ProviderError::Config(format!("remote provider needs a Tokio runtime: {e}"))
        })?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            backend,
            prompts,
            timeout: Duration::from_millis(config.timeout_ms),
            runtime,
            tx,
            rx,
        })
    }
}

impl DecisionProvider for RemoteProvider {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    fn submit(&mut self, request: DecisionRequest) {
        let view = serde_json::json!({
            "snapshot": &request.snapshot,
            "context": &request.context,
        });
        let prompt = match self.prompts.render(&view) {
            Ok(prompt) => prompt,
            Err(error) => {
                warn!(
                    entity = %request.entity,
                    error = %error,
                    "prompt render failed, answering from the rule ladder"
                );
                self.tx.send(fallback_reply(&request)).ok();
                return;
            }
        };

        let backend = Arc::clone(&self.backend);
        let deadline = self.timeout;
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let reply = match remote_decision(&backend, &prompt, deadline).await {
                Ok(decision) => {
                    debug!(
                        entity = %request.entity,
                        action = %decision.action,
                        confidence = decision.confidence,
                        "remote decision received"
                    );
                    DecisionReply {
                        entity: request.entity,
                        serial: request.serial,
                        decision: Some(decision),
                    }
                }
                Err(error) => {
                    warn!(
                        entity = %request.entity,
                        backend = backend.name(),
                        error = %error,
                        "remote call failed, answering from the rule ladder"
                    );
                    fallback_reply(&request)
                }
            };
            // A closed channel means the provider was dropped mid-flight.
            tx.send(reply).ok();
        });
    }

    fn drain(&mut self) -> Vec<DecisionReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        replies
    }
}

/// Call the backend under the configured deadline and parse the body.
async fn remote_decision(
    backend: &LlmBackend,
    prompt: &RenderedPrompt,
    deadline: Duration,
) -> Result<Decision, ProviderError> {
    let raw = tokio::time::timeout(deadline, backend.complete(prompt))
        .await
        .map_err(|_| {
            ProviderError::Backend(format!("no response within {}ms", deadline.as_millis()))
        })??;
    parse_decision(&raw)
}

/// Rule-ladder reply for a request the remote path could not serve.
fn fallback_reply(request: &DecisionRequest) -> DecisionReply {
    DecisionReply {
        entity: request.entity,
        serial: request.serial,
        decision: Some(rules::decide(&request.snapshot, &request.context)),
    }
}
