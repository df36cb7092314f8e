//! Error types for the remote decision provider.
//!
//! Uses `thiserror` for typed errors covering the remote pipeline:
//! configuration, prompt rendering, the HTTP call, and response parsing.
//! None of these ever cross the [`DecisionProvider`] boundary -- the
//! provider converts every failure into a rule-ladder reply.
//!
//! [`DecisionProvider`]: vivarium_ai::DecisionProvider

/// Errors that can occur while configuring or running the remote provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Provider configuration is invalid or incomplete.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// The LLM endpoint returned an error or was unreachable.
    #[error("backend error: {0}")]
    Backend(String),

    /// The response body could not be parsed into a decision.
    #[error("response parse error: {0}")]
    Parse(String),
}
