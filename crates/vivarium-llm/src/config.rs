//! Provider configuration loaded from environment variables.
//!
//! Remote decisions are opt-in. With no `VIVARIUM_AI_PROVIDER` set the
//! config comes back disabled and the simulation stays on the local rule
//! ladder; setting a provider kind (and whatever that kind requires)
//! switches the remote path on.

use crate::error::ProviderError;

/// Env var naming the provider kind. Absent means remote decisions are off.
pub const ENV_PROVIDER: &str = "VIVARIUM_AI_PROVIDER";
/// Env var naming the model to request.
pub const ENV_MODEL: &str = "VIVARIUM_AI_MODEL";
/// Env var carrying the API key.
pub const ENV_API_KEY: &str = "VIVARIUM_AI_API_KEY";
/// Env var overriding the endpoint base URL.
pub const ENV_BASE_URL: &str = "VIVARIUM_AI_API_BASE_URL";
/// Env var overriding the sampling temperature.
pub const ENV_TEMPERATURE: &str = "VIVARIUM_AI_TEMPERATURE";
/// Env var overriding the response token cap.
pub const ENV_MAX_TOKENS: &str = "VIVARIUM_AI_MAX_TOKENS";
/// Env var overriding the per-request deadline in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "VIVARIUM_AI_TIMEOUT_MS";

/// Model requested when `VIVARIUM_AI_MODEL` is not set.
const DEFAULT_MODEL: &str = "gpt-4";

/// Supported remote provider kinds.
///
/// Every kind except [`Anthropic`](Self::Anthropic) speaks the
/// OpenAI-compatible chat completions wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// The OpenAI API.
    OpenAi,
    /// An Azure-hosted OpenAI deployment (same wire format, custom host).
    Azure,
    /// A local Ollama server. No API key needed.
    Ollama,
    /// Any other OpenAI-compatible endpoint.
    Custom,
    /// The Anthropic Messages API.
    Anthropic,
}

impl ProviderKind {
    /// Stable lowercase name, as accepted in `VIVARIUM_AI_PROVIDER`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Azure => "azure",
            Self::Ollama => "ollama",
            Self::Custom => "custom",
            Self::Anthropic => "anthropic",
        }
    }

    /// Parse a provider kind name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "azure" => Some(Self::Azure),
            "ollama" => Some(Self::Ollama),
            "custom" => Some(Self::Custom),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    /// Well-known endpoint for kinds that have one.
    ///
    /// `azure` and `custom` endpoints are deployment-specific and must be
    /// supplied through `VIVARIUM_AI_API_BASE_URL`.
    #[must_use]
    pub const fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("https://api.openai.com/v1"),
            Self::Ollama => Some("http://localhost:11434/v1"),
            Self::Anthropic => Some("https://api.anthropic.com/v1"),
            Self::Azure | Self::Custom => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which API shape to talk to.
    pub kind: ProviderKind,
    /// Model identifier passed through to the API.
    pub model: String,
    /// API key, where the kind requires one.
    pub api_key: Option<String>,
    /// Endpoint override. Kinds with a well-known endpoint default to it.
    pub base_url: Option<String>,
    /// Sampling temperature (default 0.7).
    pub temperature: f64,
    /// Response token cap (default 512).
    pub max_tokens: u32,
    /// Per-request deadline in milliseconds (default 7000).
    pub timeout_ms: u64,
    /// Whether remote decisions are switched on.
    pub enabled: bool,
}

impl ProviderConfig {
    /// Load provider settings from the `VIVARIUM_AI_*` environment variables.
    ///
    /// A missing `VIVARIUM_AI_PROVIDER` yields a disabled config rather than
    /// an error. `enabled` ends up true only when the named kind's
    /// requirements ([`validate`](Self::validate)) are met.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] for an unknown provider kind or an
    /// unparseable numeric override.
    pub fn from_env() -> Result<Self, ProviderError> {
        let Ok(raw_kind) = std::env::var(ENV_PROVIDER) else {
            return Ok(Self::disabled());
        };
        let kind = ProviderKind::parse(&raw_kind).ok_or_else(|| {
            ProviderError::Config(format!("unknown provider kind: {raw_kind}"))
        })?;

        let model = std::env::var(ENV_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let api_key = std::env::var(ENV_API_KEY).ok();
        let base_url = std::env::var(ENV_BASE_URL).ok();

        let temperature: f64 = std::env::var(ENV_TEMPERATURE)
            .unwrap_or_else(|_| "0.7".to_owned())
            .parse()
            .map_err(|e| ProviderError::Config(format!("invalid {ENV_TEMPERATURE}: {e}")))?;

        let max_tokens: u32 = std::env::var(ENV_MAX_TOKENS)
            .unwrap_or_else(|_| "512".to_owned())
            .parse()
            .map_err(|e| ProviderError::Config(format!("invalid {ENV_MAX_TOKENS}: {e}")))?;

        let timeout_ms: u64 = std::env::var(ENV_TIMEOUT_MS)
            .unwrap_or_else(|_| "7000".to_owned())
            .parse()
            .map_err(|e| ProviderError::Config(format!("invalid {ENV_TIMEOUT_MS}: {e}")))?;

        let mut config = Self {
            kind,
            model,
            api_key,
            base_url,
            temperature,
            max_tokens,
            timeout_ms,
            enabled: false,
        };
        config.enabled = config.validate().is_ok();
        Ok(config)
    }

    /// A config with remote decisions switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 512,
            timeout_ms: 7000,
            enabled: false,
        }
    }

    /// Check the kind's requirements.
    ///
    /// `openai`, `azure` and `anthropic` need an API key; `custom` needs a
    /// base URL; `ollama` needs nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] naming the missing requirement.
    pub fn validate(&self) -> Result<(), ProviderError> {
        match self.kind {
            ProviderKind::OpenAi | ProviderKind::Azure | ProviderKind::Anthropic => {
                if self.api_key.as_ref().is_some_and(|key| !key.is_empty()) {
                    Ok(())
                } else {
                    Err(ProviderError::Config(format!(
                        "provider {} requires {ENV_API_KEY}",
                        self.kind
                    )))
                }
            }
            ProviderKind::Ollama => Ok(()),
            ProviderKind::Custom => {
                if self.base_url.as_ref().is_some_and(|url| !url.is_empty()) {
                    Ok(())
                } else {
                    Err(ProviderError::Config(format!(
                        "provider custom requires {ENV_BASE_URL}"
                    )))
                }
            }
        }
    }

    /// The endpoint to call: the override if set, else the kind's default.
    ///
    /// A trailing slash is trimmed so path joins stay clean.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] for `azure`/`custom` kinds with no
    /// override, since those have no well-known endpoint.
    pub fn effective_base_url(&self) -> Result<String, ProviderError> {
        if let Some(url) = &self.base_url
            && !url.is_empty()
        {
            return Ok(url.trim_end_matches('/').to_owned());
        }
        self.kind.default_base_url().map(ToOwned::to_owned).ok_or_else(|| {
            ProviderError::Config(format!(
                "provider {} has no default endpoint, set {ENV_BASE_URL}",
                self.kind
            ))
        })
    }
}
