//! LLM backend abstraction and implementations.
//!
//! Enum-based dispatch over the two wire formats in the wild: OpenAI-style
//! chat completions and the Anthropic Messages API. Enum dispatch instead
//! of trait objects because async methods are not dyn-compatible. Every
//! OpenAI-compatible kind (`openai`, `azure`, `ollama`, `custom`) shares
//! one backend; only Anthropic differs.
//!
//! The provider does not care which model is behind the endpoint -- it
//! sends a prompt and expects a text response containing JSON.

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::prompt::RenderedPrompt;

// ---------------------------------------------------------------------------
// Unified backend enum
// ---------------------------------------------------------------------------

/// An LLM backend that turns a rendered prompt into a text response.
pub enum LlmBackend {
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Backend`] if the HTTP call fails, the
    /// endpoint answers non-2xx, or the content cannot be extracted.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, ProviderError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Short stable name, used in logs and as the provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for OpenAI-compatible chat completions endpoints.
///
/// Sends requests to `{base_url}/chat/completions`. The API key is
/// optional because local Ollama servers accept unauthenticated calls.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiBackend {
    /// Create a backend from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] when no endpoint can be resolved.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.effective_base_url()?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the chat completions request body.
    ///
    /// `response_format` pins the answer to a JSON object on endpoints that
    /// honor it; the parser copes on those that do not.
    fn request_body(&self, prompt: &RenderedPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": {"type": "json_object"}
        })
    }

    /// Send a prompt and return the response text.
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Backend(format!("chat completions request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ProviderError::Backend(format!(
                "chat completions endpoint returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            ProviderError::Backend(format!("chat completions response was not JSON: {e}"))
        })?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from a chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, ProviderError> {
    json.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ProviderError::Backend(
                "chat completions response missing choices[0].message.content".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// Differences from the chat completions shape:
/// - `x-api-key` header instead of `Authorization: Bearer`
/// - system prompt is a top-level field, not a message
/// - content comes back at `content[0].text`
pub struct AnthropicBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl AnthropicBackend {
    /// Create a backend from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] when the API key is absent.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ProviderError::Config("anthropic provider requires an API key".to_owned())
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.effective_base_url()?,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the Messages API request body.
    fn request_body(&self, prompt: &RenderedPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ],
            "temperature": self.temperature
        })
    }

    /// Send a prompt and return the response text.
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, ProviderError> {
        let url = format!("{}/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::Backend(format!("messages request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ProviderError::Backend(format!(
                "messages endpoint returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            ProviderError::Backend(format!("messages response was not JSON: {e}"))
        })?;

        extract_anthropic_content(&json)
    }
}

/// Extract the text content from a Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, ProviderError> {
    json.get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            ProviderError::Backend("messages response missing content[0].text".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create the backend matching the configured provider kind.
///
/// # Errors
///
/// Returns [`ProviderError::Config`] when the kind's endpoint or key
/// cannot be resolved from the config.
pub fn create_backend(config: &ProviderConfig) -> Result<LlmBackend, ProviderError> {
    match config.kind {
        ProviderKind::OpenAi | ProviderKind::Azure | ProviderKind::Ollama | ProviderKind::Custom => {
            Ok(LlmBackend::OpenAi(OpenAiBackend::new(config)?))
        }
        ProviderKind::Anthropic => Ok(LlmBackend::Anthropic(AnthropicBackend::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            kind,
            model: "test-model".to_owned(),
            api_key: Some("sk-test".to_owned()),
            base_url: None,
            temperature: 0.4,
            max_tokens: 256,
            timeout_ms: 7000,
            enabled: true,
        }
    }

    fn rendered() -> RenderedPrompt {
        RenderedPrompt {
            system: "You guide a creature.".to_owned(),
            user: "Health: 50".to_owned(),
        }
    }

    #[test]
    fn openai_body_shape() {
        let backend = match OpenAiBackend::new(&config_for(ProviderKind::OpenAi)) {
            Ok(backend) => backend,
            Err(_) => return,
        };
        let body = backend.request_body(&rendered());

        assert_eq!(body.get("model").and_then(serde_json::Value::as_str), Some("test-model"));
        assert_eq!(
            body.get("messages").and_then(serde_json::Value::as_array).map(Vec::len),
            Some(2)
        );
        assert_eq!(
            body.pointer("/messages/0/role").and_then(serde_json::Value::as_str),
            Some("system")
        );
        assert_eq!(
            body.pointer("/messages/1/content").and_then(serde_json::Value::as_str),
            Some("Health: 50")
        );
        assert_eq!(body.get("temperature").and_then(serde_json::Value::as_f64), Some(0.4));
        assert_eq!(body.get("max_tokens").and_then(serde_json::Value::as_u64), Some(256));
        assert_eq!(
            body.pointer("/response_format/type").and_then(serde_json::Value::as_str),
            Some("json_object")
        );
    }

    #[test]
    fn anthropic_body_shape() {
        let backend = match AnthropicBackend::new(&config_for(ProviderKind::Anthropic)) {
            Ok(backend) => backend,
            Err(_) => return,
        };
        let body = backend.request_body(&rendered());

        assert_eq!(
            body.get("system").and_then(serde_json::Value::as_str),
            Some("You guide a creature."),
            "system is a top-level field, not a message"
        );
        assert_eq!(
            body.get("messages").and_then(serde_json::Value::as_array).map(Vec::len),
            Some(1)
        );
        assert_eq!(
            body.pointer("/messages/0/role").and_then(serde_json::Value::as_str),
            Some("user")
        );
        assert_eq!(body.get("max_tokens").and_then(serde_json::Value::as_u64), Some(256));
    }

    #[test]
    fn extract_openai_content_valid() {
        let json = serde_json::json!({
            "choices": [{
                "message": {
                    "content": "{\"action\": \"gather\", \"confidence\": 0.8}"
                }
            }]
        });
        let result = extract_openai_content(&json);
        assert!(result.unwrap_or_default().contains("gather"));
    }

    #[test]
    fn extract_openai_content_missing_choices() {
        let json = serde_json::json!({"error": "rate_limit"});
        assert!(extract_openai_content(&json).is_err());
    }

    #[test]
    fn extract_anthropic_content_valid() {
        let json = serde_json::json!({
            "content": [{
                "type": "text",
                "text": "{\"action\": \"explore\"}"
            }]
        });
        let result = extract_anthropic_content(&json);
        assert!(result.unwrap_or_default().contains("explore"));
    }

    #[test]
    fn extract_anthropic_content_empty() {
        let json = serde_json::json!({"content": []});
        assert!(extract_anthropic_content(&json).is_err());
    }

    #[test]
    fn factory_dispatches_by_kind() {
        for kind in [ProviderKind::OpenAi, ProviderKind::Ollama] {
            let name = create_backend(&config_for(kind)).map(|b| b.name().to_owned());
            assert_eq!(name.ok().as_deref(), Some("openai-compatible"));
        }

        let name = create_backend(&config_for(ProviderKind::Anthropic)).map(|b| b.name().to_owned());
        assert_eq!(name.ok().as_deref(), Some("anthropic"));

        let mut custom = config_for(ProviderKind::Custom);
        custom.base_url = Some("http://proxy.internal/v1".to_owned());
        let name = create_backend(&custom).map(|b| b.name().to_owned());
        assert_eq!(name.ok().as_deref(), Some("openai-compatible"));
    }

    #[test]
    fn factory_refuses_unresolvable_endpoints() {
        // azure and custom have no default base URL.
        assert!(create_backend(&config_for(ProviderKind::Azure)).is_err());
        assert!(create_backend(&config_for(ProviderKind::Custom)).is_err());
    }

    #[test]
    fn ollama_needs_no_key() {
        let mut config = config_for(ProviderKind::Ollama);
        config.api_key = None;
        assert!(create_backend(&config).is_ok());
    }
}
