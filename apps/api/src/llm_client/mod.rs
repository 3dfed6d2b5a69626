/// LLM Client — the single point of entry for all model calls in the proxy.
///
/// No other module may call a generation API directly. Handlers only see the
/// `TextGenerator` trait, so the backend can be swapped (or mocked) freely.
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

pub mod anthropic;
pub mod bedrock;

pub use anthropic::AnthropicClient;
pub use bedrock::BedrockClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Throttled by provider: {0}")]
    Throttled(String),

    #[error("Bedrock error: {0}")]
    Bedrock(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Inference parameters shared by every backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationSettings {
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_TOP_P: f32 = 0.9;
}

/// Which hosted API serves generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Bedrock,
    Anthropic,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Bedrock => bedrock::DEFAULT_MODEL,
            Provider::Anthropic => anthropic::DEFAULT_MODEL,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown LLM provider '{0}' (expected 'bedrock' or 'anthropic')")]
pub struct ParseProviderError(String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bedrock" => Ok(Provider::Bedrock),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(ParseProviderError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Bedrock => f.write_str("bedrock"),
            Provider::Anthropic => f.write_str("anthropic"),
        }
    }
}

/// A single-turn text generator: one prompt in, one completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` to the model and returns the generated text.
    /// Implementations must return `LlmError::EmptyContent` rather than `Ok("")`.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging and the health endpoint.
    fn model(&self) -> &str;
}

/// Rejects blank completions so callers never relay an empty result.
pub(crate) fn non_empty(text: Option<String>) -> Result<String, LlmError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(LlmError::EmptyContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parses_case_insensitively() {
        assert_eq!("Bedrock".parse::<Provider>().unwrap(), Provider::Bedrock);
        assert_eq!("ANTHROPIC".parse::<Provider>().unwrap(), Provider::Anthropic);
    }

    #[test]
    fn test_provider_rejects_unknown_name() {
        let err = "openai".parse::<Provider>().unwrap_err();
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn test_provider_default_models() {
        assert_eq!(Provider::Bedrock.default_model(), "anthropic.claude-v2");
        assert_eq!(Provider::Anthropic.default_model(), "claude-sonnet-4-5");
    }

    #[test]
    fn test_non_empty_rejects_blank_completion() {
        assert!(matches!(non_empty(None), Err(LlmError::EmptyContent)));
        assert!(matches!(
            non_empty(Some("  \n".to_string())),
            Err(LlmError::EmptyContent)
        ));
        assert_eq!(non_empty(Some(" Point 1".to_string())).unwrap(), " Point 1");
    }
}
