use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::{GenerationSettings, Provider};

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed, or if the
/// selected provider is missing its credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub aws_region: String,
    pub anthropic_api_key: Option<String>,
    pub generation: GenerationSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider: Provider = parse_env("LLM_PROVIDER", Provider::Bedrock)?;

        let anthropic_api_key = non_blank_env("ANTHROPIC_API_KEY");
        if provider == Provider::Anthropic && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY must be set when LLM_PROVIDER=anthropic");
        }

        let generation = GenerationSettings {
            model_id: std::env::var("MODEL_ID")
                .unwrap_or_else(|_| provider.default_model().to_string()),
            max_tokens: parse_env("MAX_TOKENS", GenerationSettings::DEFAULT_MAX_TOKENS)?,
            temperature: parse_env("TEMPERATURE", GenerationSettings::DEFAULT_TEMPERATURE)?,
            top_p: parse_env("TOP_P", GenerationSettings::DEFAULT_TOP_P)?,
        };

        Ok(Config {
            provider,
            aws_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            anthropic_api_key,
            generation,
            port: parse_env("PORT", 5001u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads `key`, treating an empty or whitespace-only value as unset.
fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads `key` and parses it, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
