//! Amazon Bedrock backend (`InvokeModel` on Anthropic models).
//!
//! Bedrock hosts two generations of Anthropic models with different body
//! shapes: the legacy `Human:/Assistant:` text-completion format and the
//! Messages format. The format is picked from the model id.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::anthropic::LlmResponse;
use super::{non_empty, GenerationSettings, LlmError, TextGenerator};

pub const DEFAULT_MODEL: &str = "anthropic.claude-v2";
const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Request/response body layout accepted by a Bedrock model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `anthropic.claude-v2*` and `anthropic.claude-instant*`.
    TextCompletion,
    Messages,
}

impl BodyFormat {
    pub fn for_model(model_id: &str) -> Self {
        // Cross-region inference profiles prefix the id, e.g. "us.anthropic.claude-..."
        let base = model_id
            .find("anthropic.")
            .map(|idx| &model_id[idx..])
            .unwrap_or(model_id);

        if base.starts_with("anthropic.claude-v2") || base.starts_with("anthropic.claude-instant") {
            BodyFormat::TextCompletion
        } else {
            BodyFormat::Messages
        }
    }
}

#[derive(Debug, Serialize)]
struct TextCompletionRequest {
    prompt: String,
    max_tokens_to_sample: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct TextCompletionResponse {
    completion: Option<String>,
    stop_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<BedrockMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct BedrockMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Builds the JSON body for `InvokeModel`.
pub fn request_body(
    format: BodyFormat,
    settings: &GenerationSettings,
    prompt: &str,
) -> Result<Vec<u8>, LlmError> {
    let body = match format {
        BodyFormat::TextCompletion => serde_json::to_vec(&TextCompletionRequest {
            prompt: format!("\n\nHuman: {prompt}\n\nAssistant:"),
            max_tokens_to_sample: settings.max_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
        })?,
        BodyFormat::Messages => serde_json::to_vec(&MessagesRequest {
            anthropic_version: BEDROCK_ANTHROPIC_VERSION,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            messages: vec![BedrockMessage {
                role: "user",
                content: prompt,
            }],
        })?,
    };
    Ok(body)
}

/// Extracts the generated text from an `InvokeModel` response body.
pub fn extract_text(format: BodyFormat, body: &[u8]) -> Result<String, LlmError> {
    match format {
        BodyFormat::TextCompletion => {
            let response: TextCompletionResponse = serde_json::from_slice(body)?;
            debug!("Bedrock completion stop_reason={:?}", response.stop_reason);
            non_empty(response.completion)
        }
        BodyFormat::Messages => {
            let response: LlmResponse = serde_json::from_slice(body)?;
            if let Some(usage) = &response.usage {
                debug!(
                    "Bedrock call succeeded: input_tokens={}, output_tokens={}",
                    usage.input_tokens, usage.output_tokens
                );
            }
            non_empty(response.text().map(str::to_owned))
        }
    }
}

/// Calls Anthropic models hosted on Amazon Bedrock.
#[derive(Clone)]
pub struct BedrockClient {
    client: Client,
    settings: GenerationSettings,
    format: BodyFormat,
}

impl BedrockClient {
    /// Builds a client from the standard AWS credential chain for `region`.
    pub async fn from_env(region: &str, settings: GenerationSettings) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            format: BodyFormat::for_model(&settings.model_id),
            settings,
        }
    }
}

#[async_trait]
impl TextGenerator for BedrockClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = request_body(self.format, &self.settings, prompt)?;

        let output = self
            .client
            .invoke_model()
            .model_id(&self.settings.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(map_sdk_error)?;

        extract_text(self.format, output.body().as_ref())
    }

    fn model(&self) -> &str {
        &self.settings.model_id
    }
}

fn map_sdk_error(err: SdkError<InvokeModelError>) -> LlmError {
    let message = DisplayErrorContext(&err).to_string();
    classify_error(err.as_service_error(), message)
}

/// Throttling gets its own variant; every other SDK failure is `Bedrock`.
fn classify_error(service: Option<&InvokeModelError>, message: String) -> LlmError {
    match service {
        Some(service) if service.is_throttling_exception() => LlmError::Throttled(message),
        _ => LlmError::Bedrock(message),
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_bedrockruntime::types::error::{ThrottlingException, ValidationException};

    use super::*;

    fn settings(model_id: &str) -> GenerationSettings {
        GenerationSettings {
            model_id: model_id.to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            top_p: 0.9,
        }
    }

    #[test]
    fn test_body_format_for_legacy_models() {
        assert_eq!(
            BodyFormat::for_model("anthropic.claude-v2"),
            BodyFormat::TextCompletion
        );
        assert_eq!(
            BodyFormat::for_model("anthropic.claude-v2:1"),
            BodyFormat::TextCompletion
        );
        assert_eq!(
            BodyFormat::for_model("anthropic.claude-instant-v1"),
            BodyFormat::TextCompletion
        );
    }

    #[test]
    fn test_body_format_for_messages_models() {
        assert_eq!(
            BodyFormat::for_model("anthropic.claude-3-haiku-20240307-v1:0"),
            BodyFormat::Messages
        );
        assert_eq!(
            BodyFormat::for_model("us.anthropic.claude-3-5-sonnet-20241022-v2:0"),
            BodyFormat::Messages
        );
    }

    #[test]
    fn test_text_completion_body_wraps_prompt_in_human_turn() {
        let body = request_body(
            BodyFormat::TextCompletion,
            &settings(DEFAULT_MODEL),
            "Audience Profile: CFOs",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            json["prompt"],
            "\n\nHuman: Audience Profile: CFOs\n\nAssistant:"
        );
        assert_eq!(json["max_tokens_to_sample"], 2000);
        assert!(json.get("messages").is_none());
    }

    #[test]
    fn test_messages_body_uses_bedrock_version() {
        let body = request_body(
            BodyFormat::Messages,
            &settings("anthropic.claude-3-haiku-20240307-v1:0"),
            "hello",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!(json.get("temperature").is_some());
        assert!(json.get("top_p").is_none());
    }

    #[test]
    fn test_text_completion_body_keeps_top_p() {
        let body =
            request_body(BodyFormat::TextCompletion, &settings(DEFAULT_MODEL), "hello").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert!((json["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_throttling_exception_maps_to_throttled() {
        let service = InvokeModelError::ThrottlingException(
            ThrottlingException::builder()
                .message("Too many requests")
                .build(),
        );
        let err = classify_error(Some(&service), "ThrottlingException".to_string());
        assert!(matches!(err, LlmError::Throttled(msg) if msg == "ThrottlingException"));
    }

    #[test]
    fn test_other_service_errors_map_to_bedrock() {
        let service = InvokeModelError::ValidationException(
            ValidationException::builder()
                .message("Malformed input request")
                .build(),
        );
        assert!(matches!(
            classify_error(Some(&service), "ValidationException".to_string()),
            LlmError::Bedrock(_)
        ));
        assert!(matches!(
            classify_error(None, "dispatch failure".to_string()),
            LlmError::Bedrock(_)
        ));
    }

    #[test]
    fn test_extract_text_from_completion_envelope() {
        let body = br#"{"completion": " Point 1\nPoint 2", "stop_reason": "stop_sequence"}"#;
        let text = extract_text(BodyFormat::TextCompletion, body).unwrap();
        assert_eq!(text, " Point 1\nPoint 2");
    }

    #[test]
    fn test_extract_text_from_messages_envelope() {
        let body = br#"{
            "id": "msg_1",
            "content": [{"type": "text", "text": "Point 1"}],
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;
        assert_eq!(extract_text(BodyFormat::Messages, body).unwrap(), "Point 1");
    }

    #[test]
    fn test_extract_text_rejects_missing_completion() {
        let result = extract_text(BodyFormat::TextCompletion, br#"{"stop_reason": null}"#);
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_extract_text_rejects_malformed_body() {
        let result = extract_text(BodyFormat::Messages, b"<html>oops</html>");
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
