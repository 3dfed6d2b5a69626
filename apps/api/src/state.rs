use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no mutable data; requests never observe each other.
#[derive(Clone)]
pub struct AppState {
    /// Backend that turns a prompt into text. Bedrock or Anthropic in production,
    /// a mock in tests.
    pub generator: Arc<dyn TextGenerator>,
}
