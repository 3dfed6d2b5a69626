//! Axum route handler for the talking-points API.

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::state::AppState;
use crate::talking_points::profile::{AudienceProfile, PROFILE_REQUIRED_MESSAGE};
use crate::talking_points::prompts::build_prompt;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub audience_profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub talking_points: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate
///
/// Form field `audience_profile` → `{"talking_points": "..."}`.
/// Blank input is rejected with 400 before the model is called.
pub async fn handle_generate(
    State(state): State<AppState>,
    form: Result<Form<GenerateForm>, FormRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Form(form) = form.map_err(|rejection| {
        debug!("Rejected generate form: {rejection}");
        AppError::Validation(PROFILE_REQUIRED_MESSAGE.to_string())
    })?;

    let profile = AudienceProfile::parse(form.audience_profile.as_deref())?;
    let talking_points = generate_talking_points(&profile, state.generator.as_ref()).await?;

    Ok(Json(GenerateResponse { talking_points }))
}

/// Builds the prompt for `profile` and relays the model's text verbatim.
pub async fn generate_talking_points(
    profile: &AudienceProfile,
    generator: &dyn TextGenerator,
) -> Result<String, AppError> {
    let prompt = build_prompt(profile);
    debug!(
        "Generating talking points: profile_chars={}, prompt_chars={}",
        profile.as_str().chars().count(),
        prompt.chars().count()
    );

    let text = generator.generate(&prompt).await?;

    info!(
        "Generated talking points with {} ({} chars)",
        generator.model(),
        text.chars().count()
    );
    Ok(text)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
