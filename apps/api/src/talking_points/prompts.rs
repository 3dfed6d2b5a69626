// Prompt template for talking-point generation. Transport code never touches
// the template text; it only receives the finished prompt from `build_prompt`.

use super::profile::AudienceProfile;

/// Talking-points prompt template. Replace `{audience_profile}` before sending.
pub const TALKING_POINTS_PROMPT_TEMPLATE: &str = r#"Based on the following audience profile, generate a set of tailored talking points
and engaging questions that would resonate well with this specific audience.

Audience Profile: {audience_profile}

Please provide:
1. 5 key talking points that would resonate with this audience
2. 3 engaging questions to spark discussion with this audience
3. 2 potential objections this audience might have and how to address them"#;

/// Embeds the profile into the template. Pure and deterministic.
pub fn build_prompt(profile: &AudienceProfile) -> String {
    TALKING_POINTS_PROMPT_TEMPLATE.replace("{audience_profile}", profile.as_str())
}
