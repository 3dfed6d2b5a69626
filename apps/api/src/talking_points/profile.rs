//! Audience profile — the single free-text input of the proxy.

use crate::errors::AppError;

pub const PROFILE_REQUIRED_MESSAGE: &str = "Audience profile is required";

/// A user-supplied audience description that is known to be non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceProfile(String);

impl AudienceProfile {
    /// Accepts any input that has at least one non-whitespace character.
    /// The text is kept verbatim; only the emptiness check looks at the trimmed form.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            Some(text) if !text.trim().is_empty() => Ok(Self(text.to_string())),
            _ => Err(AppError::Validation(PROFILE_REQUIRED_MESSAGE.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
