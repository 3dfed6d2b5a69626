// Audience talking points: profile validation, prompt assembly, and the
// POST /generate handler. All model calls go through llm_client.

pub mod handlers;
pub mod profile;
pub mod prompts;
