//! # Dynamic AI Provider Factory
//!
//! Centralizes the logic for creating AI provider instances from a model
//! name. Placing this in the core library lets every consumer (CLI, tests)
//! share the same construction rules instead of wiring providers at module
//! scope.

use crate::{
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
};
use tracing::info;

/// Creates an AI provider instance based on a model name.
///
/// Gemini models are addressed through the hosted `generateContent`
/// endpoint with `AI_API_KEY`; every other model name is assumed to target
/// an OpenAI-compatible server at `AI_API_URL` (key optional).
pub fn create_provider(model_name: &str) -> Result<Box<dyn AiProvider>, PromptError> {
    info!("Creating AI provider for model: '{}'", model_name);

    let provider: Box<dyn AiProvider> = if model_name.starts_with("gemini") {
        let api_key = std::env::var("AI_API_KEY").map_err(|_| {
            PromptError::MissingAiProvider(
                "AI_API_KEY must be set to use Gemini models.".to_string(),
            )
        })?;
        let api_url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{model_name}:generateContent"
        );
        Box::new(GeminiProvider::new(api_url, api_key)?)
    } else {
        let api_url = std::env::var("AI_API_URL").map_err(|_| {
            PromptError::MissingAiProvider(
                "AI_API_URL must be set to use an OpenAI-compatible model.".to_string(),
            )
        })?;
        let api_key = std::env::var("AI_API_KEY").ok();
        Box::new(LocalAiProvider::new(
            api_url,
            api_key,
            Some(model_name.to_string()),
        )?)
    };

    Ok(provider)
}
