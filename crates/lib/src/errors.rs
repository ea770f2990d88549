use thiserror::Error;

/// Errors raised while talking to an AI provider.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize the AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("The AI provider returned an error: {0}")]
    AiApi(String),
    #[error("No usable AI provider is configured: {0}")]
    MissingAiProvider(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
