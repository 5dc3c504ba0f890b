use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model name {0} is not supported.")]
    UnsupportedModel(String),

    #[error("Azure OpenAI endpoint is not configured (set AZURE_OPENAI_ENDPOINT)")]
    MissingEndpoint,

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication failed ({status}): {body}")]
    Authentication { status: StatusCode, body: String },

    #[error("Upstream returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    #[error("Upstream response contained no choices")]
    EmptyChoices,

    #[error("Token encoding error: {0}")]
    Encoding(String),
}

impl LlmError {
    /// Best-effort check for a rejected credential.
    pub fn is_authentication(&self) -> bool {
        matches!(self, LlmError::Authentication { .. })
            || self.to_string().to_lowercase().contains("authentication")
    }
}
