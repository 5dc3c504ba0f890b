use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{
    error::LlmError,
    model::{ModelParams, resolve_model_params},
};
use crate::{
    config::Settings,
    types::{Message, UpstreamChatReq, UpstreamChatResp},
};

pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an OpenAI chatbot. Use professional, clear replies.";

/// 3 tokens of framing per message, two messages.
const MESSAGE_OVERHEAD_TOKENS: usize = 6;
const VALIDATION_PROMPT: &str = "Hello, world!";

/// Chat completion client bound to a single Azure deployment.
#[derive(Debug, Clone)]
pub struct AzureChatClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    params: ModelParams,
}

impl AzureChatClient {
    /// Fails for a model outside the supported set before anything else is
    /// checked.
    pub fn new(settings: &Settings, model: &str, client: Client) -> Result<Self, LlmError> {
        let params = resolve_model_params(model)?;
        let endpoint = settings
            .endpoint
            .as_deref()
            .ok_or(LlmError::MissingEndpoint)?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            endpoint,
            model: model.to_string(),
            params,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn params(&self) -> ModelParams {
        self.params
    }

    /// Runs one system+user completion. Any failure is logged and yields an
    /// empty string.
    pub async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
        system: &str,
    ) -> String {
        match self.try_complete(prompt, max_tokens, temperature, system).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model = %self.model, error = %e, input = %prompt, "completion failed");
                String::new()
            }
        }
    }

    pub async fn try_complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
        system: &str,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, self.model
        );
        let body = UpstreamChatReq {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(prompt)],
            max_tokens,
            temperature,
        };

        debug!("Forwarding request to URL: {}", url);
        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .query(&[("api-version", self.params.api_version)])
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LlmError::Authentication { status, body }
                }
                _ => LlmError::Api { status, body },
            });
        }

        let bytes = resp.bytes().await?;
        let parsed: UpstreamChatResp =
            serde_json::from_slice(&bytes).map_err(|e| LlmError::Decode(e.to_string()))?;

        info!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis(),
            "completion received"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(LlmError::EmptyChoices)
    }

    /// Diagnostic token estimate for a system+user pair.
    pub fn estimate_token_count(&self, system: &str, prompt: &str) -> Result<usize, LlmError> {
        let bpe = self.params.encoding.load()?;
        let text = format!("{system}{prompt}");
        let count = bpe.encode_ordinary(&text).len() + MESSAGE_OVERHEAD_TOKENS;
        let preview: String = text.chars().take(300).collect();
        debug!(tokens = count, "Number of tokens for: '{}[...]'", preview);
        Ok(count)
    }

    /// Sends a trivial completion and reports whether the key works.
    pub async fn validate_credential(&self) -> (bool, String) {
        let result = self
            .try_complete(
                VALIDATION_PROMPT,
                DEFAULT_MAX_TOKENS,
                DEFAULT_TEMPERATURE,
                DEFAULT_SYSTEM_PROMPT,
            )
            .await;

        match result {
            Ok(text) if !text.is_empty() => (true, "API key is valid and working.".to_string()),
            Ok(_) => (false, "Invalid API key, please try again.".to_string()),
            Err(e) if e.is_authentication() => {
                warn!(error = %e, "credential rejected");
                (false, "Invalid API key, please try again.".to_string())
            }
            Err(e) => {
                warn!(error = %e, "credential check could not reach upstream");
                (
                    false,
                    "Failed to connect to OpenAI. Please check your internet connection and try again."
                        .to_string(),
                )
            }
        }
    }
}
