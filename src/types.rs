use serde::{Deserialize, Serialize};

/// Inbound `/api/openai/chat` request after validation.
///
/// `max_tokens` and `temperature` are `None` when the caller sent a value
/// the upstream body cannot carry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReq {
    pub system: String,
    pub user: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Single-choice chat completion echo returned to the frontend.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResp {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatContent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatContent {
    pub content: String,
}

impl ChatResp {
    pub fn single(content: String) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatContent { content },
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrResp {
    pub error: String,
}

/// Body sent to the Azure chat completions API.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpstreamChatReq {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamChatResp {
    #[serde(default)]
    pub choices: Vec<UpstreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamChoice {
    pub message: UpstreamMessage,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamMessage {
    #[serde(default)]
    pub content: Option<String>,
}
