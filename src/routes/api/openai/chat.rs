use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use tracing::{Level, debug, info, warn};

use crate::{
    appstate::AppState,
    error::{AppError, AppResult},
    inference::{
        AzureChatClient,
        client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE},
    },
    types::{ChatReq, ChatResp},
};

const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";

pub async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ChatResp>> {
    info!(bytes = body.len(), "chat request");

    let data: Value = serde_json::from_slice(&body).map_err(AppError::json_parse)?;
    let req = parse_chat_req(&data, &state.settings.deployment)?;
    debug!(system = %req.system, user = %req.user, model = %req.model, "chat prompt");

    let client = AzureChatClient::new(&state.settings, &req.model, state.client.clone())?;

    if tracing::enabled!(Level::DEBUG) {
        if let Err(e) = client.estimate_token_count(&req.system, &req.user) {
            debug!(error = %e, "token estimate unavailable");
        }
    }

    let content = match (req.max_tokens, req.temperature) {
        (Some(max_tokens), Some(temperature)) => {
            client
                .complete(&req.user, max_tokens, temperature, &req.system)
                .await
        }
        _ => {
            warn!(
                max_tokens = ?data.get("max_tokens"),
                temperature = ?data.get("temperature"),
                "sampling parameters cannot be sent upstream"
            );
            String::new()
        }
    };
    debug!(chars = content.len(), "chat reply");

    Ok(Json(ChatResp::single(content)))
}

/// Validates the request body and applies defaults.
///
/// Only a missing `messages` list or a malformed entry is rejected here.
/// Sampling overrides that cannot be expressed upstream come back as `None`
/// and are handled like a failed completion.
pub fn parse_chat_req(data: &Value, default_model: &str) -> AppResult<ChatReq> {
    let messages = match data.get("messages") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(AppError::BadRequest("No messages provided".to_string())),
    };

    let system = first_content(messages, "system")?.unwrap_or(DEFAULT_SYSTEM);
    let user = first_content(messages, "user")?.unwrap_or_default();

    let max_tokens = match present(data, "max_tokens") {
        None => Some(DEFAULT_MAX_TOKENS),
        Some(v) => token_limit(v),
    };

    let temperature = match present(data, "temperature") {
        None => Some(DEFAULT_TEMPERATURE),
        Some(v) => v.as_f64(),
    };

    // A non-string model can never match a deployment; it is reported as
    // unsupported when the client is built.
    let model = match present(data, "model") {
        None => default_model.to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    };

    Ok(ChatReq {
        system: system.to_string(),
        user: user.to_string(),
        max_tokens,
        temperature,
        model,
    })
}

/// `null` is treated the same as a missing key.
fn present<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| !v.is_null())
}

/// Integers and integral floats that fit a `u32`.
fn token_limit(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
        .map(|f| f as u32)
}

/// Entries whose role is not a string never match. A non-object entry or
/// one without a `role` key is malformed.
fn first_content<'a>(messages: &'a [Value], role: &str) -> AppResult<Option<&'a str>> {
    for (idx, message) in messages.iter().enumerate() {
        let msg_role = message
            .as_object()
            .and_then(|fields| fields.get("role"))
            .ok_or_else(|| AppError::BadRequest(format!("messages[{idx}] has no role")))?;
        if msg_role.as_str() == Some(role) {
            return message
                .get("content")
                .and_then(Value::as_str)
                .map(Some)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("messages[{idx}] has no string content"))
                });
        }
    }
    Ok(None)
}
