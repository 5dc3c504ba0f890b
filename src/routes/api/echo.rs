use axum::{Json, body::Bytes};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Echoes any JSON body back as `{"you_sent": <body>}`.
pub async fn echo(body: Bytes) -> AppResult<Json<Value>> {
    debug!(bytes = body.len(), "echo called");
    let data: Value = serde_json::from_slice(&body).map_err(AppError::json_parse)?;
    Ok(Json(json!({ "you_sent": data })))
}
