use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tracing::info;

use crate::appstate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

pub async fn ping() -> Json<Value> {
    info!("ping check");
    Json(json!({"ping": "pong"}))
}
