pub mod chat;

use axum::{Router, routing::post};

use crate::appstate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat::chat_handler))
}
