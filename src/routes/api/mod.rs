pub mod echo;
pub mod openai;

use axum::{Router, routing::post};

use crate::appstate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/echo", post(echo::echo))
        .nest("/openai", openai::router())
}
