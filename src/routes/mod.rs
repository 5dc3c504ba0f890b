pub mod api;
pub mod ping;

use std::any::Any;

use axum::{
    Router,
    response::{IntoResponse, Response},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{appstate::AppState, error::AppError};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(ping::router())
        .nest("/api", api::router())
}

/// Full application with middleware, ready to serve.
pub fn app(state: AppState) -> Router {
    router()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

// Wide open, credentials included: every origin is echoed back. Restrict
// origins to the frontend before exposing publicly.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    AppError::Internal(message).into_response()
}
