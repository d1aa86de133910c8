//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/weather-chat", post(handlers::chat::weather_chat))
        .route("/info", get(handlers::info::info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
