//! Weather chat handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{instrument, warn};
use weatherchat_core::{ChatRequest, ChatResult};

use crate::{error::ApiError, state::AppState};

/// Answer a weather question
#[instrument(skip_all)]
pub async fn weather_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    })?;

    let result = state.chat.handle(request).await?;
    Ok(Json(result))
}
