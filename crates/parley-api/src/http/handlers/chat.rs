//! POST /chat - relay one turn to the model backend.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::extractors::body::LenientJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let reply = state
        .chat_service
        .chat(&body.email, &body.session_id, &body.message)
        .await?;
    Ok(Json(ChatResponse { reply }))
}
